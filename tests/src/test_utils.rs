//! Test utility functions for integration tests
//!
//! Provides common utilities for test setup, logging, and assertions.

use lte_nas::{decode_nas_message, NasMessage};
use tracing_subscriber::{fmt, EnvFilter};

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests with optional filter
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "info"
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Parse a hex vector, ignoring whitespace
pub fn pdu(hex_str: &str) -> TestResult<Vec<u8>> {
    let compact: String = hex_str.split_whitespace().collect();
    Ok(hex::decode(compact)?)
}

/// Decode `data` as one NAS PDU, check every octet was consumed and that
/// encoding the result reproduces `data`.
pub fn assert_round_trip(data: &[u8]) -> TestResult<NasMessage> {
    let (message, consumed) = decode_nas_message(data)?;
    if consumed != data.len() {
        return Err(format!(
            "{} consumed {consumed} of {} octets",
            message.name(),
            data.len()
        )
        .into());
    }
    let encoded = message.to_vec()?;
    if encoded != data {
        return Err(format!(
            "{} re-encoded as {}, expected {}",
            message.name(),
            hex::encode(&encoded),
            hex::encode(data)
        )
        .into());
    }
    Ok(message)
}

/// Encode `message` and decode it back, returning the wire form.
pub fn encode_and_reparse(message: &NasMessage) -> TestResult<Vec<u8>> {
    let encoded = message.to_vec()?;
    let reparsed = assert_round_trip(&encoded)?;
    if &reparsed != message {
        return Err(format!("{} changed across encode/decode", message.name()).into());
    }
    Ok(encoded)
}

/// Offsets in `0..data.len()` at which decoding a prefix of `data` succeeds
pub fn decodable_prefixes(data: &[u8]) -> Vec<usize> {
    (0..data.len())
        .filter(|&cut| decode_nas_message(&data[..cut]).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdu_ignores_whitespace() {
        assert_eq!(pdu("07 43\n 00 00").unwrap(), vec![0x07, 0x43, 0x00, 0x00]);
        assert!(pdu("07 4").is_err());
    }

    #[test]
    fn test_assert_round_trip() {
        init_test_logging();
        assert!(assert_round_trip(&[0x07, 0x43, 0x00, 0x00]).is_ok());
        // Trailing octet is not consumed
        assert!(assert_round_trip(&[0x07, 0x54, 0x00]).is_err());
    }

    #[test]
    fn test_decodable_prefixes() {
        // Authentication Reject has no body: only the full two octets decode
        assert_eq!(decodable_prefixes(&[0x07, 0x54, 0x00]), vec![2]);
    }
}
