//! Configured NAS codec
//!
//! [`NasCodec`] wraps the message dispatch with the limits and logging
//! switches of a [`CodecConfig`].

use lte_common::logging::{log_nas_message, Direction, NasLayer};
use lte_common::CodecConfig;

use crate::codec::{NasError, NasResult};
use crate::messages::{decode_nas, encode_nas_message, NasMessage};

/// NAS codec driven by a [`CodecConfig`]
#[derive(Debug, Clone, Default)]
pub struct NasCodec {
    config: CodecConfig,
}

impl NasCodec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode one NAS PDU, returning the message and the octets consumed.
    ///
    /// Integrity protected PDUs are unwrapped when the configuration allows
    /// it; ciphered payloads are always returned opaque.
    pub fn decode(&self, data: &[u8]) -> NasResult<(NasMessage, usize)> {
        self.check_pdu_len(data.len())?;

        let (message, consumed) = decode_nas(data, self.config.allow_integrity_protected)?;
        if self.config.reject_trailing_bytes && consumed < data.len() {
            tracing::warn!(
                msg = message.name(),
                trailing = data.len() - consumed,
                "trailing octets after NAS message"
            );
            return Err(NasError::value(format!(
                "{} octets after {}",
                data.len() - consumed,
                message.name()
            )));
        }

        if self.config.log_payloads {
            log_nas_message(layer_of(&message), Direction::Rx, message.name(), &data[..consumed]);
        }
        Ok((message, consumed))
    }

    /// Encode one NAS message into a new vector.
    pub fn encode(&self, message: &NasMessage) -> NasResult<Vec<u8>> {
        let mut out = Vec::new();
        encode_nas_message(message, &mut out)?;
        self.check_pdu_len(out.len())?;

        if self.config.log_payloads {
            log_nas_message(layer_of(message), Direction::Tx, message.name(), &out);
        }
        Ok(out)
    }

    fn check_pdu_len(&self, len: usize) -> NasResult<()> {
        if len > self.config.max_pdu_len {
            tracing::warn!(len, max = self.config.max_pdu_len, "NAS PDU over the size limit");
            return Err(NasError::OctetStringTooLongForIei {
                len,
                max: self.config.max_pdu_len,
            });
        }
        Ok(())
    }
}

fn layer_of(message: &NasMessage) -> NasLayer {
    match message {
        NasMessage::Esm(_) => NasLayer::Esm,
        NasMessage::Emm(_) | NasMessage::Protected(_) => NasLayer::Emm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{EmmMessage, ProtectedNasMessage};

    const ATTACH_COMPLETE: [u8; 4] = [0x07, 0x43, 0x00, 0x00];

    #[test]
    fn test_default_codec_round_trip() {
        let codec = NasCodec::default();
        let (msg, len) = codec.decode(&ATTACH_COMPLETE).unwrap();
        assert_eq!(len, 4);
        assert!(matches!(msg, NasMessage::Emm(EmmMessage::AttachComplete(_))));
        assert_eq!(codec.encode(&msg).unwrap(), ATTACH_COMPLETE);
    }

    #[test]
    fn test_max_pdu_len() {
        let codec = NasCodec::new(CodecConfig {
            max_pdu_len: 3,
            ..Default::default()
        });
        assert!(matches!(
            codec.decode(&ATTACH_COMPLETE),
            Err(NasError::OctetStringTooLongForIei { len: 4, max: 3 })
        ));

        let reject = NasMessage::Emm(EmmMessage::AuthenticationReject(Default::default()));
        assert_eq!(codec.encode(&reject).unwrap(), vec![0x07, 0x54]);
    }

    #[test]
    fn test_trailing_bytes() {
        let data = [0x07, 0x54, 0xFF];
        let (_, len) = NasCodec::default().decode(&data).unwrap();
        assert_eq!(len, 2);

        let strict = NasCodec::new(CodecConfig {
            reject_trailing_bytes: true,
            ..Default::default()
        });
        assert!(matches!(
            strict.decode(&data),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_integrity_protected_left_opaque_when_disallowed() {
        let data = [0x17, 0x01, 0x02, 0x03, 0x04, 0x05, 0x07, 0x43, 0x00, 0x00];
        let codec = NasCodec::new(CodecConfig {
            allow_integrity_protected: false,
            ..Default::default()
        });
        let (msg, _) = codec.decode(&data).unwrap();
        let NasMessage::Protected(ProtectedNasMessage { inner, payload, .. }) = &msg else {
            panic!("expected protected message, got {msg:?}");
        };
        assert!(inner.is_none());
        assert_eq!(&payload[..], &ATTACH_COMPLETE);
        assert_eq!(codec.encode(&msg).unwrap(), data);
    }

    #[test]
    fn test_logging_enabled_does_not_change_output() {
        let codec = NasCodec::new(CodecConfig {
            log_payloads: true,
            ..Default::default()
        });
        let (msg, _) = codec.decode(&ATTACH_COMPLETE).unwrap();
        assert_eq!(codec.encode(&msg).unwrap(), ATTACH_COMPLETE);
    }
}
