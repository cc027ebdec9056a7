//! NAS codec facade driven by YAML configuration

use lte_common::{compute_length, read_length, CodecConfig};
use lte_nas::{EmmMessage, NasCodec, NasError, NasMessage, SecurityHeaderType};

use crate::test_fixtures::{attach_request, TestSubscriber};
use crate::test_utils::{init_test_logging, pdu, TestResult};

/// Integrity protected with new context, SQN 0, carrying a Security Mode Command
const PROTECTED_SMC: &str = "37 11 22 33 44 00 07 5d 02 00 02 e0 e0";

#[test]
fn test_codec_from_yaml() -> TestResult {
    init_test_logging();
    let config = CodecConfig::from_yaml(
        "max_pdu_len: 64\nlog_payloads: true\nreject_trailing_bytes: true\n",
    )?;
    let codec = NasCodec::new(config);
    assert_eq!(codec.config().max_pdu_len, 64);
    assert!(codec.config().allow_integrity_protected);

    let (message, consumed) = codec.decode(&pdu("07 43 00 00")?)?;
    assert_eq!(consumed, 4);
    assert_eq!(codec.encode(&message)?, vec![0x07, 0x43, 0x00, 0x00]);
    Ok(())
}

#[test]
fn test_pdu_limit_applies_both_ways() -> TestResult {
    let codec = NasCodec::new(CodecConfig::from_yaml("max_pdu_len: 16")?);
    let attach = NasMessage::Emm(attach_request(&TestSubscriber::default())?.into());

    let err = codec.encode(&attach).unwrap_err();
    assert!(matches!(err, NasError::OctetStringTooLongForIei { max: 16, .. }));

    let wire = attach.to_vec()?;
    let err = codec.decode(&wire).unwrap_err();
    assert_eq!(err.code(), -5);

    let relaxed = NasCodec::default();
    assert_eq!(relaxed.decode(&wire)?.0, attach);
    Ok(())
}

#[test]
fn test_trailing_bytes_policy() -> TestResult {
    let data = pdu("07 4a ff")?;

    let (message, consumed) = NasCodec::default().decode(&data)?;
    assert_eq!(consumed, 2);
    assert!(matches!(message, NasMessage::Emm(EmmMessage::TrackingAreaUpdateComplete(_))));

    let strict = NasCodec::new(CodecConfig {
        reject_trailing_bytes: true,
        ..Default::default()
    });
    let err = strict.decode(&data).unwrap_err();
    assert!(matches!(err, NasError::ValueDoesntMatch(_)));
    assert_eq!(strict.decode(&data[..2])?.1, 2);
    Ok(())
}

#[test]
fn test_integrity_protected_unwrap_switch() -> TestResult {
    let data = pdu(PROTECTED_SMC)?;

    let (message, _) = NasCodec::default().decode(&data)?;
    let NasMessage::Protected(protected) = message else {
        return Err("expected protected message".into());
    };
    assert_eq!(
        protected.header.security_header_type,
        SecurityHeaderType::IntegrityProtectedWithNewSecurityContext
    );
    assert_eq!(protected.header.mac, 0x1122_3344);
    let inner = protected.inner.ok_or("inner message not decoded")?;
    assert!(matches!(*inner, NasMessage::Emm(EmmMessage::SecurityModeCommand(_))));

    let opaque = NasCodec::new(CodecConfig::from_yaml("allow_integrity_protected: false")?);
    let NasMessage::Protected(protected) = opaque.decode(&data)?.0 else {
        return Err("expected protected message".into());
    };
    assert!(protected.inner.is_none());
    assert_eq!(&protected.payload[..], &data[6..]);
    Ok(())
}

#[test]
fn test_word_length_prefix_boundaries() -> TestResult {
    for (len, size) in [
        (0x7F, 1),
        (0x80, 2),
        (0x3FFF, 2),
        (0x4000, 3),
        (0x1F_FFFF, 3),
        (0x20_0000, 4),
        (0x0FFF_FFFF, 4),
        (0x1000_0000, 5),
    ] {
        let prefix = compute_length(len);
        assert_eq!(prefix.len(), size, "length {len:#x}");
        let word = read_length(&prefix)?;
        assert_eq!((word.content_length, word.length_size), (len, size));
    }
    assert!(read_length(&[0xF8]).is_err());
    assert!(read_length(&[0xC0, 0x01]).is_err());
    Ok(())
}
