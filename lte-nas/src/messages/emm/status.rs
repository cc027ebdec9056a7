//! EMM Status message (3GPP TS 24.301 Section 8.2.14)

use bytes::{Buf, BufMut};

use crate::codec::{check_mandatory_length, NasDecode, NasEncode, NasResult};
use crate::enums::{EmmCause, EmmMessageType};
use crate::messages::EmmMessageBody;

/// EMM Status message (either direction)
///
/// Reports a protocol error found in a received EMM message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmmStatus {
    /// EMM cause (mandatory, V)
    pub emm_cause: EmmCause,
}

impl EmmStatus {
    /// Create a status message
    pub fn new(emm_cause: EmmCause) -> Self {
        Self { emm_cause }
    }
}

impl EmmMessageBody for EmmStatus {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::EmmStatus;
    const NAME: &'static str = "EMM Status";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        Ok(Self::new(EmmCause::nas_decode(buf)?))
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.emm_cause.nas_encode(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NasError;

    #[test]
    fn test_emm_status_keeps_unknown_cause() {
        let msg = EmmStatus::decode_body(&mut &[0x7Eu8][..]).unwrap();
        assert_eq!(msg.emm_cause, EmmCause::Other(0x7E));
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0x7E]);
    }

    #[test]
    fn test_emm_status_requires_cause() {
        assert!(matches!(
            EmmStatus::decode_body(&mut &[0u8; 0][..]),
            Err(NasError::MandatoryFieldNotPresent { .. })
        ));
    }
}
