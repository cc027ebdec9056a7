//! Deactivate EPS Bearer Context messages (3GPP TS 24.301 Sections 8.3.11, 8.3.12)

use bytes::{Buf, BufMut};

use crate::codec::{check_mandatory_length, encode_optional, NasDecode, NasEncode, NasResult};
use crate::enums::{EsmCause, EsmMessageType};
use crate::ies::{ExtendedProtocolConfigurationOptions, GprsTimer3, ProtocolConfigurationOptions};
use crate::messages::esm::esm_common_iei;
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// Presence mask bits of [`DeactivateEpsBearerContextRequest`]
pub mod deactivate_bearer_request_presence {
    #![allow(missing_docs)]
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 0;
    pub const T3396_VALUE: u32 = 1 << 1;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 2;
}

/// Deactivate EPS Bearer Context Request message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeactivateEpsBearerContextRequest {
    /// ESM cause (mandatory, V)
    pub esm_cause: EsmCause,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// T3396 value (TLV, IEI 0x37)
    pub t3396_value: Option<GprsTimer3>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl DeactivateEpsBearerContextRequest {
    /// Create a request carrying only the cause
    pub fn new(esm_cause: EsmCause) -> Self {
        Self {
            esm_cause,
            protocol_configuration_options: None,
            t3396_value: None,
            extended_protocol_configuration_options: None,
        }
    }
}

impl EsmMessageBody for DeactivateEpsBearerContextRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::DeactivateEpsBearerContextRequest;
    const NAME: &'static str = "Deactivate EPS Bearer Context Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use esm_common_iei as iei;

        check_mandatory_length(buf, 1)?;
        let mut msg = Self::new(EsmCause::nas_decode(buf)?);

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::PROTOCOL_CONFIGURATION_OPTIONS => {
                    keep_first(
                        &mut msg.protocol_configuration_options,
                        Self::NAME,
                        raw,
                        ProtocolConfigurationOptions::nas_decode(buf)?,
                    )
                }
                iei::BACK_OFF_TIMER => keep_first(
                    &mut msg.t3396_value,
                    Self::NAME,
                    raw,
                    GprsTimer3::nas_decode(buf)?,
                ),
                iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS => {
                    keep_first(
                        &mut msg.extended_protocol_configuration_options,
                        Self::NAME,
                        raw,
                        ExtendedProtocolConfigurationOptions::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use esm_common_iei as iei;

        self.esm_cause.nas_encode(buf)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional(buf, iei::BACK_OFF_TIMER, &self.t3396_value)?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )
    }

    fn presence_mask(&self) -> u32 {
        use deactivate_bearer_request_presence as p;

        presence_mask_of(&[
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (self.t3396_value.is_some(), p::T3396_VALUE),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }
}

pco_message!(
    /// Deactivate EPS Bearer Context Accept message (UE to network)
    DeactivateEpsBearerContextAccept,
    DeactivateEpsBearerContextAccept,
    "Deactivate EPS Bearer Context Accept"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_bearer_request_with_back_off() {
        let data = [0x24, 0x37, 0x01, 0x21];
        let msg = DeactivateEpsBearerContextRequest::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.esm_cause, EsmCause::RegularDeactivation);
        let timer = msg.t3396_value.unwrap();
        assert_eq!(timer, GprsTimer3::new(1, 1));
        assert_eq!(timer.seconds(), Some(3600));

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_deactivate_bearer_request_requires_cause() {
        assert!(matches!(
            DeactivateEpsBearerContextRequest::decode_body(&mut &[0u8; 0][..]),
            Err(crate::codec::NasError::MandatoryFieldNotPresent { .. })
        ));
    }

    #[test]
    fn test_deactivate_bearer_accept() {
        let msg = DeactivateEpsBearerContextAccept::decode_body(&mut &[0x27u8, 0x01, 0x80][..])
            .unwrap();
        assert_eq!(
            msg.protocol_configuration_options,
            Some(ProtocolConfigurationOptions::default())
        );
        assert!(DeactivateEpsBearerContextAccept::decode_body(&mut &[0x28u8, 0x00][..]).is_err());
    }
}
