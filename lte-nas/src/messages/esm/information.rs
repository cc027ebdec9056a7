//! ESM Information messages (3GPP TS 24.301 Sections 8.3.13, 8.3.14)

use bytes::{Buf, BufMut};

use crate::codec::{encode_optional, NasDecode, NasResult};
use crate::enums::EsmMessageType;
use crate::ies::{
    AccessPointName, ExtendedProtocolConfigurationOptions, ProtocolConfigurationOptions,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// ESM Information Request message (network to UE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EsmInformationRequest;

impl EsmMessageBody for EsmInformationRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::EsmInformationRequest;
    const NAME: &'static str = "ESM Information Request";

    fn decode_body<B: Buf>(_buf: &mut B) -> NasResult<Self> {
        Ok(Self)
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) -> NasResult<()> {
        Ok(())
    }
}

/// IEI values for ESM Information Response optional IEs
pub mod esm_information_response_iei {
    /// Access point name
    pub const ACCESS_POINT_NAME: u8 = 0x28;
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of [`EsmInformationResponse`]
pub mod esm_information_response_presence {
    #![allow(missing_docs)]
    pub const ACCESS_POINT_NAME: u32 = 1 << 0;
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 1;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 2;
}

/// ESM Information Response message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EsmInformationResponse {
    /// Access point name (TLV, IEI 0x28)
    pub access_point_name: Option<AccessPointName>,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl EsmMessageBody for EsmInformationResponse {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::EsmInformationResponse;
    const NAME: &'static str = "ESM Information Response";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use esm_information_response_iei as iei;

        let mut msg = Self::default();
        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::ACCESS_POINT_NAME => {
                    keep_first(
                        &mut msg.access_point_name,
                        Self::NAME,
                        raw,
                        AccessPointName::nas_decode(buf)?,
                    )
                }
                iei::PROTOCOL_CONFIGURATION_OPTIONS => {
                    keep_first(
                        &mut msg.protocol_configuration_options,
                        Self::NAME,
                        raw,
                        ProtocolConfigurationOptions::nas_decode(buf)?,
                    )
                }
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
        use esm_information_response_iei as iei;

        encode_optional(buf, iei::ACCESS_POINT_NAME, &self.access_point_name)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )
    }

    fn presence_mask(&self) -> u32 {
        use esm_information_response_presence as p;

        presence_mask_of(&[
            (self.access_point_name.is_some(), p::ACCESS_POINT_NAME),
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esm_information_response_apn() {
        let data = [
            0x28, 0x09, 0x08, b'i', b'n', b't', b'e', b'r', b'n', b'e', b't',
        ];
        let msg = EsmInformationResponse::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.access_point_name, Some(AccessPointName::new("internet")));
        assert_eq!(
            msg.presence_mask(),
            esm_information_response_presence::ACCESS_POINT_NAME
        );

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_esm_information_request_is_empty() {
        let mut out = Vec::new();
        EsmInformationRequest.encode_body(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
