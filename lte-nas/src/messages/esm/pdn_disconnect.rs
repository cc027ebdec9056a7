//! PDN Disconnect messages (3GPP TS 24.301 Sections 8.3.21, 8.3.22)

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, read_u8, InformationElement1, NasDecode, NasResult,
};
use crate::enums::EsmMessageType;
use crate::ies::{
    ExtendedProtocolConfigurationOptions, LinkedEpsBearerIdentity, ProtocolConfigurationOptions,
};
use crate::messages::esm::{esm_common_iei, pco_message_presence};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// PDN Disconnect Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PdnDisconnectRequest {
    /// Linked EPS bearer identity of the PDN's default bearer (mandatory,
    /// Type 1, low nibble; high nibble spare)
    pub linked_eps_bearer_identity: LinkedEpsBearerIdentity,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl PdnDisconnectRequest {
    /// Disconnect the PDN whose default bearer is `ebi`
    pub fn new(ebi: u8) -> Self {
        Self {
            linked_eps_bearer_identity: LinkedEpsBearerIdentity(ebi),
            ..Default::default()
        }
    }
}

impl EsmMessageBody for PdnDisconnectRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::PdnDisconnectRequest;
    const NAME: &'static str = "PDN Disconnect Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use esm_common_iei as iei;

        check_mandatory_length(buf, 1)?;
        let mut msg = Self {
            linked_eps_bearer_identity: LinkedEpsBearerIdentity::decode(read_u8(buf)? & 0x0F)?,
            ..Default::default()
        };

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

        buf.put_u8(self.linked_eps_bearer_identity.encode());
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
        use pco_message_presence as p;

        presence_mask_of(&[
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

pco_message!(
    /// PDN Disconnect Reject message (network to UE)
    cause PdnDisconnectReject,
    PdnDisconnectReject,
    "PDN Disconnect Reject"
);
