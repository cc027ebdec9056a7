//! Activate Dedicated EPS Bearer Context messages (3GPP TS 24.301 Sections 8.3.1 - 8.3.3)

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasEncode, NasResult,
};
use crate::enums::EsmMessageType;
use crate::ies::{
    EpsQualityOfService, ExtendedProtocolConfigurationOptions, LinkedEpsBearerIdentity,
    LlcServiceAccessPointIdentifier, PacketFlowIdentifier, ProtocolConfigurationOptions,
    QualityOfService, RadioPriority, TrafficFlowTemplate, TransactionIdentifier,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// IEI values for Activate Dedicated EPS Bearer Context Request optional IEs
pub mod activate_dedicated_bearer_request_iei {
    /// Transaction identifier
    pub const TRANSACTION_IDENTIFIER: u8 = 0x5D;
    /// Negotiated QoS
    pub const NEGOTIATED_QOS: u8 = 0x30;
    /// Negotiated LLC SAPI
    pub const NEGOTIATED_LLC_SAPI: u8 = 0x32;
    /// Radio priority (half-octet)
    pub const RADIO_PRIORITY: u8 = 0x80;
    /// Packet flow identifier
    pub const PACKET_FLOW_IDENTIFIER: u8 = 0x34;
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of [`ActivateDedicatedEpsBearerContextRequest`]
pub mod activate_dedicated_bearer_request_presence {
    #![allow(missing_docs)]
    pub const TRANSACTION_IDENTIFIER: u32 = 1 << 0;
    pub const NEGOTIATED_QOS: u32 = 1 << 1;
    pub const NEGOTIATED_LLC_SAPI: u32 = 1 << 2;
    pub const RADIO_PRIORITY: u32 = 1 << 3;
    pub const PACKET_FLOW_IDENTIFIER: u32 = 1 << 4;
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 5;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 6;
}

/// Activate Dedicated EPS Bearer Context Request message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivateDedicatedEpsBearerContextRequest {
    /// Linked EPS bearer identity (mandatory, Type 1, low nibble; high nibble spare)
    pub linked_eps_bearer_identity: LinkedEpsBearerIdentity,
    /// EPS QoS (mandatory, LV)
    pub eps_qos: EpsQualityOfService,
    /// Traffic flow template (mandatory, LV)
    pub tft: TrafficFlowTemplate,
    /// Transaction identifier (TLV, IEI 0x5D)
    pub transaction_identifier: Option<TransactionIdentifier>,
    /// Negotiated QoS (TLV, IEI 0x30)
    pub negotiated_qos: Option<QualityOfService>,
    /// Negotiated LLC SAPI (TV, IEI 0x32)
    pub negotiated_llc_sapi: Option<LlcServiceAccessPointIdentifier>,
    /// Radio priority (TV, IEI 0x8-)
    pub radio_priority: Option<RadioPriority>,
    /// Packet flow identifier (TLV, IEI 0x34)
    pub packet_flow_identifier: Option<PacketFlowIdentifier>,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl ActivateDedicatedEpsBearerContextRequest {
    /// Linked EBI octet plus the shortest EPS QoS and TFT
    pub const MIN_LEN: usize = 1 + 2 + 2;

    /// Create a request with the mandatory IEs
    pub fn new(
        linked_eps_bearer_identity: LinkedEpsBearerIdentity,
        eps_qos: EpsQualityOfService,
        tft: TrafficFlowTemplate,
    ) -> Self {
        Self {
            linked_eps_bearer_identity,
            eps_qos,
            tft,
            ..Default::default()
        }
    }
}

impl EsmMessageBody for ActivateDedicatedEpsBearerContextRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::ActivateDedicatedEpsBearerContextRequest;
    const NAME: &'static str = "Activate Dedicated EPS Bearer Context Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use activate_dedicated_bearer_request_iei as iei;

        check_mandatory_length(buf, Self::MIN_LEN)?;
        let linked = LinkedEpsBearerIdentity::decode(read_u8(buf)? & 0x0F)?;
        let mut msg = Self::new(
            linked,
            EpsQualityOfService::nas_decode(buf)?,
            TrafficFlowTemplate::nas_decode(buf)?,
        );

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::TRANSACTION_IDENTIFIER => {
                    keep_first(
                        &mut msg.transaction_identifier,
                        Self::NAME,
                        raw,
                        TransactionIdentifier::nas_decode(buf)?,
                    )
                }
                iei::NEGOTIATED_QOS => keep_first(
                    &mut msg.negotiated_qos,
                    Self::NAME,
                    raw,
                    QualityOfService::nas_decode(buf)?,
                ),
                iei::NEGOTIATED_LLC_SAPI => {
                    keep_first(
                        &mut msg.negotiated_llc_sapi,
                        Self::NAME,
                        raw,
                        LlcServiceAccessPointIdentifier::nas_decode(buf)?,
                    )
                }
                iei::RADIO_PRIORITY => keep_first(
                    &mut msg.radio_priority,
                    Self::NAME,
                    raw,
                    RadioPriority::decode(raw & 0x0F)?,
                ),
                iei::PACKET_FLOW_IDENTIFIER => {
                    keep_first(
                        &mut msg.packet_flow_identifier,
                        Self::NAME,
                        raw,
                        PacketFlowIdentifier::nas_decode(buf)?,
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
        use activate_dedicated_bearer_request_iei as iei;

        buf.put_u8(self.linked_eps_bearer_identity.encode());
        self.eps_qos.nas_encode(buf)?;
        self.tft.nas_encode(buf)?;

        encode_optional(buf, iei::TRANSACTION_IDENTIFIER, &self.transaction_identifier)?;
        encode_optional(buf, iei::NEGOTIATED_QOS, &self.negotiated_qos)?;
        encode_optional(buf, iei::NEGOTIATED_LLC_SAPI, &self.negotiated_llc_sapi)?;
        encode_optional_ie1(buf, iei::RADIO_PRIORITY, &self.radio_priority)?;
        encode_optional(buf, iei::PACKET_FLOW_IDENTIFIER, &self.packet_flow_identifier)?;
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
        use activate_dedicated_bearer_request_presence as p;

        presence_mask_of(&[
            (self.transaction_identifier.is_some(), p::TRANSACTION_IDENTIFIER),
            (self.negotiated_qos.is_some(), p::NEGOTIATED_QOS),
            (self.negotiated_llc_sapi.is_some(), p::NEGOTIATED_LLC_SAPI),
            (self.radio_priority.is_some(), p::RADIO_PRIORITY),
            (self.packet_flow_identifier.is_some(), p::PACKET_FLOW_IDENTIFIER),
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
    /// Activate Dedicated EPS Bearer Context Accept message (UE to network)
    ActivateDedicatedEpsBearerContextAccept,
    ActivateDedicatedEpsBearerContextAccept,
    "Activate Dedicated EPS Bearer Context Accept"
);

pco_message!(
    /// Activate Dedicated EPS Bearer Context Reject message (UE to network)
    cause ActivateDedicatedEpsBearerContextReject,
    ActivateDedicatedEpsBearerContextReject,
    "Activate Dedicated EPS Bearer Context Reject"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EsmCause;
    use crate::ies::tft::{direction, PacketFilterList};
    use crate::ies::{PacketFilter, PacketFilterComponent, TftOperationCode};

    fn voice_tft() -> TrafficFlowTemplate {
        TrafficFlowTemplate {
            operation: TftOperationCode::CreateNewTft,
            packet_filters: PacketFilterList::Filters(vec![PacketFilter {
                direction: direction::BIDIRECTIONAL,
                identifier: 1,
                evaluation_precedence: 0x10,
                components: vec![
                    PacketFilterComponent::Ipv4RemoteAddress {
                        addr: [10, 0, 0, 1],
                        mask: [255, 255, 255, 255],
                    },
                    PacketFilterComponent::SingleRemotePort(5060),
                ],
            }]),
            parameters: Vec::new(),
        }
    }

    #[test]
    fn test_dedicated_bearer_request_gbr() {
        let qos = EpsQualityOfService::with_bit_rates_kbps(1, 64, 64, 64, 64);
        let mut msg = ActivateDedicatedEpsBearerContextRequest::new(
            LinkedEpsBearerIdentity(5),
            qos,
            voice_tft(),
        );
        msg.protocol_configuration_options = Some(ProtocolConfigurationOptions::default());

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(&out[..7], &[0x05, 0x05, 0x01, 0x40, 0x40, 0x40, 0x40]);
        // TFT header: create new TFT, one filter
        assert_eq!(out[8], 0x21);
        assert_eq!(&out[out.len() - 3..], &[0x27, 0x01, 0x80]);

        let decoded =
            ActivateDedicatedEpsBearerContextRequest::decode_body(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.eps_qos.guaranteed_downlink_kbps(), Some(64));
    }

    #[test]
    fn test_dedicated_bearer_request_spare_nibble_ignored() {
        let data = [0xF6, 0x01, 0x05, 0x01, 0x40];
        let msg = ActivateDedicatedEpsBearerContextRequest::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.linked_eps_bearer_identity, LinkedEpsBearerIdentity(6));
        assert_eq!(msg.tft.operation, TftOperationCode::DeleteExistingTft);
    }

    #[test]
    fn test_dedicated_bearer_reject() {
        let mut reject =
            ActivateDedicatedEpsBearerContextReject::new(EsmCause::SemanticErrorInTftOperation);
        reject.extended_protocol_configuration_options =
            Some(ExtendedProtocolConfigurationOptions::default());
        let mut out = Vec::new();
        reject.encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0x29, 0x7B, 0x00, 0x01, 0x80]);
        assert_eq!(
            ActivateDedicatedEpsBearerContextReject::decode_body(&mut out.as_slice()).unwrap(),
            reject
        );
        assert_eq!(
            reject.presence_mask(),
            crate::messages::esm::pco_message_presence::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS
        );
    }
}
