//! Modify EPS Bearer Context messages (3GPP TS 24.301 Sections 8.3.16 - 8.3.18)

use bytes::{Buf, BufMut};

use crate::codec::{encode_optional, encode_optional_ie1, InformationElement1, NasDecode, NasResult};
use crate::enums::EsmMessageType;
use crate::ies::{
    ApnAggregateMaximumBitRate, EpsQualityOfService, ExtendedApnAggregateMaximumBitRate,
    ExtendedProtocolConfigurationOptions, LlcServiceAccessPointIdentifier, PacketFlowIdentifier,
    ProtocolConfigurationOptions, QualityOfService, RadioPriority, TrafficFlowTemplate,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// IEI values for Modify EPS Bearer Context Request optional IEs
pub mod modify_bearer_request_iei {
    /// New EPS QoS
    pub const NEW_EPS_QOS: u8 = 0x5B;
    /// TFT
    pub const TFT: u8 = 0x36;
    /// New QoS
    pub const NEW_QOS: u8 = 0x30;
    /// Negotiated LLC SAPI
    pub const NEGOTIATED_LLC_SAPI: u8 = 0x32;
    /// Radio priority (half-octet)
    pub const RADIO_PRIORITY: u8 = 0x80;
    /// Packet flow identifier
    pub const PACKET_FLOW_IDENTIFIER: u8 = 0x34;
    /// APN-AMBR
    pub const APN_AMBR: u8 = 0x5E;
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
    /// Extended APN-AMBR
    pub const EXTENDED_APN_AMBR: u8 = 0x5F;
}

/// Presence mask bits of [`ModifyEpsBearerContextRequest`]
pub mod modify_bearer_request_presence {
    #![allow(missing_docs)]
    pub const NEW_EPS_QOS: u32 = 1 << 0;
    pub const TFT: u32 = 1 << 1;
    pub const NEW_QOS: u32 = 1 << 2;
    pub const NEGOTIATED_LLC_SAPI: u32 = 1 << 3;
    pub const RADIO_PRIORITY: u32 = 1 << 4;
    pub const PACKET_FLOW_IDENTIFIER: u32 = 1 << 5;
    pub const APN_AMBR: u32 = 1 << 6;
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 7;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 8;
    pub const EXTENDED_APN_AMBR: u32 = 1 << 9;
}

/// Modify EPS Bearer Context Request message (network to UE)
///
/// Every IE is optional; a request with none of them is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModifyEpsBearerContextRequest {
    /// New EPS QoS (TLV, IEI 0x5B)
    pub new_eps_qos: Option<EpsQualityOfService>,
    /// Traffic flow template (TLV, IEI 0x36)
    pub tft: Option<TrafficFlowTemplate>,
    /// New QoS (TLV, IEI 0x30)
    pub new_qos: Option<QualityOfService>,
    /// Negotiated LLC SAPI (TV, IEI 0x32)
    pub negotiated_llc_sapi: Option<LlcServiceAccessPointIdentifier>,
    /// Radio priority (TV, IEI 0x8-)
    pub radio_priority: Option<RadioPriority>,
    /// Packet flow identifier (TLV, IEI 0x34)
    pub packet_flow_identifier: Option<PacketFlowIdentifier>,
    /// APN-AMBR (TLV, IEI 0x5E)
    pub apn_ambr: Option<ApnAggregateMaximumBitRate>,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
    /// Extended APN-AMBR (TLV, IEI 0x5F)
    pub extended_apn_ambr: Option<ExtendedApnAggregateMaximumBitRate>,
}

impl EsmMessageBody for ModifyEpsBearerContextRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::ModifyEpsBearerContextRequest;
    const NAME: &'static str = "Modify EPS Bearer Context Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use modify_bearer_request_iei as iei;

        let mut msg = Self::default();
        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::NEW_EPS_QOS => keep_first(
                    &mut msg.new_eps_qos,
                    Self::NAME,
                    raw,
                    EpsQualityOfService::nas_decode(buf)?,
                ),
                iei::TFT => keep_first(
                    &mut msg.tft,
                    Self::NAME,
                    raw,
                    TrafficFlowTemplate::nas_decode(buf)?,
                ),
                iei::NEW_QOS => keep_first(
                    &mut msg.new_qos,
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
                iei::APN_AMBR => keep_first(
                    &mut msg.apn_ambr,
                    Self::NAME,
                    raw,
                    ApnAggregateMaximumBitRate::nas_decode(buf)?,
                ),
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
                iei::EXTENDED_APN_AMBR => {
                    keep_first(
                        &mut msg.extended_apn_ambr,
                        Self::NAME,
                        raw,
                        ExtendedApnAggregateMaximumBitRate::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }
        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use modify_bearer_request_iei as iei;

        encode_optional(buf, iei::NEW_EPS_QOS, &self.new_eps_qos)?;
        encode_optional(buf, iei::TFT, &self.tft)?;
        encode_optional(buf, iei::NEW_QOS, &self.new_qos)?;
        encode_optional(buf, iei::NEGOTIATED_LLC_SAPI, &self.negotiated_llc_sapi)?;
        encode_optional_ie1(buf, iei::RADIO_PRIORITY, &self.radio_priority)?;
        encode_optional(buf, iei::PACKET_FLOW_IDENTIFIER, &self.packet_flow_identifier)?;
        encode_optional(buf, iei::APN_AMBR, &self.apn_ambr)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )?;
        encode_optional(buf, iei::EXTENDED_APN_AMBR, &self.extended_apn_ambr)
    }

    fn presence_mask(&self) -> u32 {
        use modify_bearer_request_presence as p;

        presence_mask_of(&[
            (self.new_eps_qos.is_some(), p::NEW_EPS_QOS),
            (self.tft.is_some(), p::TFT),
            (self.new_qos.is_some(), p::NEW_QOS),
            (self.negotiated_llc_sapi.is_some(), p::NEGOTIATED_LLC_SAPI),
            (self.radio_priority.is_some(), p::RADIO_PRIORITY),
            (self.packet_flow_identifier.is_some(), p::PACKET_FLOW_IDENTIFIER),
            (self.apn_ambr.is_some(), p::APN_AMBR),
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (self.extended_apn_ambr.is_some(), p::EXTENDED_APN_AMBR),
        ])
    }
}

pco_message!(
    /// Modify EPS Bearer Context Accept message (UE to network)
    ModifyEpsBearerContextAccept,
    ModifyEpsBearerContextAccept,
    "Modify EPS Bearer Context Accept"
);

pco_message!(
    /// Modify EPS Bearer Context Reject message (UE to network)
    cause ModifyEpsBearerContextReject,
    ModifyEpsBearerContextReject,
    "Modify EPS Bearer Context Reject"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EsmCause;
    use crate::ies::TftOperationCode;

    #[test]
    fn test_modify_bearer_request_empty() {
        let msg = ModifyEpsBearerContextRequest::decode_body(&mut &[0u8; 0][..]).unwrap();
        assert_eq!(msg, ModifyEpsBearerContextRequest::default());
        assert_eq!(msg.presence_mask(), 0);
    }

    #[test]
    fn test_modify_bearer_request_qos_and_ambr() {
        let data = [
            0x5B, 0x01, 0x08, 0x36, 0x01, 0xC0, 0x5E, 0x02, 0xFE, 0xFE, 0x81,
        ];
        let msg = ModifyEpsBearerContextRequest::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.new_eps_qos, Some(EpsQualityOfService::new(8)));
        assert_eq!(
            msg.tft.as_ref().map(|t| t.operation),
            Some(TftOperationCode::NoTftOperation)
        );
        let ambr = msg.apn_ambr.unwrap();
        assert_eq!(ambr.downlink_kbps(), 8640);
        assert_eq!(msg.radio_priority, Some(RadioPriority(1)));
        assert_eq!(
            msg.presence_mask(),
            modify_bearer_request_presence::NEW_EPS_QOS
                | modify_bearer_request_presence::TFT
                | modify_bearer_request_presence::APN_AMBR
                | modify_bearer_request_presence::RADIO_PRIORITY
        );

        // Encoding follows presence order, so the radio priority moves ahead
        // of the APN-AMBR.
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(
            out,
            vec![0x5B, 0x01, 0x08, 0x36, 0x01, 0xC0, 0x81, 0x5E, 0x02, 0xFE, 0xFE]
        );
    }

    #[test]
    fn test_modify_bearer_reject() {
        let msg = ModifyEpsBearerContextReject::decode_body(&mut &[0x25u8][..]).unwrap();
        assert_eq!(msg.esm_cause, EsmCause::EpsQosNotAccepted);
        assert!(ModifyEpsBearerContextReject::decode_body(&mut &[0x25u8, 0x27, 0x01, 0x00][..])
            .is_err());
    }
}
