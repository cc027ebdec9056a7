//! Activate Default EPS Bearer Context messages (3GPP TS 24.301 Sections 8.3.4 - 8.3.6)

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, InformationElement1, NasDecode,
    NasEncode, NasResult,
};
use crate::enums::{EsmCause, EsmMessageType};
use crate::ies::{
    AccessPointName, ApnAggregateMaximumBitRate, ConnectivityType, EpsQualityOfService,
    ExtendedApnAggregateMaximumBitRate, ExtendedProtocolConfigurationOptions,
    LlcServiceAccessPointIdentifier, PacketFlowIdentifier, PdnAddress,
    ProtocolConfigurationOptions, QualityOfService, RadioPriority, TransactionIdentifier,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

/// IEI values for Activate Default EPS Bearer Context Request optional IEs
pub mod activate_default_bearer_request_iei {
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
    /// APN-AMBR
    pub const APN_AMBR: u8 = 0x5E;
    /// ESM cause
    pub const ESM_CAUSE: u8 = 0x58;
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Connectivity type (half-octet)
    pub const CONNECTIVITY_TYPE: u8 = 0xB0;
    /// Extended APN-AMBR
    pub const EXTENDED_APN_AMBR: u8 = 0x5F;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of [`ActivateDefaultEpsBearerContextRequest`]
pub mod activate_default_bearer_request_presence {
    #![allow(missing_docs)]
    pub const TRANSACTION_IDENTIFIER: u32 = 1 << 0;
    pub const NEGOTIATED_QOS: u32 = 1 << 1;
    pub const NEGOTIATED_LLC_SAPI: u32 = 1 << 2;
    pub const RADIO_PRIORITY: u32 = 1 << 3;
    pub const PACKET_FLOW_IDENTIFIER: u32 = 1 << 4;
    pub const APN_AMBR: u32 = 1 << 5;
    pub const ESM_CAUSE: u32 = 1 << 6;
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 7;
    pub const CONNECTIVITY_TYPE: u32 = 1 << 8;
    pub const EXTENDED_APN_AMBR: u32 = 1 << 9;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 10;
}

/// Activate Default EPS Bearer Context Request message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivateDefaultEpsBearerContextRequest {
    /// EPS QoS (mandatory, LV)
    pub eps_qos: EpsQualityOfService,
    /// Access point name (mandatory, LV)
    pub access_point_name: AccessPointName,
    /// PDN address (mandatory, LV)
    pub pdn_address: PdnAddress,
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
    /// APN-AMBR (TLV, IEI 0x5E)
    pub apn_ambr: Option<ApnAggregateMaximumBitRate>,
    /// ESM cause (TV, IEI 0x58)
    pub esm_cause: Option<EsmCause>,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Connectivity type (TV, IEI 0xB-)
    pub connectivity_type: Option<ConnectivityType>,
    /// Extended APN-AMBR (TLV, IEI 0x5F)
    pub extended_apn_ambr: Option<ExtendedApnAggregateMaximumBitRate>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl ActivateDefaultEpsBearerContextRequest {
    /// Shortest EPS QoS, APN and PDN address
    pub const MIN_LEN: usize = 2 + 2 + 2;

    /// Create a request with the mandatory IEs
    pub fn new(
        eps_qos: EpsQualityOfService,
        access_point_name: AccessPointName,
        pdn_address: PdnAddress,
    ) -> Self {
        Self {
            eps_qos,
            access_point_name,
            pdn_address,
            ..Default::default()
        }
    }
}

impl EsmMessageBody for ActivateDefaultEpsBearerContextRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::ActivateDefaultEpsBearerContextRequest;
    const NAME: &'static str = "Activate Default EPS Bearer Context Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use activate_default_bearer_request_iei as iei;

        check_mandatory_length(buf, Self::MIN_LEN)?;
        let mut msg = Self::new(
            EpsQualityOfService::nas_decode(buf)?,
            AccessPointName::nas_decode(buf)?,
            PdnAddress::nas_decode(buf)?,
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
                iei::APN_AMBR => keep_first(
                    &mut msg.apn_ambr,
                    Self::NAME,
                    raw,
                    ApnAggregateMaximumBitRate::nas_decode(buf)?,
                ),
                iei::ESM_CAUSE => keep_first(
                    &mut msg.esm_cause,
                    Self::NAME,
                    raw,
                    EsmCause::nas_decode(buf)?,
                ),
                iei::PROTOCOL_CONFIGURATION_OPTIONS => {
                    keep_first(
                        &mut msg.protocol_configuration_options,
                        Self::NAME,
                        raw,
                        ProtocolConfigurationOptions::nas_decode(buf)?,
                    )
                }
                iei::CONNECTIVITY_TYPE => {
                    keep_first(
                        &mut msg.connectivity_type,
                        Self::NAME,
                        raw,
                        ConnectivityType::decode(raw & 0x0F)?,
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
        use activate_default_bearer_request_iei as iei;

        self.eps_qos.nas_encode(buf)?;
        self.access_point_name.nas_encode(buf)?;
        self.pdn_address.nas_encode(buf)?;

        encode_optional(buf, iei::TRANSACTION_IDENTIFIER, &self.transaction_identifier)?;
        encode_optional(buf, iei::NEGOTIATED_QOS, &self.negotiated_qos)?;
        encode_optional(buf, iei::NEGOTIATED_LLC_SAPI, &self.negotiated_llc_sapi)?;
        encode_optional_ie1(buf, iei::RADIO_PRIORITY, &self.radio_priority)?;
        encode_optional(buf, iei::PACKET_FLOW_IDENTIFIER, &self.packet_flow_identifier)?;
        encode_optional(buf, iei::APN_AMBR, &self.apn_ambr)?;
        encode_optional(buf, iei::ESM_CAUSE, &self.esm_cause)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional_ie1(buf, iei::CONNECTIVITY_TYPE, &self.connectivity_type)?;
        encode_optional(buf, iei::EXTENDED_APN_AMBR, &self.extended_apn_ambr)?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )
    }

    fn presence_mask(&self) -> u32 {
        use activate_default_bearer_request_presence as p;

        presence_mask_of(&[
            (self.transaction_identifier.is_some(), p::TRANSACTION_IDENTIFIER),
            (self.negotiated_qos.is_some(), p::NEGOTIATED_QOS),
            (self.negotiated_llc_sapi.is_some(), p::NEGOTIATED_LLC_SAPI),
            (self.radio_priority.is_some(), p::RADIO_PRIORITY),
            (self.packet_flow_identifier.is_some(), p::PACKET_FLOW_IDENTIFIER),
            (self.apn_ambr.is_some(), p::APN_AMBR),
            (self.esm_cause.is_some(), p::ESM_CAUSE),
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (self.connectivity_type.is_some(), p::CONNECTIVITY_TYPE),
            (self.extended_apn_ambr.is_some(), p::EXTENDED_APN_AMBR),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }
}

pco_message!(
    /// Activate Default EPS Bearer Context Accept message (UE to network)
    ActivateDefaultEpsBearerContextAccept,
    ActivateDefaultEpsBearerContextAccept,
    "Activate Default EPS Bearer Context Accept"
);

pco_message!(
    /// Activate Default EPS Bearer Context Reject message (UE to network)
    cause ActivateDefaultEpsBearerContextReject,
    ActivateDefaultEpsBearerContextReject,
    "Activate Default EPS Bearer Context Reject"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::pco::pco_id;
    use crate::ies::ProtocolOrContainer;
    use std::net::Ipv4Addr;

    fn sample_request() -> ActivateDefaultEpsBearerContextRequest {
        let mut msg = ActivateDefaultEpsBearerContextRequest::new(
            EpsQualityOfService::new(9),
            AccessPointName::new("internet"),
            PdnAddress::Ipv4(Ipv4Addr::new(10, 45, 0, 2)),
        );
        msg.apn_ambr = Some(ApnAggregateMaximumBitRate::from_kbps(8640, 8640));
        msg.protocol_configuration_options = Some(ProtocolConfigurationOptions {
            configuration_protocol: 0,
            options: vec![ProtocolOrContainer::new(
                pco_id::DNS_SERVER_IPV4,
                vec![8, 8, 8, 8],
            )],
        });
        msg
    }

    #[test]
    fn test_default_bearer_request_mandatory_layout() {
        let msg = ActivateDefaultEpsBearerContextRequest::new(
            EpsQualityOfService::new(9),
            AccessPointName::new("internet"),
            PdnAddress::Ipv4(Ipv4Addr::new(10, 45, 0, 2)),
        );
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(
            out,
            vec![
                0x01, 0x09, 0x09, 0x08, b'i', b'n', b't', b'e', b'r', b'n', b'e', b't', 0x05,
                0x01, 10, 45, 0, 2,
            ]
        );
        assert_eq!(msg.presence_mask(), 0);
    }

    #[test]
    fn test_default_bearer_request_round_trip() {
        let msg = sample_request();
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();

        let decoded = ActivateDefaultEpsBearerContextRequest::decode_body(&mut out.as_slice())
            .unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(
            decoded.presence_mask(),
            activate_default_bearer_request_presence::APN_AMBR
                | activate_default_bearer_request_presence::PROTOCOL_CONFIGURATION_OPTIONS
        );
        let pco = decoded.protocol_configuration_options.unwrap();
        assert_eq!(
            pco.find(pco_id::DNS_SERVER_IPV4).unwrap().contents.data(),
            &[8, 8, 8, 8]
        );
    }

    #[test]
    fn test_default_bearer_request_half_octet_optionals() {
        let mut data = vec![0x01, 0x09, 0x02, 0x01, b'a', 0x05, 0x01, 1, 2, 3, 4];
        data.extend([0x84, 0xB1]);
        let msg = ActivateDefaultEpsBearerContextRequest::decode_body(&mut data.as_slice())
            .unwrap();
        assert_eq!(msg.radio_priority, Some(RadioPriority(4)));
        assert_eq!(msg.connectivity_type, Some(ConnectivityType { lipa: true }));

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_default_bearer_request_truncated() {
        let mut out = Vec::new();
        sample_request().encode_body(&mut out).unwrap();
        for len in 0..ActivateDefaultEpsBearerContextRequest::MIN_LEN {
            assert!(
                ActivateDefaultEpsBearerContextRequest::decode_body(&mut &out[..len]).is_err(),
                "decoded from {len} octets"
            );
        }
        // Cutting inside an optional IE fails as well.
        assert!(
            ActivateDefaultEpsBearerContextRequest::decode_body(&mut &out[..out.len() - 2]).is_err()
        );
    }

    #[test]
    fn test_default_bearer_accept_and_reject() {
        let accept = ActivateDefaultEpsBearerContextAccept::decode_body(&mut &[0u8; 0][..]).unwrap();
        assert_eq!(accept, ActivateDefaultEpsBearerContextAccept::default());

        let reject = ActivateDefaultEpsBearerContextReject::new(EsmCause::InsufficientResources);
        let mut out = Vec::new();
        reject.encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0x1A]);
        assert_eq!(
            ActivateDefaultEpsBearerContextReject::decode_body(&mut out.as_slice()).unwrap(),
            reject
        );
        assert!(ActivateDefaultEpsBearerContextReject::decode_body(&mut &[0u8; 0][..]).is_err());
    }
}
