//! Bearer Resource messages (3GPP TS 24.301 Sections 8.3.7 - 8.3.10)
//!
//! UE requests for a new traffic flow aggregate or a change to an existing
//! one, plus the matching rejects.

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasEncode, NasResult,
};
use crate::enums::{EsmCause, EsmMessageType};
use crate::ies::{
    DeviceProperties, EpsQualityOfService, ExtendedProtocolConfigurationOptions,
    LinkedEpsBearerIdentity, ProtocolConfigurationOptions, TrafficFlowTemplate,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EsmMessageBody};

// ============================================================================
// Bearer Resource Allocation Request (8.3.8)
// ============================================================================

/// IEI values for Bearer Resource Allocation Request optional IEs
pub mod bearer_resource_allocation_request_iei {
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Device properties (half-octet)
    pub const DEVICE_PROPERTIES: u8 = 0xC0;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of [`BearerResourceAllocationRequest`]
pub mod bearer_resource_allocation_request_presence {
    #![allow(missing_docs)]
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 0;
    pub const DEVICE_PROPERTIES: u32 = 1 << 1;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 2;
}

/// Bearer Resource Allocation Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BearerResourceAllocationRequest {
    /// Linked EPS bearer identity (mandatory, Type 1, low nibble; high nibble spare)
    pub linked_eps_bearer_identity: LinkedEpsBearerIdentity,
    /// Traffic flow aggregate (mandatory, LV)
    pub traffic_flow_aggregate: TrafficFlowTemplate,
    /// Required traffic flow QoS (mandatory, LV)
    pub required_traffic_flow_qos: EpsQualityOfService,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Device properties (TV, IEI 0xC-)
    pub device_properties: Option<DeviceProperties>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl BearerResourceAllocationRequest {
    /// Linked EBI octet plus the shortest TFT and EPS QoS
    pub const MIN_LEN: usize = 1 + 2 + 2;
}

impl EsmMessageBody for BearerResourceAllocationRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::BearerResourceAllocationRequest;
    const NAME: &'static str = "Bearer Resource Allocation Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use bearer_resource_allocation_request_iei as iei;

        check_mandatory_length(buf, Self::MIN_LEN)?;
        let mut msg = Self {
            linked_eps_bearer_identity: LinkedEpsBearerIdentity::decode(read_u8(buf)? & 0x0F)?,
            traffic_flow_aggregate: TrafficFlowTemplate::nas_decode(buf)?,
            required_traffic_flow_qos: EpsQualityOfService::nas_decode(buf)?,
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
                iei::DEVICE_PROPERTIES => {
                    keep_first(
                        &mut msg.device_properties,
                        Self::NAME,
                        raw,
                        DeviceProperties::decode(raw & 0x0F)?,
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
        use bearer_resource_allocation_request_iei as iei;

        buf.put_u8(self.linked_eps_bearer_identity.encode());
        self.traffic_flow_aggregate.nas_encode(buf)?;
        self.required_traffic_flow_qos.nas_encode(buf)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional_ie1(buf, iei::DEVICE_PROPERTIES, &self.device_properties)?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )
    }

    fn presence_mask(&self) -> u32 {
        use bearer_resource_allocation_request_presence as p;

        presence_mask_of(&[
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (self.device_properties.is_some(), p::DEVICE_PROPERTIES),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }
}

back_off_reject!(
    /// Bearer Resource Allocation Reject message (network to UE)
    BearerResourceAllocationReject,
    BearerResourceAllocationReject,
    "Bearer Resource Allocation Reject"
);

// ============================================================================
// Bearer Resource Modification Request (8.3.10)
// ============================================================================

/// IEI values for Bearer Resource Modification Request optional IEs
pub mod bearer_resource_modification_request_iei {
    /// Required traffic flow QoS
    pub const REQUIRED_TRAFFIC_FLOW_QOS: u8 = 0x5B;
    /// ESM cause
    pub const ESM_CAUSE: u8 = 0x58;
    /// Protocol configuration options
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x27;
    /// Device properties (half-octet)
    pub const DEVICE_PROPERTIES: u8 = 0xC0;
    /// Extended protocol configuration options
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u8 = 0x7B;
}

/// Presence mask bits of [`BearerResourceModificationRequest`]
pub mod bearer_resource_modification_request_presence {
    #![allow(missing_docs)]
    pub const REQUIRED_TRAFFIC_FLOW_QOS: u32 = 1 << 0;
    pub const ESM_CAUSE: u32 = 1 << 1;
    pub const PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 2;
    pub const DEVICE_PROPERTIES: u32 = 1 << 3;
    pub const EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS: u32 = 1 << 4;
}

/// Bearer Resource Modification Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BearerResourceModificationRequest {
    /// EPS bearer identity for packet filter (mandatory, Type 1, low nibble;
    /// high nibble spare)
    pub eps_bearer_identity_for_packet_filter: LinkedEpsBearerIdentity,
    /// Traffic flow aggregate (mandatory, LV)
    pub traffic_flow_aggregate: TrafficFlowTemplate,
    /// Required traffic flow QoS (TLV, IEI 0x5B)
    pub required_traffic_flow_qos: Option<EpsQualityOfService>,
    /// ESM cause (TV, IEI 0x58)
    pub esm_cause: Option<EsmCause>,
    /// Protocol configuration options (TLV, IEI 0x27)
    pub protocol_configuration_options: Option<ProtocolConfigurationOptions>,
    /// Device properties (TV, IEI 0xC-)
    pub device_properties: Option<DeviceProperties>,
    /// Extended protocol configuration options (TLV-E, IEI 0x7B)
    pub extended_protocol_configuration_options: Option<ExtendedProtocolConfigurationOptions>,
}

impl EsmMessageBody for BearerResourceModificationRequest {
    const MESSAGE_TYPE: EsmMessageType = EsmMessageType::BearerResourceModificationRequest;
    const NAME: &'static str = "Bearer Resource Modification Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use bearer_resource_modification_request_iei as iei;

        check_mandatory_length(buf, 3)?;
        let mut msg = Self {
            eps_bearer_identity_for_packet_filter: LinkedEpsBearerIdentity::decode(
                read_u8(buf)? & 0x0F,
            )?,
            traffic_flow_aggregate: TrafficFlowTemplate::nas_decode(buf)?,
            ..Default::default()
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::REQUIRED_TRAFFIC_FLOW_QOS => {
                    keep_first(
                        &mut msg.required_traffic_flow_qos,
                        Self::NAME,
                        raw,
                        EpsQualityOfService::nas_decode(buf)?,
                    )
                }
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
                iei::DEVICE_PROPERTIES => {
                    keep_first(
                        &mut msg.device_properties,
                        Self::NAME,
                        raw,
                        DeviceProperties::decode(raw & 0x0F)?,
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
        use bearer_resource_modification_request_iei as iei;

        buf.put_u8(self.eps_bearer_identity_for_packet_filter.encode());
        self.traffic_flow_aggregate.nas_encode(buf)?;
        encode_optional(buf, iei::REQUIRED_TRAFFIC_FLOW_QOS, &self.required_traffic_flow_qos)?;
        encode_optional(buf, iei::ESM_CAUSE, &self.esm_cause)?;
        encode_optional(
            buf,
            iei::PROTOCOL_CONFIGURATION_OPTIONS,
            &self.protocol_configuration_options,
        )?;
        encode_optional_ie1(buf, iei::DEVICE_PROPERTIES, &self.device_properties)?;
        encode_optional(
            buf,
            iei::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            &self.extended_protocol_configuration_options,
        )
    }

    fn presence_mask(&self) -> u32 {
        use bearer_resource_modification_request_presence as p;

        presence_mask_of(&[
            (self.required_traffic_flow_qos.is_some(), p::REQUIRED_TRAFFIC_FLOW_QOS),
            (self.esm_cause.is_some(), p::ESM_CAUSE),
            (
                self.protocol_configuration_options.is_some(),
                p::PROTOCOL_CONFIGURATION_OPTIONS,
            ),
            (self.device_properties.is_some(), p::DEVICE_PROPERTIES),
            (
                self.extended_protocol_configuration_options.is_some(),
                p::EXTENDED_PROTOCOL_CONFIGURATION_OPTIONS,
            ),
        ])
    }
}

back_off_reject!(
    /// Bearer Resource Modification Reject message (network to UE)
    BearerResourceModificationReject,
    BearerResourceModificationReject,
    "Bearer Resource Modification Reject"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::tft::PacketFilterList;
    use crate::ies::TftOperationCode;

    #[test]
    fn test_bearer_resource_allocation_request() {
        let data = [0x05, 0x01, 0xC0, 0x01, 0x01, 0xC1];
        let msg = BearerResourceAllocationRequest::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.linked_eps_bearer_identity, LinkedEpsBearerIdentity(5));
        assert_eq!(msg.traffic_flow_aggregate.operation, TftOperationCode::NoTftOperation);
        assert_eq!(msg.required_traffic_flow_qos, EpsQualityOfService::new(1));
        assert_eq!(msg.device_properties, Some(DeviceProperties { low_priority: true }));

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_bearer_resource_allocation_request_missing_qos() {
        assert!(BearerResourceAllocationRequest::decode_body(&mut &[0x05u8, 0x01, 0xC0][..]).is_err());
    }

    #[test]
    fn test_bearer_resource_modification_request_delete_filter() {
        let msg = BearerResourceModificationRequest {
            eps_bearer_identity_for_packet_filter: LinkedEpsBearerIdentity(6),
            traffic_flow_aggregate: TrafficFlowTemplate {
                operation: TftOperationCode::DeletePacketFilters,
                packet_filters: PacketFilterList::DeleteIdentifiers(vec![2]),
                parameters: Vec::new(),
            },
            esm_cause: Some(EsmCause::RegularDeactivation),
            ..Default::default()
        };

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0x06, 0x02, 0xA1, 0x02, 0x58, 0x24]);
        assert_eq!(
            msg.presence_mask(),
            bearer_resource_modification_request_presence::ESM_CAUSE
        );
        assert_eq!(
            BearerResourceModificationRequest::decode_body(&mut out.as_slice()).unwrap(),
            msg
        );
    }

    #[test]
    fn test_bearer_resource_modification_reject() {
        let data = [0x2B, 0x37, 0x01, 0xE0];
        let msg = BearerResourceModificationReject::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.esm_cause, EsmCause::InvalidEpsBearerIdentity);
        assert_eq!(msg.back_off_timer.and_then(|t| t.seconds()), None);
        assert!(BearerResourceAllocationReject::decode_body(&mut &[0x2Bu8, 0x37][..]).is_err());
    }
}
