//! Service Messages (3GPP TS 24.301 Sections 8.2.15, 8.2.24, 8.2.25)
//!
//! - Service Request - UE to network, with its own 4-octet layout
//! - Extended Service Request - UE to network
//! - Service Reject - network to UE

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasEncode, NasError, NasResult,
};
use crate::enums::{EmmCause, EmmMessageType, ProtocolDiscriminator, SecurityHeaderType};
use crate::ies::{
    CsfbResponse, DeviceProperties, EpsBearerContextStatus, GprsTimer, GprsTimer2,
    KsiAndSequenceNumber, MobileIdentity, NasKeySetIdentifier, ServiceType, ShortMac,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

// ============================================================================
// Service Request (3GPP TS 24.301 Section 8.2.25)
// ============================================================================

/// Service Request message (UE to network)
///
/// The first octet carries security header type 0xC in place of a message
/// type, so the message is decoded from its first octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceRequest {
    /// KSI and sequence number (mandatory, V)
    pub ksi_and_sequence_number: KsiAndSequenceNumber,
    /// Short MAC (mandatory, V)
    pub short_mac: ShortMac,
}

impl ServiceRequest {
    /// Message name
    pub const NAME: &'static str = "Service Request";
    /// Encoded length including the header octet
    pub const SIZE: usize = 4;

    /// Decode the whole message, header octet included
    pub fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, Self::SIZE)?;
        let octet = read_u8(buf)?;
        let pd = octet & 0x0F;
        if pd != u8::from(ProtocolDiscriminator::EpsMobilityManagement) {
            return Err(NasError::ProtocolNotSupported(pd));
        }
        if octet >> 4 != u8::from(SecurityHeaderType::ServiceRequest) {
            return Err(NasError::value(format!(
                "security header type {} on a Service Request",
                octet >> 4
            )));
        }
        Ok(Self {
            ksi_and_sequence_number: KsiAndSequenceNumber::nas_decode(buf)?,
            short_mac: ShortMac::nas_decode(buf)?,
        })
    }

    /// Encode the whole message, header octet included
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(
            (u8::from(SecurityHeaderType::ServiceRequest) << 4)
                | u8::from(ProtocolDiscriminator::EpsMobilityManagement),
        );
        self.ksi_and_sequence_number.nas_encode(buf)?;
        self.short_mac.nas_encode(buf)
    }
}

// ============================================================================
// Extended Service Request (3GPP TS 24.301 Section 8.2.15)
// ============================================================================

/// IEI values for Extended Service Request optional IEs
pub mod extended_service_request_iei {
    /// CSFB response
    pub const CSFB_RESPONSE: u8 = 0xB0;
    /// EPS bearer context status
    pub const EPS_BEARER_CONTEXT_STATUS: u8 = 0x57;
    /// Device properties
    pub const DEVICE_PROPERTIES: u8 = 0xD0;
}

/// Presence mask bits of [`ExtendedServiceRequest`]
pub mod extended_service_request_presence {
    #![allow(missing_docs)]
    pub const CSFB_RESPONSE: u32 = 1 << 0;
    pub const EPS_BEARER_CONTEXT_STATUS: u32 = 1 << 1;
    pub const DEVICE_PROPERTIES: u32 = 1 << 2;
}

/// Extended Service Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedServiceRequest {
    /// Service type (mandatory, Type 1, low nibble)
    pub service_type: ServiceType,
    /// NAS key set identifier (mandatory, Type 1, high nibble)
    pub nas_key_set_identifier: NasKeySetIdentifier,
    /// M-TMSI (mandatory, LV)
    pub m_tmsi: MobileIdentity,
    /// CSFB response (TV 1, IEI 0xB)
    pub csfb_response: Option<CsfbResponse>,
    /// EPS bearer context status (TLV, IEI 0x57)
    pub eps_bearer_context_status: Option<EpsBearerContextStatus>,
    /// Device properties (TV 1, IEI 0xD)
    pub device_properties: Option<DeviceProperties>,
}

impl EmmMessageBody for ExtendedServiceRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::ExtendedServiceRequest;
    const NAME: &'static str = "Extended Service Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use extended_service_request_iei as iei;

        check_mandatory_length(buf, 3)?;
        let octet = read_u8(buf)?;
        let mut msg = Self {
            service_type: ServiceType::decode(octet & 0x0F)?,
            nas_key_set_identifier: NasKeySetIdentifier::decode(octet >> 4)?,
            m_tmsi: MobileIdentity::nas_decode(buf)?,
            ..Default::default()
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::CSFB_RESPONSE => keep_first(
                    &mut msg.csfb_response,
                    Self::NAME,
                    raw,
                    CsfbResponse::decode(raw & 0x0F)?,
                ),
                iei::EPS_BEARER_CONTEXT_STATUS => {
                    keep_first(
                        &mut msg.eps_bearer_context_status,
                        Self::NAME,
                        raw,
                        EpsBearerContextStatus::nas_decode(buf)?,
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
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use extended_service_request_iei as iei;

        buf.put_u8((self.nas_key_set_identifier.encode() << 4) | self.service_type.encode());
        self.m_tmsi.nas_encode(buf)?;
        encode_optional_ie1(buf, iei::CSFB_RESPONSE, &self.csfb_response)?;
        encode_optional(buf, iei::EPS_BEARER_CONTEXT_STATUS, &self.eps_bearer_context_status)?;
        encode_optional_ie1(buf, iei::DEVICE_PROPERTIES, &self.device_properties)
    }

    fn presence_mask(&self) -> u32 {
        use extended_service_request_presence as p;

        presence_mask_of(&[
            (self.csfb_response.is_some(), p::CSFB_RESPONSE),
            (self.eps_bearer_context_status.is_some(), p::EPS_BEARER_CONTEXT_STATUS),
            (self.device_properties.is_some(), p::DEVICE_PROPERTIES),
        ])
    }
}

// ============================================================================
// Service Reject (3GPP TS 24.301 Section 8.2.24)
// ============================================================================

/// IEI values for Service Reject optional IEs
pub mod service_reject_iei {
    /// T3442 value
    pub const T3442_VALUE: u8 = 0x5B;
    /// T3346 value
    pub const T3346_VALUE: u8 = 0x5F;
}

/// Presence mask bits of [`ServiceReject`]
pub mod service_reject_presence {
    #![allow(missing_docs)]
    pub const T3442_VALUE: u32 = 1 << 0;
    pub const T3346_VALUE: u32 = 1 << 1;
}

/// Service Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReject {
    /// EMM cause (mandatory, V)
    pub emm_cause: EmmCause,
    /// T3442 value (TV, IEI 0x5B)
    pub t3442_value: Option<GprsTimer>,
    /// T3346 value (TLV, IEI 0x5F)
    pub t3346_value: Option<GprsTimer2>,
}

impl ServiceReject {
    /// Create a reject carrying only the cause
    pub fn new(emm_cause: EmmCause) -> Self {
        Self {
            emm_cause,
            t3442_value: None,
            t3346_value: None,
        }
    }
}

impl EmmMessageBody for ServiceReject {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::ServiceReject;
    const NAME: &'static str = "Service Reject";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        let mut msg = Self::new(EmmCause::nas_decode(buf)?);

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                service_reject_iei::T3442_VALUE => {
                    keep_first(&mut msg.t3442_value, Self::NAME, raw, GprsTimer::nas_decode(buf)?)
                }
                service_reject_iei::T3346_VALUE => {
                    keep_first(&mut msg.t3346_value, Self::NAME, raw, GprsTimer2::nas_decode(buf)?)
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.emm_cause.nas_encode(buf)?;
        encode_optional(buf, service_reject_iei::T3442_VALUE, &self.t3442_value)?;
        encode_optional(buf, service_reject_iei::T3346_VALUE, &self.t3346_value)
    }

    fn presence_mask(&self) -> u32 {
        presence_mask_of(&[
            (self.t3442_value.is_some(), service_reject_presence::T3442_VALUE),
            (self.t3346_value.is_some(), service_reject_presence::T3346_VALUE),
        ])
    }
}
