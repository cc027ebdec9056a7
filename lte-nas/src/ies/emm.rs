//! EPS mobility management IEs (3GPP TS 24.301 Section 9.9.2 and 9.9.3)
//!
//! Half-octet IEs implement [`InformationElement1`]; the message codec places
//! them in the high or low nibble. Everything else implements
//! [`NasDecode`] / [`NasEncode`] in its V, LV or LV-E form.

use bytes::{Buf, BufMut};
use lte_common::OctetString;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{
    check_content_len, decode_bstring, encode_bstring, encode_lv_e_with, encode_lv_with,
    read_array, read_lv, read_lv_e, read_u16, read_u32, read_u8, write_lv, InformationElement1,
    NasDecode, NasEncode, NasError, NasResult,
};
use crate::enums::EmmCause;

/// Opaque IE carried behind a 1- or 2-octet length.
macro_rules! opaque_ie {
    ($(#[$doc:meta])* $name:ident, lv, $min:expr, $max:expr) => {
        opaque_ie!(@def $(#[$doc])* $name);

        impl NasDecode for $name {
            fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
                let mut content = read_lv(buf)?;
                let len = content.len();
                check_content_len(stringify!($name), len, $min, $max)?;
                Ok(Self(decode_bstring(&mut content, len)?))
            }
        }

        impl NasEncode for $name {
            fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
                encode_lv_with(buf, |c| encode_bstring(c, &self.0).map(|_| ()))
            }

            fn encoded_len(&self) -> usize {
                1 + self.0.len()
            }
        }
    };
    ($(#[$doc:meta])* $name:ident, lv_e) => {
        opaque_ie!(@def $(#[$doc])* $name);

        impl NasDecode for $name {
            fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
                let mut content = read_lv_e(buf)?;
                let len = content.len();
                Ok(Self(decode_bstring(&mut content, len)?))
            }
        }

        impl NasEncode for $name {
            fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
                encode_lv_e_with(buf, |c| encode_bstring(c, &self.0).map(|_| ()))
            }

            fn encoded_len(&self) -> usize {
                2 + self.0.len()
            }
        }
    };
    (@def $(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name(pub OctetString);

        impl From<Vec<u8>> for $name {
            fn from(data: Vec<u8>) -> Self {
                Self(OctetString::from_vec(data))
            }
        }
    };
}

// ============================================================================
// Half-octet EMM IEs
// ============================================================================

/// Additional update result (Type 1, 9.9.3.0A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdditionalUpdateResult(pub u8);

impl AdditionalUpdateResult {
    /// No additional information
    pub const NO_ADDITIONAL_INFORMATION: u8 = 0;
    /// CS Fallback not preferred
    pub const CS_FALLBACK_NOT_PREFERRED: u8 = 1;
    /// SMS only
    pub const SMS_ONLY: u8 = 2;
}

impl InformationElement1 for AdditionalUpdateResult {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self(value & 0x03))
    }

    fn encode(&self) -> u8 {
        self.0 & 0x03
    }
}

/// Additional update type (Type 1, 9.9.3.0B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdditionalUpdateType(pub u8);

impl AdditionalUpdateType {
    /// AUTV bit: SMS only
    pub fn sms_only(&self) -> bool {
        self.0 & 0x01 != 0
    }
}

impl InformationElement1 for AdditionalUpdateType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self(value & 0x0F))
    }

    fn encode(&self) -> u8 {
        self.0 & 0x0F
    }
}

/// CSFB response (Type 1, 9.9.3.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsfbResponse {
    /// CS fallback accepted by the UE
    pub accepted: bool,
}

impl InformationElement1 for CsfbResponse {
    fn decode(value: u8) -> NasResult<Self> {
        match value & 0x07 {
            0 => Ok(Self { accepted: false }),
            1 => Ok(Self { accepted: true }),
            v => Err(NasError::value(format!("CSFB response {v}"))),
        }
    }

    fn encode(&self) -> u8 {
        u8::from(self.accepted)
    }
}

/// Detach type (Type 1, 9.9.3.7)
///
/// The type of detach codes differ by direction: 1 EPS, 2 IMSI, 3 combined
/// from the UE; 1 re-attach required, 2 re-attach not required, 3 IMSI
/// detach from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetachType {
    /// Switch off (UE originating only)
    pub switch_off: bool,
    /// Type of detach (3 bits)
    pub type_of_detach: u8,
}

impl DetachType {
    /// EPS detach / re-attach required
    pub const EPS: u8 = 1;
    /// IMSI detach / re-attach not required
    pub const IMSI: u8 = 2;
    /// Combined EPS/IMSI detach / IMSI detach
    pub const COMBINED: u8 = 3;

    /// Create a detach type
    pub fn new(switch_off: bool, type_of_detach: u8) -> Self {
        Self {
            switch_off,
            type_of_detach: type_of_detach & 0x07,
        }
    }
}

impl InformationElement1 for DetachType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self::new(value & 0x08 != 0, value))
    }

    fn encode(&self) -> u8 {
        (u8::from(self.switch_off) << 3) | (self.type_of_detach & 0x07)
    }
}

/// Extended EMM cause (Type 1, 9.9.3.26A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedEmmCause {
    /// E-UTRAN not allowed
    pub eutran_not_allowed: bool,
    /// Satellite / EPS optimization information bit
    pub eps_optimization_info: bool,
    /// NB-IoT not allowed
    pub nbiot_not_allowed: bool,
}

impl InformationElement1 for ExtendedEmmCause {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            eutran_not_allowed: value & 0x01 != 0,
            eps_optimization_info: value & 0x02 != 0,
            nbiot_not_allowed: value & 0x04 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.eutran_not_allowed)
            | (u8::from(self.eps_optimization_info) << 1)
            | (u8::from(self.nbiot_not_allowed) << 2)
    }
}

/// EPS attach type (Type 1, 9.9.3.11)
///
/// Unused values are interpreted as EPS attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive)]
#[repr(u8)]
pub enum EpsAttachType {
    #[default]
    EpsAttach = 1,
    CombinedEpsImsiAttach = 2,
    EpsEmergencyAttach = 6,
}

impl InformationElement1 for EpsAttachType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(match value & 0x07 {
            2 => EpsAttachType::CombinedEpsImsiAttach,
            6 => EpsAttachType::EpsEmergencyAttach,
            _ => EpsAttachType::EpsAttach,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(*self)
    }
}

/// EPS attach result (Type 1, 9.9.3.10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EpsAttachResult {
    #[default]
    EpsOnly = 1,
    CombinedEpsImsiAttach = 2,
}

impl InformationElement1 for EpsAttachResult {
    fn decode(value: u8) -> NasResult<Self> {
        EpsAttachResult::try_from(value & 0x07)
            .map_err(|_| NasError::value(format!("EPS attach result {}", value & 0x07)))
    }

    fn encode(&self) -> u8 {
        u8::from(*self)
    }
}

/// EPS update result (Type 1, 9.9.3.13)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EpsUpdateResult {
    #[default]
    TaUpdated = 0,
    CombinedTaLaUpdated = 1,
    TaUpdatedIsrActivated = 4,
    CombinedTaLaUpdatedIsrActivated = 5,
}

impl InformationElement1 for EpsUpdateResult {
    fn decode(value: u8) -> NasResult<Self> {
        EpsUpdateResult::try_from(value & 0x07)
            .map_err(|_| NasError::value(format!("EPS update result {}", value & 0x07)))
    }

    fn encode(&self) -> u8 {
        u8::from(*self)
    }
}

/// EPS update type value (bits 1-3 of 9.9.3.14)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EpsUpdateTypeValue {
    #[default]
    TaUpdating = 0,
    CombinedTaLaUpdating = 1,
    CombinedTaLaUpdatingWithImsiAttach = 2,
    PeriodicUpdating = 3,
}

/// EPS update type (Type 1, 9.9.3.14)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpsUpdateType {
    /// Bearer establishment requested
    pub active: bool,
    /// Update type value
    pub value: EpsUpdateTypeValue,
}

impl InformationElement1 for EpsUpdateType {
    fn decode(value: u8) -> NasResult<Self> {
        let v = value & 0x07;
        Ok(Self {
            active: value & 0x08 != 0,
            value: EpsUpdateTypeValue::try_from(v)
                .map_err(|_| NasError::value(format!("EPS update type {v}")))?,
        })
    }

    fn encode(&self) -> u8 {
        (u8::from(self.active) << 3) | u8::from(self.value)
    }
}

/// GUTI type (Type 1, 9.9.3.45)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GutiType {
    /// The GUTI is mapped from a P-TMSI / RAI
    pub mapped: bool,
}

impl InformationElement1 for GutiType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            mapped: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.mapped)
    }
}

/// Identity type 2 (Type 1, 24.008 10.5.5.9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum IdentityType2 {
    #[default]
    Imsi = 1,
    Imei = 2,
    Imeisv = 3,
    Tmsi = 4,
}

impl InformationElement1 for IdentityType2 {
    fn decode(value: u8) -> NasResult<Self> {
        IdentityType2::try_from(value & 0x07)
            .map_err(|_| NasError::value(format!("identity type 2 value {}", value & 0x07)))
    }

    fn encode(&self) -> u8 {
        u8::from(*self)
    }
}

/// IMEISV request (Type 1, 24.008 10.5.5.10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImeisvRequest {
    /// IMEISV requested
    pub requested: bool,
}

impl InformationElement1 for ImeisvRequest {
    fn decode(value: u8) -> NasResult<Self> {
        match value & 0x07 {
            0 => Ok(Self { requested: false }),
            1 => Ok(Self { requested: true }),
            v => Err(NasError::value(format!("IMEISV request {v}"))),
        }
    }

    fn encode(&self) -> u8 {
        u8::from(self.requested)
    }
}

/// NAS key set identifier (Type 1, 9.9.3.21)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NasKeySetIdentifier {
    /// Type of security context: false native, true mapped
    pub mapped: bool,
    /// Key set identifier (3 bits)
    pub ksi: u8,
}

impl NasKeySetIdentifier {
    /// No key is available
    pub const NO_KEY: u8 = 7;

    /// Native context with `ksi`
    pub fn native(ksi: u8) -> Self {
        Self {
            mapped: false,
            ksi: ksi & 0x07,
        }
    }

    /// No key available
    pub fn no_key() -> Self {
        Self::native(Self::NO_KEY)
    }

    /// True when no key is available
    pub fn is_no_key(&self) -> bool {
        self.ksi == Self::NO_KEY
    }
}

impl Default for NasKeySetIdentifier {
    fn default() -> Self {
        Self::no_key()
    }
}

impl InformationElement1 for NasKeySetIdentifier {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            mapped: value & 0x08 != 0,
            ksi: value & 0x07,
        })
    }

    fn encode(&self) -> u8 {
        (u8::from(self.mapped) << 3) | (self.ksi & 0x07)
    }
}

/// Service type (Type 1, 9.9.3.27)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceType(pub u8);

impl ServiceType {
    /// Mobile originating CS fallback or 1xCS fallback
    pub const MO_CSFB: u8 = 0;
    /// Mobile terminating CS fallback or 1xCS fallback
    pub const MT_CSFB: u8 = 1;
    /// Mobile originating CS fallback emergency call
    pub const MO_CSFB_EMERGENCY: u8 = 2;
    /// Packet services via S1
    pub const PACKET_SERVICES_VIA_S1: u8 = 8;
}

impl InformationElement1 for ServiceType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self(value & 0x0F))
    }

    fn encode(&self) -> u8 {
        self.0 & 0x0F
    }
}

/// UE radio capability information update needed (Type 1, 9.9.3.35)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UeRadioCapabilityInformationUpdateNeeded {
    /// The MME shall delete the stored UE radio capability information
    pub update_needed: bool,
}

impl InformationElement1 for UeRadioCapabilityInformationUpdateNeeded {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            update_needed: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.update_needed)
    }
}

/// Device properties (Type 1, 9.9.2.0A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceProperties {
    /// MS is configured for NAS signalling low priority
    pub low_priority: bool,
}

impl InformationElement1 for DeviceProperties {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            low_priority: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.low_priority)
    }
}

/// Paging identity (Type 3, 9.9.3.25A, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagingIdentity {
    /// Paged with TMSI rather than IMSI
    pub tmsi: bool,
}

impl NasDecode for PagingIdentity {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(Self {
            tmsi: read_u8(buf)? & 0x01 != 0,
        })
    }
}

impl NasEncode for PagingIdentity {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(u8::from(self.tmsi));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

// ============================================================================
// EMM cause (9.9.3.9)
// ============================================================================

impl NasDecode for EmmCause {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(EmmCause::from(read_u8(buf)?))
    }
}

impl NasEncode for EmmCause {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(u8::from(*self));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

// ============================================================================
// EPS bearer context status (9.9.2.1)
// ============================================================================

/// EPS bearer context status (Type 4, 2 content octets)
///
/// Bit `n` of the bitmap is EBI(n): octet 3 carries EBI(0)-EBI(7), octet 4
/// EBI(8)-EBI(15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpsBearerContextStatus(pub u16);

impl EpsBearerContextStatus {
    /// True if the bearer context `ebi` is active
    pub fn is_active(&self, ebi: u8) -> bool {
        ebi < 16 && self.0 & (1 << ebi) != 0
    }

    /// Mark `ebi` active
    pub fn set_active(&mut self, ebi: u8) {
        if ebi < 16 {
            self.0 |= 1 << ebi;
        }
    }
}

impl NasDecode for EpsBearerContextStatus {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("EPS bearer context status", content.len(), 2, 2)?;
        let octets = [content.get_u8(), content.get_u8()];
        Ok(Self(u16::from_le_bytes(octets)))
    }
}

impl NasEncode for EpsBearerContextStatus {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &self.0.to_le_bytes())
    }

    fn encoded_len(&self) -> usize {
        3
    }
}

// ============================================================================
// EPS network feature support (9.9.3.12A)
// ============================================================================

/// EPS network feature support (Type 4, 1-2 content octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpsNetworkFeatureSupport {
    /// Octet 3 flags
    pub features: u8,
    /// Octet 4 flags, when sent
    pub features2: Option<u8>,
}

impl EpsNetworkFeatureSupport {
    /// IMS voice over PS session in S1 mode supported
    pub const IMS_VOPS: u8 = 0x01;
    /// Emergency bearer services in S1 mode supported
    pub const EMC_BS: u8 = 0x02;
    /// Location services via EPC supported
    pub const EPC_LCS: u8 = 0x04;
    /// Extended service request for packet services supported
    pub const ESR_PS: u8 = 0x20;

    /// True if every bit of `flag` is set in octet 3
    pub fn supports(&self, flag: u8) -> bool {
        self.features & flag == flag
    }
}

impl NasDecode for EpsNetworkFeatureSupport {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("EPS network feature support", content.len(), 1, 2)?;
        let features = content.get_u8();
        let features2 = content.has_remaining().then(|| content.get_u8());
        Ok(Self {
            features,
            features2,
        })
    }
}

impl NasEncode for EpsNetworkFeatureSupport {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        match self.features2 {
            Some(f2) => write_lv(buf, &[self.features, f2]),
            None => write_lv(buf, &[self.features]),
        }
    }

    fn encoded_len(&self) -> usize {
        2 + usize::from(self.features2.is_some())
    }
}

// ============================================================================
// Containers
// ============================================================================

opaque_ie!(
    /// ESM message container (Type 6, 9.9.3.15)
    ///
    /// Holds one complete plain ESM message.
    EsmMessageContainer,
    lv_e
);

opaque_ie!(
    /// Generic message container (Type 6, 9.9.3.43)
    GenericMessageContainer,
    lv_e
);

opaque_ie!(
    /// Replayed NAS message container (Type 6, 9.9.3.51)
    ///
    /// The initial NAS message as the UE first sent it, kept unparsed.
    ReplayedNasMessageContainer,
    lv_e
);

opaque_ie!(
    /// Additional information (Type 4, 9.9.2.0)
    AdditionalInformation,
    lv,
    1,
    255
);

opaque_ie!(
    /// NAS message container (Type 4, 9.9.3.22, 2-251 content octets)
    ///
    /// Carries an SMS message as defined in 3GPP TS 24.011.
    NasMessageContainer,
    lv,
    2,
    251
);

opaque_ie!(
    /// Authentication response parameter (Type 4, 9.9.3.4, RES of 4-16 octets)
    AuthenticationResponseParameter,
    lv,
    4,
    16
);

opaque_ie!(
    /// CLI (Type 4, 9.9.3.38)
    ///
    /// Calling party BCD number contents of 24.008 10.5.4.9.
    Cli,
    lv,
    1,
    12
);

opaque_ie!(
    /// LCS client identity (Type 4, 9.9.3.41)
    LcsClientIdentity,
    lv,
    1,
    255
);

/// Generic message container type (Type 3, 9.9.3.42, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenericMessageContainerType(pub u8);

impl GenericMessageContainerType {
    /// LTE Positioning Protocol message container
    pub const LPP: u8 = 1;
    /// Location services message container
    pub const LOCATION_SERVICES: u8 = 2;
}

impl NasDecode for GenericMessageContainerType {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(Self(read_u8(buf)?))
    }
}

impl NasEncode for GenericMessageContainerType {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

// ============================================================================
// Security IEs
// ============================================================================

/// Hash MME (Type 4, 9.9.3.50, 8 content octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HashMme(pub [u8; 8]);

impl NasDecode for HashMme {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("HashMME", content.len(), 8, 8)?;
        read_array(&mut content).map(Self)
    }
}

impl NasEncode for HashMme {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &self.0)
    }

    fn encoded_len(&self) -> usize {
        9
    }
}

/// KSI and sequence number (Type 3, 9.9.3.19, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KsiAndSequenceNumber {
    /// Key set identifier (bits 6-8)
    pub ksi: u8,
    /// Five least significant bits of the NAS COUNT
    pub sequence_number: u8,
}

impl NasDecode for KsiAndSequenceNumber {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let octet = read_u8(buf)?;
        Ok(Self {
            ksi: octet >> 5,
            sequence_number: octet & 0x1F,
        })
    }
}

impl NasEncode for KsiAndSequenceNumber {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(((self.ksi & 0x07) << 5) | (self.sequence_number & 0x1F));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

/// NAS security algorithms (Type 3, 9.9.3.23, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NasSecurityAlgorithms {
    /// Type of ciphering algorithm, EEA0-EEA7
    pub ciphering: u8,
    /// Type of integrity protection algorithm, EIA0-EIA7
    pub integrity: u8,
}

impl NasDecode for NasSecurityAlgorithms {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let octet = read_u8(buf)?;
        if octet & 0x88 != 0 {
            return Err(NasError::value(format!(
                "NAS security algorithms spare bits set in 0x{octet:02X}"
            )));
        }
        Ok(Self {
            ciphering: (octet >> 4) & 0x07,
            integrity: octet & 0x07,
        })
    }
}

impl NasEncode for NasSecurityAlgorithms {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(((self.ciphering & 0x07) << 4) | (self.integrity & 0x07));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

/// Nonce (Type 3, 9.9.3.25, 4 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nonce(pub u32);

impl NasDecode for Nonce {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        read_u32(buf).map(Self)
    }
}

impl NasEncode for Nonce {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u32(self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        4
    }
}

/// Short MAC (Type 3, 9.9.3.28, 2 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortMac(pub u16);

impl NasDecode for ShortMac {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        read_u16(buf).map(Self)
    }
}

impl NasEncode for ShortMac {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u16(self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// CS service notification IEs
// ============================================================================

/// SS code (Type 3, 9.9.3.39, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SsCode(pub u8);

impl NasDecode for SsCode {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        read_u8(buf).map(Self)
    }
}

impl NasEncode for SsCode {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

/// LCS indicator (Type 3, 9.9.3.40, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LcsIndicator(pub u8);

impl LcsIndicator {
    /// Mobile terminating location request
    pub const MT_LR: u8 = 1;
}

impl NasDecode for LcsIndicator {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        read_u8(buf).map(Self)
    }
}

impl NasEncode for LcsIndicator {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}
