//! Tracking Area Update messages (3GPP TS 24.301 Sections 8.2.26 - 8.2.29)

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasEncode, NasResult,
};
use crate::enums::{EmmCause, EmmMessageType};
use crate::ies::{
    AdditionalUpdateResult, AdditionalUpdateType, CipheringKeySequenceNumber, DeviceProperties,
    DrxParameter, EmergencyNumberList, EpsBearerContextStatus, EpsMobileIdentity,
    EpsNetworkFeatureSupport, EpsUpdateResult, EpsUpdateType, ExtendedDrxParameters,
    ExtendedEmmCause, GprsTimer, GprsTimer2, GprsTimer3, GutiType, LocationAreaIdentification,
    MobileIdentity, MsClassmark2, MsClassmark3, MsNetworkCapability, MsNetworkFeatureSupport,
    NasKeySetIdentifier, NetworkResourceIdentifierContainer, Nonce, PTmsiSignature, PlmnList,
    SupportedCodecList, TmsiStatus, TrackingAreaIdentity, TrackingAreaIdentityList,
    UeAdditionalSecurityCapability, UeNetworkCapability, UeRadioCapabilityInformationUpdateNeeded,
    VoiceDomainPreference,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

// ============================================================================
// Tracking Area Update Request (3GPP TS 24.301 Section 8.2.29)
// ============================================================================

/// IEI values for Tracking Area Update Request optional IEs
pub mod tau_request_iei {
    /// Non-current native NAS key set identifier
    pub const NON_CURRENT_NATIVE_NAS_KSI: u8 = 0xB0;
    /// GPRS ciphering key sequence number
    pub const GPRS_CKSN: u8 = 0x80;
    /// Old P-TMSI signature
    pub const OLD_PTMSI_SIGNATURE: u8 = 0x19;
    /// Additional GUTI
    pub const ADDITIONAL_GUTI: u8 = 0x50;
    /// NonceUE
    pub const NONCE_UE: u8 = 0x55;
    /// UE network capability
    pub const UE_NETWORK_CAPABILITY: u8 = 0x58;
    /// Last visited registered TAI
    pub const LAST_VISITED_REGISTERED_TAI: u8 = 0x52;
    /// DRX parameter
    pub const DRX_PARAMETER: u8 = 0x5C;
    /// UE radio capability information update needed
    pub const UE_RADIO_CAPABILITY_UPDATE_NEEDED: u8 = 0xA0;
    /// EPS bearer context status
    pub const EPS_BEARER_CONTEXT_STATUS: u8 = 0x57;
    /// MS network capability
    pub const MS_NETWORK_CAPABILITY: u8 = 0x31;
    /// Old location area identification
    pub const OLD_LOCATION_AREA_IDENTIFICATION: u8 = 0x13;
    /// TMSI status
    pub const TMSI_STATUS: u8 = 0x90;
    /// Mobile station classmark 2
    pub const MS_CLASSMARK_2: u8 = 0x11;
    /// Mobile station classmark 3
    pub const MS_CLASSMARK_3: u8 = 0x20;
    /// Supported codecs
    pub const SUPPORTED_CODECS: u8 = 0x40;
    /// Additional update type
    pub const ADDITIONAL_UPDATE_TYPE: u8 = 0xF0;
    /// Voice domain preference and UE's usage setting
    pub const VOICE_DOMAIN_PREFERENCE: u8 = 0x5D;
    /// Old GUTI type
    pub const OLD_GUTI_TYPE: u8 = 0xE0;
    /// Device properties
    pub const DEVICE_PROPERTIES: u8 = 0xD0;
    /// MS network feature support
    pub const MS_NETWORK_FEATURE_SUPPORT: u8 = 0xC0;
    /// TMSI based NRI container
    pub const TMSI_BASED_NRI_CONTAINER: u8 = 0x10;
    /// T3324 value
    pub const T3324_VALUE: u8 = 0x6A;
    /// T3412 extended value
    pub const T3412_EXTENDED_VALUE: u8 = 0x5E;
    /// Extended DRX parameters
    pub const EXTENDED_DRX_PARAMETERS: u8 = 0x6E;
    /// UE additional security capability
    pub const UE_ADDITIONAL_SECURITY_CAPABILITY: u8 = 0x6F;
}

/// Presence mask bits of [`TrackingAreaUpdateRequest`]
pub mod tau_request_presence {
    #![allow(missing_docs)]
    pub const NON_CURRENT_NATIVE_NAS_KSI: u32 = 1 << 0;
    pub const GPRS_CKSN: u32 = 1 << 1;
    pub const OLD_PTMSI_SIGNATURE: u32 = 1 << 2;
    pub const ADDITIONAL_GUTI: u32 = 1 << 3;
    pub const NONCE_UE: u32 = 1 << 4;
    pub const UE_NETWORK_CAPABILITY: u32 = 1 << 5;
    pub const LAST_VISITED_REGISTERED_TAI: u32 = 1 << 6;
    pub const DRX_PARAMETER: u32 = 1 << 7;
    pub const UE_RADIO_CAPABILITY_UPDATE_NEEDED: u32 = 1 << 8;
    pub const EPS_BEARER_CONTEXT_STATUS: u32 = 1 << 9;
    pub const MS_NETWORK_CAPABILITY: u32 = 1 << 10;
    pub const OLD_LOCATION_AREA_IDENTIFICATION: u32 = 1 << 11;
    pub const TMSI_STATUS: u32 = 1 << 12;
    pub const MS_CLASSMARK_2: u32 = 1 << 13;
    pub const MS_CLASSMARK_3: u32 = 1 << 14;
    pub const SUPPORTED_CODECS: u32 = 1 << 15;
    pub const ADDITIONAL_UPDATE_TYPE: u32 = 1 << 16;
    pub const VOICE_DOMAIN_PREFERENCE: u32 = 1 << 17;
    pub const OLD_GUTI_TYPE: u32 = 1 << 18;
    pub const DEVICE_PROPERTIES: u32 = 1 << 19;
    pub const MS_NETWORK_FEATURE_SUPPORT: u32 = 1 << 20;
    pub const TMSI_BASED_NRI_CONTAINER: u32 = 1 << 21;
    pub const T3324_VALUE: u32 = 1 << 22;
    pub const T3412_EXTENDED_VALUE: u32 = 1 << 23;
    pub const EXTENDED_DRX_PARAMETERS: u32 = 1 << 24;
    pub const UE_ADDITIONAL_SECURITY_CAPABILITY: u32 = 1 << 25;
}

/// Tracking Area Update Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackingAreaUpdateRequest {
    /// EPS update type (mandatory, Type 1, low nibble)
    pub eps_update_type: EpsUpdateType,
    /// NAS key set identifier (mandatory, Type 1, high nibble)
    pub nas_key_set_identifier: NasKeySetIdentifier,
    /// Old GUTI (mandatory, LV)
    pub old_guti: EpsMobileIdentity,
    /// Non-current native NAS key set identifier (TV 1, IEI 0xB)
    pub non_current_native_nas_ksi: Option<NasKeySetIdentifier>,
    /// GPRS ciphering key sequence number (TV 1, IEI 0x8)
    pub gprs_cksn: Option<CipheringKeySequenceNumber>,
    /// Old P-TMSI signature (TV, IEI 0x19)
    pub old_ptmsi_signature: Option<PTmsiSignature>,
    /// Additional GUTI (TLV, IEI 0x50)
    pub additional_guti: Option<EpsMobileIdentity>,
    /// NonceUE (TV, IEI 0x55)
    pub nonce_ue: Option<Nonce>,
    /// UE network capability (TLV, IEI 0x58)
    pub ue_network_capability: Option<UeNetworkCapability>,
    /// Last visited registered TAI (TV, IEI 0x52)
    pub last_visited_registered_tai: Option<TrackingAreaIdentity>,
    /// DRX parameter (TV, IEI 0x5C)
    pub drx_parameter: Option<DrxParameter>,
    /// UE radio capability information update needed (TV 1, IEI 0xA)
    pub ue_radio_capability_update_needed: Option<UeRadioCapabilityInformationUpdateNeeded>,
    /// EPS bearer context status (TLV, IEI 0x57)
    pub eps_bearer_context_status: Option<EpsBearerContextStatus>,
    /// MS network capability (TLV, IEI 0x31)
    pub ms_network_capability: Option<MsNetworkCapability>,
    /// Old location area identification (TV, IEI 0x13)
    pub old_location_area_identification: Option<LocationAreaIdentification>,
    /// TMSI status (TV 1, IEI 0x9)
    pub tmsi_status: Option<TmsiStatus>,
    /// Mobile station classmark 2 (TLV, IEI 0x11)
    pub ms_classmark_2: Option<MsClassmark2>,
    /// Mobile station classmark 3 (TLV, IEI 0x20)
    pub ms_classmark_3: Option<MsClassmark3>,
    /// Supported codecs (TLV, IEI 0x40)
    pub supported_codecs: Option<SupportedCodecList>,
    /// Additional update type (TV 1, IEI 0xF)
    pub additional_update_type: Option<AdditionalUpdateType>,
    /// Voice domain preference and UE's usage setting (TLV, IEI 0x5D)
    pub voice_domain_preference: Option<VoiceDomainPreference>,
    /// Old GUTI type (TV 1, IEI 0xE)
    pub old_guti_type: Option<GutiType>,
    /// Device properties (TV 1, IEI 0xD)
    pub device_properties: Option<DeviceProperties>,
    /// MS network feature support (TV 1, IEI 0xC)
    pub ms_network_feature_support: Option<MsNetworkFeatureSupport>,
    /// TMSI based NRI container (TLV, IEI 0x10)
    pub tmsi_based_nri_container: Option<NetworkResourceIdentifierContainer>,
    /// T3324 value (TLV, IEI 0x6A)
    pub t3324_value: Option<GprsTimer2>,
    /// T3412 extended value (TLV, IEI 0x5E)
    pub t3412_extended_value: Option<GprsTimer3>,
    /// Extended DRX parameters (TLV, IEI 0x6E)
    pub extended_drx_parameters: Option<ExtendedDrxParameters>,
    /// UE additional security capability (TLV, IEI 0x6F)
    pub ue_additional_security_capability: Option<UeAdditionalSecurityCapability>,
}

impl TrackingAreaUpdateRequest {
    /// Create a request with the mandatory IEs
    pub fn new(
        eps_update_type: EpsUpdateType,
        nas_key_set_identifier: NasKeySetIdentifier,
        old_guti: EpsMobileIdentity,
    ) -> Self {
        Self {
            eps_update_type,
            nas_key_set_identifier,
            old_guti,
            ..Default::default()
        }
    }
}

impl EmmMessageBody for TrackingAreaUpdateRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::TrackingAreaUpdateRequest;
    const NAME: &'static str = "Tracking Area Update Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use tau_request_iei as iei;

        check_mandatory_length(buf, 3)?;
        let octet = read_u8(buf)?;
        let mut msg = Self::new(
            EpsUpdateType::decode(octet & 0x0F)?,
            NasKeySetIdentifier::decode(octet >> 4)?,
            EpsMobileIdentity::nas_decode(buf)?,
        );

        while let Some((raw, key)) = next_iei(buf) {
            let half = raw & 0x0F;
            match key {
                iei::NON_CURRENT_NATIVE_NAS_KSI => {
                    keep_first(
                        &mut msg.non_current_native_nas_ksi,
                        Self::NAME,
                        raw,
                        NasKeySetIdentifier::decode(half)?,
                    )
                }
                iei::GPRS_CKSN => keep_first(
                    &mut msg.gprs_cksn,
                    Self::NAME,
                    raw,
                    CipheringKeySequenceNumber::decode(half)?,
                ),
                iei::OLD_PTMSI_SIGNATURE => {
                    keep_first(
                        &mut msg.old_ptmsi_signature,
                        Self::NAME,
                        raw,
                        PTmsiSignature::nas_decode(buf)?,
                    )
                }
                iei::ADDITIONAL_GUTI => keep_first(
                    &mut msg.additional_guti,
                    Self::NAME,
                    raw,
                    EpsMobileIdentity::nas_decode(buf)?,
                ),
                iei::NONCE_UE => keep_first(
                    &mut msg.nonce_ue,
                    Self::NAME,
                    raw,
                    Nonce::nas_decode(buf)?,
                ),
                iei::UE_NETWORK_CAPABILITY => {
                    keep_first(
                        &mut msg.ue_network_capability,
                        Self::NAME,
                        raw,
                        UeNetworkCapability::nas_decode(buf)?,
                    )
                }
                iei::LAST_VISITED_REGISTERED_TAI => {
                    keep_first(
                        &mut msg.last_visited_registered_tai,
                        Self::NAME,
                        raw,
                        TrackingAreaIdentity::nas_decode(buf)?,
                    )
                }
                iei::DRX_PARAMETER => keep_first(
                    &mut msg.drx_parameter,
                    Self::NAME,
                    raw,
                    DrxParameter::nas_decode(buf)?,
                ),
                iei::UE_RADIO_CAPABILITY_UPDATE_NEEDED => {
                    keep_first(
                        &mut msg.ue_radio_capability_update_needed,
                        Self::NAME,
                        raw,
                        UeRadioCapabilityInformationUpdateNeeded::decode(half)?,
                    )
                }
                iei::EPS_BEARER_CONTEXT_STATUS => {
                    keep_first(
                        &mut msg.eps_bearer_context_status,
                        Self::NAME,
                        raw,
                        EpsBearerContextStatus::nas_decode(buf)?,
                    )
                }
                iei::MS_NETWORK_CAPABILITY => {
                    keep_first(
                        &mut msg.ms_network_capability,
                        Self::NAME,
                        raw,
                        MsNetworkCapability::nas_decode(buf)?,
                    )
                }
                iei::OLD_LOCATION_AREA_IDENTIFICATION => {
                    keep_first(
                        &mut msg.old_location_area_identification,
                        Self::NAME,
                        raw,
                        LocationAreaIdentification::nas_decode(buf)?,
                    )
                }
                iei::TMSI_STATUS => keep_first(
                    &mut msg.tmsi_status,
                    Self::NAME,
                    raw,
                    TmsiStatus::decode(half)?,
                ),
                iei::MS_CLASSMARK_2 => keep_first(
                    &mut msg.ms_classmark_2,
                    Self::NAME,
                    raw,
                    MsClassmark2::nas_decode(buf)?,
                ),
                iei::MS_CLASSMARK_3 => keep_first(
                    &mut msg.ms_classmark_3,
                    Self::NAME,
                    raw,
                    MsClassmark3::nas_decode(buf)?,
                ),
                iei::SUPPORTED_CODECS => {
                    keep_first(
                        &mut msg.supported_codecs,
                        Self::NAME,
                        raw,
                        SupportedCodecList::nas_decode(buf)?,
                    )
                }
                iei::ADDITIONAL_UPDATE_TYPE => {
                    keep_first(
                        &mut msg.additional_update_type,
                        Self::NAME,
                        raw,
                        AdditionalUpdateType::decode(half)?,
                    )
                }
                iei::VOICE_DOMAIN_PREFERENCE => {
                    keep_first(
                        &mut msg.voice_domain_preference,
                        Self::NAME,
                        raw,
                        VoiceDomainPreference::nas_decode(buf)?,
                    )
                }
                iei::OLD_GUTI_TYPE => keep_first(
                    &mut msg.old_guti_type,
                    Self::NAME,
                    raw,
                    GutiType::decode(half)?,
                ),
                iei::DEVICE_PROPERTIES => {
                    keep_first(
                        &mut msg.device_properties,
                        Self::NAME,
                        raw,
                        DeviceProperties::decode(half)?,
                    )
                }
                iei::MS_NETWORK_FEATURE_SUPPORT => {
                    keep_first(
                        &mut msg.ms_network_feature_support,
                        Self::NAME,
                        raw,
                        MsNetworkFeatureSupport::decode(half)?,
                    )
                }
                iei::TMSI_BASED_NRI_CONTAINER => {
                    keep_first(
                        &mut msg.tmsi_based_nri_container,
                        Self::NAME,
                        raw,
                        NetworkResourceIdentifierContainer::nas_decode(buf)?,
                    )
                }
                iei::T3324_VALUE => keep_first(
                    &mut msg.t3324_value,
                    Self::NAME,
                    raw,
                    GprsTimer2::nas_decode(buf)?,
                ),
                iei::T3412_EXTENDED_VALUE => {
                    keep_first(
                        &mut msg.t3412_extended_value,
                        Self::NAME,
                        raw,
                        GprsTimer3::nas_decode(buf)?,
                    )
                }
                iei::EXTENDED_DRX_PARAMETERS => {
                    keep_first(
                        &mut msg.extended_drx_parameters,
                        Self::NAME,
                        raw,
                        ExtendedDrxParameters::nas_decode(buf)?,
                    )
                }
                iei::UE_ADDITIONAL_SECURITY_CAPABILITY => {
                    keep_first(
                        &mut msg.ue_additional_security_capability,
                        Self::NAME,
                        raw,
                        UeAdditionalSecurityCapability::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use tau_request_iei as iei;

        buf.put_u8((self.nas_key_set_identifier.encode() << 4) | self.eps_update_type.encode());
        self.old_guti.nas_encode(buf)?;

        encode_optional_ie1(buf, iei::NON_CURRENT_NATIVE_NAS_KSI, &self.non_current_native_nas_ksi)?;
        encode_optional_ie1(buf, iei::GPRS_CKSN, &self.gprs_cksn)?;
        encode_optional(buf, iei::OLD_PTMSI_SIGNATURE, &self.old_ptmsi_signature)?;
        encode_optional(buf, iei::ADDITIONAL_GUTI, &self.additional_guti)?;
        encode_optional(buf, iei::NONCE_UE, &self.nonce_ue)?;
        encode_optional(buf, iei::UE_NETWORK_CAPABILITY, &self.ue_network_capability)?;
        encode_optional(buf, iei::LAST_VISITED_REGISTERED_TAI, &self.last_visited_registered_tai)?;
        encode_optional(buf, iei::DRX_PARAMETER, &self.drx_parameter)?;
        encode_optional_ie1(
            buf,
            iei::UE_RADIO_CAPABILITY_UPDATE_NEEDED,
            &self.ue_radio_capability_update_needed,
        )?;
        encode_optional(buf, iei::EPS_BEARER_CONTEXT_STATUS, &self.eps_bearer_context_status)?;
        encode_optional(buf, iei::MS_NETWORK_CAPABILITY, &self.ms_network_capability)?;
        encode_optional(
            buf,
            iei::OLD_LOCATION_AREA_IDENTIFICATION,
            &self.old_location_area_identification,
        )?;
        encode_optional_ie1(buf, iei::TMSI_STATUS, &self.tmsi_status)?;
        encode_optional(buf, iei::MS_CLASSMARK_2, &self.ms_classmark_2)?;
        encode_optional(buf, iei::MS_CLASSMARK_3, &self.ms_classmark_3)?;
        encode_optional(buf, iei::SUPPORTED_CODECS, &self.supported_codecs)?;
        encode_optional_ie1(buf, iei::ADDITIONAL_UPDATE_TYPE, &self.additional_update_type)?;
        encode_optional(buf, iei::VOICE_DOMAIN_PREFERENCE, &self.voice_domain_preference)?;
        encode_optional_ie1(buf, iei::OLD_GUTI_TYPE, &self.old_guti_type)?;
        encode_optional_ie1(buf, iei::DEVICE_PROPERTIES, &self.device_properties)?;
        encode_optional_ie1(buf, iei::MS_NETWORK_FEATURE_SUPPORT, &self.ms_network_feature_support)?;
        encode_optional(buf, iei::TMSI_BASED_NRI_CONTAINER, &self.tmsi_based_nri_container)?;
        encode_optional(buf, iei::T3324_VALUE, &self.t3324_value)?;
        encode_optional(buf, iei::T3412_EXTENDED_VALUE, &self.t3412_extended_value)?;
        encode_optional(buf, iei::EXTENDED_DRX_PARAMETERS, &self.extended_drx_parameters)?;
        encode_optional(
            buf,
            iei::UE_ADDITIONAL_SECURITY_CAPABILITY,
            &self.ue_additional_security_capability,
        )
    }

    fn presence_mask(&self) -> u32 {
        use tau_request_presence as p;

        presence_mask_of(&[
            (self.non_current_native_nas_ksi.is_some(), p::NON_CURRENT_NATIVE_NAS_KSI),
            (self.gprs_cksn.is_some(), p::GPRS_CKSN),
            (self.old_ptmsi_signature.is_some(), p::OLD_PTMSI_SIGNATURE),
            (self.additional_guti.is_some(), p::ADDITIONAL_GUTI),
            (self.nonce_ue.is_some(), p::NONCE_UE),
            (self.ue_network_capability.is_some(), p::UE_NETWORK_CAPABILITY),
            (self.last_visited_registered_tai.is_some(), p::LAST_VISITED_REGISTERED_TAI),
            (self.drx_parameter.is_some(), p::DRX_PARAMETER),
            (
                self.ue_radio_capability_update_needed.is_some(),
                p::UE_RADIO_CAPABILITY_UPDATE_NEEDED,
            ),
            (self.eps_bearer_context_status.is_some(), p::EPS_BEARER_CONTEXT_STATUS),
            (self.ms_network_capability.is_some(), p::MS_NETWORK_CAPABILITY),
            (
                self.old_location_area_identification.is_some(),
                p::OLD_LOCATION_AREA_IDENTIFICATION,
            ),
            (self.tmsi_status.is_some(), p::TMSI_STATUS),
            (self.ms_classmark_2.is_some(), p::MS_CLASSMARK_2),
            (self.ms_classmark_3.is_some(), p::MS_CLASSMARK_3),
            (self.supported_codecs.is_some(), p::SUPPORTED_CODECS),
            (self.additional_update_type.is_some(), p::ADDITIONAL_UPDATE_TYPE),
            (self.voice_domain_preference.is_some(), p::VOICE_DOMAIN_PREFERENCE),
            (self.old_guti_type.is_some(), p::OLD_GUTI_TYPE),
            (self.device_properties.is_some(), p::DEVICE_PROPERTIES),
            (self.ms_network_feature_support.is_some(), p::MS_NETWORK_FEATURE_SUPPORT),
            (self.tmsi_based_nri_container.is_some(), p::TMSI_BASED_NRI_CONTAINER),
            (self.t3324_value.is_some(), p::T3324_VALUE),
            (self.t3412_extended_value.is_some(), p::T3412_EXTENDED_VALUE),
            (self.extended_drx_parameters.is_some(), p::EXTENDED_DRX_PARAMETERS),
            (
                self.ue_additional_security_capability.is_some(),
                p::UE_ADDITIONAL_SECURITY_CAPABILITY,
            ),
        ])
    }
}

// ============================================================================
// Tracking Area Update Accept (3GPP TS 24.301 Section 8.2.26)
// ============================================================================

/// IEI values for Tracking Area Update Accept optional IEs
pub mod tau_accept_iei {
    /// T3412 value
    pub const T3412_VALUE: u8 = 0x5A;
    /// GUTI
    pub const GUTI: u8 = 0x50;
    /// TAI list
    pub const TAI_LIST: u8 = 0x54;
    /// EPS bearer context status
    pub const EPS_BEARER_CONTEXT_STATUS: u8 = 0x57;
    /// Location area identification
    pub const LOCATION_AREA_IDENTIFICATION: u8 = 0x13;
    /// MS identity
    pub const MS_IDENTITY: u8 = 0x23;
    /// EMM cause
    pub const EMM_CAUSE: u8 = 0x53;
    /// T3402 value
    pub const T3402_VALUE: u8 = 0x17;
    /// T3423 value
    pub const T3423_VALUE: u8 = 0x59;
    /// Equivalent PLMNs
    pub const EQUIVALENT_PLMNS: u8 = 0x4A;
    /// Emergency number list
    pub const EMERGENCY_NUMBER_LIST: u8 = 0x34;
    /// EPS network feature support
    pub const EPS_NETWORK_FEATURE_SUPPORT: u8 = 0x64;
    /// Additional update result
    pub const ADDITIONAL_UPDATE_RESULT: u8 = 0xF0;
    /// T3412 extended value
    pub const T3412_EXTENDED_VALUE: u8 = 0x5E;
    /// T3324 value
    pub const T3324_VALUE: u8 = 0x6A;
    /// Extended DRX parameters
    pub const EXTENDED_DRX_PARAMETERS: u8 = 0x6E;
}

/// Presence mask bits of [`TrackingAreaUpdateAccept`]
pub mod tau_accept_presence {
    #![allow(missing_docs)]
    pub const T3412_VALUE: u32 = 1 << 0;
    pub const GUTI: u32 = 1 << 1;
    pub const TAI_LIST: u32 = 1 << 2;
    pub const EPS_BEARER_CONTEXT_STATUS: u32 = 1 << 3;
    pub const LOCATION_AREA_IDENTIFICATION: u32 = 1 << 4;
    pub const MS_IDENTITY: u32 = 1 << 5;
    pub const EMM_CAUSE: u32 = 1 << 6;
    pub const T3402_VALUE: u32 = 1 << 7;
    pub const T3423_VALUE: u32 = 1 << 8;
    pub const EQUIVALENT_PLMNS: u32 = 1 << 9;
    pub const EMERGENCY_NUMBER_LIST: u32 = 1 << 10;
    pub const EPS_NETWORK_FEATURE_SUPPORT: u32 = 1 << 11;
    pub const ADDITIONAL_UPDATE_RESULT: u32 = 1 << 12;
    pub const T3412_EXTENDED_VALUE: u32 = 1 << 13;
    pub const T3324_VALUE: u32 = 1 << 14;
    pub const EXTENDED_DRX_PARAMETERS: u32 = 1 << 15;
}

/// Tracking Area Update Accept message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackingAreaUpdateAccept {
    /// EPS update result (mandatory, Type 1, low nibble; high nibble spare)
    pub eps_update_result: EpsUpdateResult,
    /// T3412 value (TV, IEI 0x5A)
    pub t3412_value: Option<GprsTimer>,
    /// GUTI (TLV, IEI 0x50)
    pub guti: Option<EpsMobileIdentity>,
    /// TAI list (TLV, IEI 0x54)
    pub tai_list: Option<TrackingAreaIdentityList>,
    /// EPS bearer context status (TLV, IEI 0x57)
    pub eps_bearer_context_status: Option<EpsBearerContextStatus>,
    /// Location area identification (TV, IEI 0x13)
    pub location_area_identification: Option<LocationAreaIdentification>,
    /// MS identity (TLV, IEI 0x23)
    pub ms_identity: Option<MobileIdentity>,
    /// EMM cause (TV, IEI 0x53)
    pub emm_cause: Option<EmmCause>,
    /// T3402 value (TV, IEI 0x17)
    pub t3402_value: Option<GprsTimer>,
    /// T3423 value (TV, IEI 0x59)
    pub t3423_value: Option<GprsTimer>,
    /// Equivalent PLMNs (TLV, IEI 0x4A)
    pub equivalent_plmns: Option<PlmnList>,
    /// Emergency number list (TLV, IEI 0x34)
    pub emergency_number_list: Option<EmergencyNumberList>,
    /// EPS network feature support (TLV, IEI 0x64)
    pub eps_network_feature_support: Option<EpsNetworkFeatureSupport>,
    /// Additional update result (TV 1, IEI 0xF)
    pub additional_update_result: Option<AdditionalUpdateResult>,
    /// T3412 extended value (TLV, IEI 0x5E)
    pub t3412_extended_value: Option<GprsTimer3>,
    /// T3324 value (TLV, IEI 0x6A)
    pub t3324_value: Option<GprsTimer2>,
    /// Extended DRX parameters (TLV, IEI 0x6E)
    pub extended_drx_parameters: Option<ExtendedDrxParameters>,
}

impl EmmMessageBody for TrackingAreaUpdateAccept {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::TrackingAreaUpdateAccept;
    const NAME: &'static str = "Tracking Area Update Accept";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use tau_accept_iei as iei;

        check_mandatory_length(buf, 1)?;
        let mut msg = Self {
            eps_update_result: EpsUpdateResult::decode(read_u8(buf)? & 0x0F)?,
            ..Default::default()
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::T3412_VALUE => keep_first(
                    &mut msg.t3412_value,
                    Self::NAME,
                    raw,
                    GprsTimer::nas_decode(buf)?,
                ),
                iei::GUTI => keep_first(
                    &mut msg.guti,
                    Self::NAME,
                    raw,
                    EpsMobileIdentity::nas_decode(buf)?,
                ),
                iei::TAI_LIST => keep_first(
                    &mut msg.tai_list,
                    Self::NAME,
                    raw,
                    TrackingAreaIdentityList::nas_decode(buf)?,
                ),
                iei::EPS_BEARER_CONTEXT_STATUS => {
                    keep_first(
                        &mut msg.eps_bearer_context_status,
                        Self::NAME,
                        raw,
                        EpsBearerContextStatus::nas_decode(buf)?,
                    )
                }
                iei::LOCATION_AREA_IDENTIFICATION => {
                    keep_first(
                        &mut msg.location_area_identification,
                        Self::NAME,
                        raw,
                        LocationAreaIdentification::nas_decode(buf)?,
                    )
                }
                iei::MS_IDENTITY => keep_first(
                    &mut msg.ms_identity,
                    Self::NAME,
                    raw,
                    MobileIdentity::nas_decode(buf)?,
                ),
                iei::EMM_CAUSE => keep_first(
                    &mut msg.emm_cause,
                    Self::NAME,
                    raw,
                    EmmCause::nas_decode(buf)?,
                ),
                iei::T3402_VALUE => keep_first(
                    &mut msg.t3402_value,
                    Self::NAME,
                    raw,
                    GprsTimer::nas_decode(buf)?,
                ),
                iei::T3423_VALUE => keep_first(
                    &mut msg.t3423_value,
                    Self::NAME,
                    raw,
                    GprsTimer::nas_decode(buf)?,
                ),
                iei::EQUIVALENT_PLMNS => keep_first(
                    &mut msg.equivalent_plmns,
                    Self::NAME,
                    raw,
                    PlmnList::nas_decode(buf)?,
                ),
                iei::EMERGENCY_NUMBER_LIST => {
                    keep_first(
                        &mut msg.emergency_number_list,
                        Self::NAME,
                        raw,
                        EmergencyNumberList::nas_decode(buf)?,
                    )
                }
                iei::EPS_NETWORK_FEATURE_SUPPORT => {
                    keep_first(
                        &mut msg.eps_network_feature_support,
                        Self::NAME,
                        raw,
                        EpsNetworkFeatureSupport::nas_decode(buf)?,
                    )
                }
                iei::ADDITIONAL_UPDATE_RESULT => {
                    keep_first(
                        &mut msg.additional_update_result,
                        Self::NAME,
                        raw,
                        AdditionalUpdateResult::decode(raw & 0x0F)?,
                    )
                }
                iei::T3412_EXTENDED_VALUE => {
                    keep_first(
                        &mut msg.t3412_extended_value,
                        Self::NAME,
                        raw,
                        GprsTimer3::nas_decode(buf)?,
                    )
                }
                iei::T3324_VALUE => keep_first(
                    &mut msg.t3324_value,
                    Self::NAME,
                    raw,
                    GprsTimer2::nas_decode(buf)?,
                ),
                iei::EXTENDED_DRX_PARAMETERS => {
                    keep_first(
                        &mut msg.extended_drx_parameters,
                        Self::NAME,
                        raw,
                        ExtendedDrxParameters::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use tau_accept_iei as iei;

        buf.put_u8(self.eps_update_result.encode());
        encode_optional(buf, iei::T3412_VALUE, &self.t3412_value)?;
        encode_optional(buf, iei::GUTI, &self.guti)?;
        encode_optional(buf, iei::TAI_LIST, &self.tai_list)?;
        encode_optional(buf, iei::EPS_BEARER_CONTEXT_STATUS, &self.eps_bearer_context_status)?;
        encode_optional(buf, iei::LOCATION_AREA_IDENTIFICATION, &self.location_area_identification)?;
        encode_optional(buf, iei::MS_IDENTITY, &self.ms_identity)?;
        encode_optional(buf, iei::EMM_CAUSE, &self.emm_cause)?;
        encode_optional(buf, iei::T3402_VALUE, &self.t3402_value)?;
        encode_optional(buf, iei::T3423_VALUE, &self.t3423_value)?;
        encode_optional(buf, iei::EQUIVALENT_PLMNS, &self.equivalent_plmns)?;
        encode_optional(buf, iei::EMERGENCY_NUMBER_LIST, &self.emergency_number_list)?;
        encode_optional(buf, iei::EPS_NETWORK_FEATURE_SUPPORT, &self.eps_network_feature_support)?;
        encode_optional_ie1(buf, iei::ADDITIONAL_UPDATE_RESULT, &self.additional_update_result)?;
        encode_optional(buf, iei::T3412_EXTENDED_VALUE, &self.t3412_extended_value)?;
        encode_optional(buf, iei::T3324_VALUE, &self.t3324_value)?;
        encode_optional(buf, iei::EXTENDED_DRX_PARAMETERS, &self.extended_drx_parameters)
    }

    fn presence_mask(&self) -> u32 {
        use tau_accept_presence as p;

        presence_mask_of(&[
            (self.t3412_value.is_some(), p::T3412_VALUE),
            (self.guti.is_some(), p::GUTI),
            (self.tai_list.is_some(), p::TAI_LIST),
            (self.eps_bearer_context_status.is_some(), p::EPS_BEARER_CONTEXT_STATUS),
            (self.location_area_identification.is_some(), p::LOCATION_AREA_IDENTIFICATION),
            (self.ms_identity.is_some(), p::MS_IDENTITY),
            (self.emm_cause.is_some(), p::EMM_CAUSE),
            (self.t3402_value.is_some(), p::T3402_VALUE),
            (self.t3423_value.is_some(), p::T3423_VALUE),
            (self.equivalent_plmns.is_some(), p::EQUIVALENT_PLMNS),
            (self.emergency_number_list.is_some(), p::EMERGENCY_NUMBER_LIST),
            (self.eps_network_feature_support.is_some(), p::EPS_NETWORK_FEATURE_SUPPORT),
            (self.additional_update_result.is_some(), p::ADDITIONAL_UPDATE_RESULT),
            (self.t3412_extended_value.is_some(), p::T3412_EXTENDED_VALUE),
            (self.t3324_value.is_some(), p::T3324_VALUE),
            (self.extended_drx_parameters.is_some(), p::EXTENDED_DRX_PARAMETERS),
        ])
    }
}

// ============================================================================
// Tracking Area Update Complete (3GPP TS 24.301 Section 8.2.27)
// ============================================================================

/// Tracking Area Update Complete message (UE to network)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingAreaUpdateComplete;

impl EmmMessageBody for TrackingAreaUpdateComplete {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::TrackingAreaUpdateComplete;
    const NAME: &'static str = "Tracking Area Update Complete";

    fn decode_body<B: Buf>(_buf: &mut B) -> NasResult<Self> {
        Ok(Self)
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) -> NasResult<()> {
        Ok(())
    }
}

// ============================================================================
// Tracking Area Update Reject (3GPP TS 24.301 Section 8.2.28)
// ============================================================================

/// IEI values for Tracking Area Update Reject optional IEs
pub mod tau_reject_iei {
    /// T3346 value
    pub const T3346_VALUE: u8 = 0x5F;
    /// Extended EMM cause
    pub const EXTENDED_EMM_CAUSE: u8 = 0xA0;
}

/// Presence mask bits of [`TrackingAreaUpdateReject`]
pub mod tau_reject_presence {
    #![allow(missing_docs)]
    pub const T3346_VALUE: u32 = 1 << 0;
    pub const EXTENDED_EMM_CAUSE: u32 = 1 << 1;
}

/// Tracking Area Update Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingAreaUpdateReject {
    /// EMM cause (mandatory, V)
    pub emm_cause: EmmCause,
    /// T3346 value (TLV, IEI 0x5F)
    pub t3346_value: Option<GprsTimer2>,
    /// Extended EMM cause (TV 1, IEI 0xA)
    pub extended_emm_cause: Option<ExtendedEmmCause>,
}

impl TrackingAreaUpdateReject {
    /// Create a reject carrying only the cause
    pub fn new(emm_cause: EmmCause) -> Self {
        Self {
            emm_cause,
            t3346_value: None,
            extended_emm_cause: None,
        }
    }
}

impl EmmMessageBody for TrackingAreaUpdateReject {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::TrackingAreaUpdateReject;
    const NAME: &'static str = "Tracking Area Update Reject";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        let mut msg = Self::new(EmmCause::nas_decode(buf)?);

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                tau_reject_iei::T3346_VALUE => keep_first(
                    &mut msg.t3346_value,
                    Self::NAME,
                    raw,
                    GprsTimer2::nas_decode(buf)?,
                ),
                tau_reject_iei::EXTENDED_EMM_CAUSE => {
                    keep_first(
                        &mut msg.extended_emm_cause,
                        Self::NAME,
                        raw,
                        ExtendedEmmCause::decode(raw & 0x0F)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.emm_cause.nas_encode(buf)?;
        encode_optional(buf, tau_reject_iei::T3346_VALUE, &self.t3346_value)?;
        encode_optional_ie1(buf, tau_reject_iei::EXTENDED_EMM_CAUSE, &self.extended_emm_cause)
    }

    fn presence_mask(&self) -> u32 {
        presence_mask_of(&[
            (self.t3346_value.is_some(), tau_reject_presence::T3346_VALUE),
            (self.extended_emm_cause.is_some(), tau_reject_presence::EXTENDED_EMM_CAUSE),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::{EpsUpdateTypeValue, Guti};
    use lte_common::Plmn;

    fn old_guti() -> EpsMobileIdentity {
        EpsMobileIdentity::Guti(Guti {
            plmn: Plmn::new(1, 1, false),
            mme_group_id: 0x8001,
            mme_code: 0x02,
            m_tmsi: 0xC000_0A5E,
        })
    }

    #[test]
    fn test_tau_request_periodic() {
        let data = [
            0x13, 0x0B, 0xF6, 0x00, 0xF1, 0x10, 0x80, 0x01, 0x02, 0xC0, 0x00, 0x0A, 0x5E, 0x57,
            0x02, 0x20, 0x00, 0x90 | 0x01,
        ];
        let msg = TrackingAreaUpdateRequest::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.eps_update_type.value, EpsUpdateTypeValue::PeriodicUpdating);
        assert!(!msg.eps_update_type.active);
        assert_eq!(msg.nas_key_set_identifier, NasKeySetIdentifier::native(1));
        assert_eq!(msg.old_guti, old_guti());
        assert!(msg.eps_bearer_context_status.unwrap().is_active(5));
        assert!(msg.tmsi_status.unwrap().valid_tmsi);
        assert_eq!(
            msg.presence_mask(),
            tau_request_presence::EPS_BEARER_CONTEXT_STATUS | tau_request_presence::TMSI_STATUS
        );

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_tau_request_half_octet_ksi_and_cksn() {
        let mut msg = TrackingAreaUpdateRequest::new(
            EpsUpdateType {
                active: true,
                value: EpsUpdateTypeValue::TaUpdating,
            },
            NasKeySetIdentifier::no_key(),
            old_guti(),
        );
        msg.non_current_native_nas_ksi = Some(NasKeySetIdentifier::native(3));
        msg.gprs_cksn = Some(CipheringKeySequenceNumber::new(2));
        msg.nonce_ue = Some(Nonce(0x0102_0304));

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out[0], 0x78);
        assert_eq!(&out[13..], &[0xB3, 0x82, 0x55, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(TrackingAreaUpdateRequest::decode_body(&mut out.as_slice()).unwrap(), msg);
    }

    #[test]
    fn test_tau_accept_optional_tai_list() {
        let tai = TrackingAreaIdentity::new(Plmn::new(1, 1, false), 7);
        let msg = TrackingAreaUpdateAccept {
            eps_update_result: EpsUpdateResult::TaUpdated,
            t3412_value: Some(GprsTimer::new(1, 20)),
            tai_list: Some(TrackingAreaIdentityList::single(tai)),
            eps_bearer_context_status: Some(EpsBearerContextStatus(0x0020)),
            ..Default::default()
        };

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(
            out,
            vec![
                0x00, 0x5A, 0x34, 0x54, 0x06, 0x00, 0x00, 0xF1, 0x10, 0x00, 0x07, 0x57, 0x02,
                0x20, 0x00
            ]
        );
        let decoded = TrackingAreaUpdateAccept::decode_body(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, msg);
        assert!(decoded.tai_list.unwrap().contains(&tai));
    }

    #[test]
    fn test_tau_accept_rejects_reserved_result() {
        assert!(TrackingAreaUpdateAccept::decode_body(&mut &[0x02u8][..]).is_err());
    }

    #[test]
    fn test_tau_reject() {
        let data = [0x0A, 0x5F, 0x01, 0x21, 0xA1];
        let msg = TrackingAreaUpdateReject::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.emm_cause, EmmCause::ImplicitlyDetached);
        assert_eq!(msg.t3346_value, Some(GprsTimer2(GprsTimer::new(1, 1))));
        assert!(msg.extended_emm_cause.unwrap().eutran_not_allowed);

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
