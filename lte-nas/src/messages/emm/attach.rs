//! Attach messages (3GPP TS 24.301 Sections 8.2.1 - 8.2.4)
//!
//! - Attach Request (UE to network)
//! - Attach Accept (network to UE)
//! - Attach Complete (UE to network)
//! - Attach Reject (network to UE)

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasEncode, NasResult,
};
use crate::enums::{EmmCause, EmmMessageType};
use crate::ies::{
    AdditionalUpdateResult, AdditionalUpdateType, DeviceProperties, DrxParameter,
    EmergencyNumberList, EpsAttachResult, EpsAttachType, EpsMobileIdentity,
    EpsNetworkFeatureSupport, EsmMessageContainer, ExtendedDrxParameters, ExtendedEmmCause,
    GprsTimer, GprsTimer2, GprsTimer3, GutiType, LocationAreaIdentification, MobileIdentity,
    MsClassmark2, MsClassmark3, MsNetworkCapability, MsNetworkFeatureSupport, NasKeySetIdentifier,
    NetworkResourceIdentifierContainer, PTmsiSignature, PlmnList, SupportedCodecList, TmsiStatus,
    TrackingAreaIdentity, TrackingAreaIdentityList, UeAdditionalSecurityCapability,
    UeNetworkCapability, VoiceDomainPreference,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

// ============================================================================
// Attach Request (3GPP TS 24.301 Section 8.2.4)
// ============================================================================

/// IEI values for Attach Request optional IEs
pub mod attach_request_iei {
    /// Old P-TMSI signature
    pub const OLD_PTMSI_SIGNATURE: u8 = 0x19;
    /// Additional GUTI
    pub const ADDITIONAL_GUTI: u8 = 0x50;
    /// Last visited registered TAI
    pub const LAST_VISITED_REGISTERED_TAI: u8 = 0x52;
    /// DRX parameter
    pub const DRX_PARAMETER: u8 = 0x5C;
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
    /// Device properties
    pub const DEVICE_PROPERTIES: u8 = 0xD0;
    /// Old GUTI type
    pub const OLD_GUTI_TYPE: u8 = 0xE0;
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

/// Presence mask bits of [`AttachRequest`]
pub mod attach_request_presence {
    #![allow(missing_docs)]
    pub const OLD_PTMSI_SIGNATURE: u32 = 1 << 0;
    pub const ADDITIONAL_GUTI: u32 = 1 << 1;
    pub const LAST_VISITED_REGISTERED_TAI: u32 = 1 << 2;
    pub const DRX_PARAMETER: u32 = 1 << 3;
    pub const MS_NETWORK_CAPABILITY: u32 = 1 << 4;
    pub const OLD_LOCATION_AREA_IDENTIFICATION: u32 = 1 << 5;
    pub const TMSI_STATUS: u32 = 1 << 6;
    pub const MS_CLASSMARK_2: u32 = 1 << 7;
    pub const MS_CLASSMARK_3: u32 = 1 << 8;
    pub const SUPPORTED_CODECS: u32 = 1 << 9;
    pub const ADDITIONAL_UPDATE_TYPE: u32 = 1 << 10;
    pub const VOICE_DOMAIN_PREFERENCE: u32 = 1 << 11;
    pub const DEVICE_PROPERTIES: u32 = 1 << 12;
    pub const OLD_GUTI_TYPE: u32 = 1 << 13;
    pub const MS_NETWORK_FEATURE_SUPPORT: u32 = 1 << 14;
    pub const TMSI_BASED_NRI_CONTAINER: u32 = 1 << 15;
    pub const T3324_VALUE: u32 = 1 << 16;
    pub const T3412_EXTENDED_VALUE: u32 = 1 << 17;
    pub const EXTENDED_DRX_PARAMETERS: u32 = 1 << 18;
    pub const UE_ADDITIONAL_SECURITY_CAPABILITY: u32 = 1 << 19;
}

/// Attach Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachRequest {
    /// EPS attach type (mandatory, Type 1, low nibble)
    pub eps_attach_type: EpsAttachType,
    /// NAS key set identifier (mandatory, Type 1, high nibble)
    pub nas_key_set_identifier: NasKeySetIdentifier,
    /// Old GUTI or IMSI (mandatory, LV)
    pub eps_mobile_identity: EpsMobileIdentity,
    /// UE network capability (mandatory, LV)
    pub ue_network_capability: UeNetworkCapability,
    /// ESM message container (mandatory, LV-E)
    pub esm_message_container: EsmMessageContainer,
    /// Old P-TMSI signature (TV, IEI 0x19)
    pub old_ptmsi_signature: Option<PTmsiSignature>,
    /// Additional GUTI (TLV, IEI 0x50)
    pub additional_guti: Option<EpsMobileIdentity>,
    /// Last visited registered TAI (TV, IEI 0x52)
    pub last_visited_registered_tai: Option<TrackingAreaIdentity>,
    /// DRX parameter (TV, IEI 0x5C)
    pub drx_parameter: Option<DrxParameter>,
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
    /// Device properties (TV 1, IEI 0xD)
    pub device_properties: Option<DeviceProperties>,
    /// Old GUTI type (TV 1, IEI 0xE)
    pub old_guti_type: Option<GutiType>,
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

impl AttachRequest {
    /// Shortest body: type octet, identity, capability and empty container
    pub const MIN_LEN: usize = 1 + 2 + 3 + 2;

    /// Create an Attach Request with the mandatory IEs
    pub fn new(
        eps_attach_type: EpsAttachType,
        nas_key_set_identifier: NasKeySetIdentifier,
        eps_mobile_identity: EpsMobileIdentity,
        ue_network_capability: UeNetworkCapability,
        esm_message_container: EsmMessageContainer,
    ) -> Self {
        Self {
            eps_attach_type,
            nas_key_set_identifier,
            eps_mobile_identity,
            ue_network_capability,
            esm_message_container,
            ..Default::default()
        }
    }
}

impl EmmMessageBody for AttachRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AttachRequest;
    const NAME: &'static str = "Attach Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use attach_request_iei as iei;

        check_mandatory_length(buf, Self::MIN_LEN)?;
        let octet = read_u8(buf)?;
        let mut msg = Self::new(
            EpsAttachType::decode(octet & 0x0F)?,
            NasKeySetIdentifier::decode(octet >> 4)?,
            EpsMobileIdentity::nas_decode(buf)?,
            UeNetworkCapability::nas_decode(buf)?,
            EsmMessageContainer::nas_decode(buf)?,
        );

        while let Some((raw, key)) = next_iei(buf) {
            match key {
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
                    TmsiStatus::decode(raw & 0x0F)?,
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
                        AdditionalUpdateType::decode(raw & 0x0F)?,
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
                iei::DEVICE_PROPERTIES => {
                    keep_first(
                        &mut msg.device_properties,
                        Self::NAME,
                        raw,
                        DeviceProperties::decode(raw & 0x0F)?,
                    )
                }
                iei::OLD_GUTI_TYPE => keep_first(
                    &mut msg.old_guti_type,
                    Self::NAME,
                    raw,
                    GutiType::decode(raw & 0x0F)?,
                ),
                iei::MS_NETWORK_FEATURE_SUPPORT => {
                    keep_first(
                        &mut msg.ms_network_feature_support,
                        Self::NAME,
                        raw,
                        MsNetworkFeatureSupport::decode(raw & 0x0F)?,
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
        use attach_request_iei as iei;

        buf.put_u8((self.nas_key_set_identifier.encode() << 4) | self.eps_attach_type.encode());
        self.eps_mobile_identity.nas_encode(buf)?;
        self.ue_network_capability.nas_encode(buf)?;
        self.esm_message_container.nas_encode(buf)?;

        encode_optional(buf, iei::OLD_PTMSI_SIGNATURE, &self.old_ptmsi_signature)?;
        encode_optional(buf, iei::ADDITIONAL_GUTI, &self.additional_guti)?;
        encode_optional(buf, iei::LAST_VISITED_REGISTERED_TAI, &self.last_visited_registered_tai)?;
        encode_optional(buf, iei::DRX_PARAMETER, &self.drx_parameter)?;
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
        encode_optional_ie1(buf, iei::DEVICE_PROPERTIES, &self.device_properties)?;
        encode_optional_ie1(buf, iei::OLD_GUTI_TYPE, &self.old_guti_type)?;
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
        use attach_request_presence as p;

        presence_mask_of(&[
            (self.old_ptmsi_signature.is_some(), p::OLD_PTMSI_SIGNATURE),
            (self.additional_guti.is_some(), p::ADDITIONAL_GUTI),
            (self.last_visited_registered_tai.is_some(), p::LAST_VISITED_REGISTERED_TAI),
            (self.drx_parameter.is_some(), p::DRX_PARAMETER),
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
            (self.device_properties.is_some(), p::DEVICE_PROPERTIES),
            (self.old_guti_type.is_some(), p::OLD_GUTI_TYPE),
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
// Attach Accept (3GPP TS 24.301 Section 8.2.1)
// ============================================================================

/// IEI values for Attach Accept optional IEs
pub mod attach_accept_iei {
    /// GUTI
    pub const GUTI: u8 = 0x50;
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

/// Presence mask bits of [`AttachAccept`]
pub mod attach_accept_presence {
    #![allow(missing_docs)]
    pub const GUTI: u32 = 1 << 0;
    pub const LOCATION_AREA_IDENTIFICATION: u32 = 1 << 1;
    pub const MS_IDENTITY: u32 = 1 << 2;
    pub const EMM_CAUSE: u32 = 1 << 3;
    pub const T3402_VALUE: u32 = 1 << 4;
    pub const T3423_VALUE: u32 = 1 << 5;
    pub const EQUIVALENT_PLMNS: u32 = 1 << 6;
    pub const EMERGENCY_NUMBER_LIST: u32 = 1 << 7;
    pub const EPS_NETWORK_FEATURE_SUPPORT: u32 = 1 << 8;
    pub const ADDITIONAL_UPDATE_RESULT: u32 = 1 << 9;
    pub const T3412_EXTENDED_VALUE: u32 = 1 << 10;
    pub const T3324_VALUE: u32 = 1 << 11;
    pub const EXTENDED_DRX_PARAMETERS: u32 = 1 << 12;
}

/// Attach Accept message (network to UE)
///
/// An EMM cause holding the internal success marker is never encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachAccept {
    /// EPS attach result (mandatory, Type 1, low nibble; high nibble spare)
    pub eps_attach_result: EpsAttachResult,
    /// T3412 value (mandatory, V)
    pub t3412_value: GprsTimer,
    /// TAI list (mandatory, LV)
    pub tai_list: TrackingAreaIdentityList,
    /// ESM message container (mandatory, LV-E)
    pub esm_message_container: EsmMessageContainer,
    /// GUTI (TLV, IEI 0x50)
    pub guti: Option<EpsMobileIdentity>,
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

impl AttachAccept {
    /// Shortest body: result, T3412, a TAI list with one TAI and an empty container
    pub const MIN_LEN: usize = 1 + 1 + 7 + 2;
}

impl EmmMessageBody for AttachAccept {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AttachAccept;
    const NAME: &'static str = "Attach Accept";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use attach_accept_iei as iei;

        check_mandatory_length(buf, Self::MIN_LEN)?;
        let mut msg = Self {
            eps_attach_result: EpsAttachResult::decode(read_u8(buf)? & 0x0F)?,
            t3412_value: GprsTimer::nas_decode(buf)?,
            tai_list: TrackingAreaIdentityList::nas_decode(buf)?,
            esm_message_container: EsmMessageContainer::nas_decode(buf)?,
            ..Default::default()
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::GUTI => keep_first(
                    &mut msg.guti,
                    Self::NAME,
                    raw,
                    EpsMobileIdentity::nas_decode(buf)?,
                ),
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
        use attach_accept_iei as iei;

        buf.put_u8(self.eps_attach_result.encode());
        self.t3412_value.nas_encode(buf)?;
        self.tai_list.nas_encode(buf)?;
        self.esm_message_container.nas_encode(buf)?;

        encode_optional(buf, iei::GUTI, &self.guti)?;
        encode_optional(buf, iei::LOCATION_AREA_IDENTIFICATION, &self.location_area_identification)?;
        encode_optional(buf, iei::MS_IDENTITY, &self.ms_identity)?;
        let emm_cause = self.emm_cause.filter(|cause| !cause.is_success());
        encode_optional(buf, iei::EMM_CAUSE, &emm_cause)?;
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
        use attach_accept_presence as p;

        presence_mask_of(&[
            (self.guti.is_some(), p::GUTI),
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
// Attach Complete (3GPP TS 24.301 Section 8.2.2)
// ============================================================================

/// Attach Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachComplete {
    /// ESM message container (mandatory, LV-E)
    pub esm_message_container: EsmMessageContainer,
}

impl EmmMessageBody for AttachComplete {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AttachComplete;
    const NAME: &'static str = "Attach Complete";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 2)?;
        Ok(Self {
            esm_message_container: EsmMessageContainer::nas_decode(buf)?,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.esm_message_container.nas_encode(buf)
    }
}

// ============================================================================
// Attach Reject (3GPP TS 24.301 Section 8.2.3)
// ============================================================================

/// IEI values for Attach Reject optional IEs
pub mod attach_reject_iei {
    /// ESM message container
    pub const ESM_MESSAGE_CONTAINER: u8 = 0x78;
    /// T3346 value
    pub const T3346_VALUE: u8 = 0x5F;
    /// T3402 value
    pub const T3402_VALUE: u8 = 0x16;
    /// Extended EMM cause
    pub const EXTENDED_EMM_CAUSE: u8 = 0xA0;
}

/// Presence mask bits of [`AttachReject`]
pub mod attach_reject_presence {
    #![allow(missing_docs)]
    pub const ESM_MESSAGE_CONTAINER: u32 = 1 << 0;
    pub const T3346_VALUE: u32 = 1 << 1;
    pub const T3402_VALUE: u32 = 1 << 2;
    pub const EXTENDED_EMM_CAUSE: u32 = 1 << 3;
}

/// Attach Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachReject {
    /// EMM cause (mandatory, V)
    pub emm_cause: EmmCause,
    /// ESM message container (TLV-E, IEI 0x78)
    pub esm_message_container: Option<EsmMessageContainer>,
    /// T3346 value (TLV, IEI 0x5F)
    pub t3346_value: Option<GprsTimer2>,
    /// T3402 value (TLV, IEI 0x16)
    pub t3402_value: Option<GprsTimer2>,
    /// Extended EMM cause (TV 1, IEI 0xA)
    pub extended_emm_cause: Option<ExtendedEmmCause>,
}

impl AttachReject {
    /// Create an Attach Reject carrying only the cause
    pub fn new(emm_cause: EmmCause) -> Self {
        Self {
            emm_cause,
            esm_message_container: None,
            t3346_value: None,
            t3402_value: None,
            extended_emm_cause: None,
        }
    }
}

impl EmmMessageBody for AttachReject {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::AttachReject;
    const NAME: &'static str = "Attach Reject";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use attach_reject_iei as iei;

        check_mandatory_length(buf, 1)?;
        let mut msg = Self::new(EmmCause::nas_decode(buf)?);

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::ESM_MESSAGE_CONTAINER => {
                    keep_first(
                        &mut msg.esm_message_container,
                        Self::NAME,
                        raw,
                        EsmMessageContainer::nas_decode(buf)?,
                    )
                }
                iei::T3346_VALUE => keep_first(
                    &mut msg.t3346_value,
                    Self::NAME,
                    raw,
                    GprsTimer2::nas_decode(buf)?,
                ),
                iei::T3402_VALUE => keep_first(
                    &mut msg.t3402_value,
                    Self::NAME,
                    raw,
                    GprsTimer2::nas_decode(buf)?,
                ),
                iei::EXTENDED_EMM_CAUSE => {
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
        use attach_reject_iei as iei;

        self.emm_cause.nas_encode(buf)?;
        encode_optional(buf, iei::ESM_MESSAGE_CONTAINER, &self.esm_message_container)?;
        encode_optional(buf, iei::T3346_VALUE, &self.t3346_value)?;
        encode_optional(buf, iei::T3402_VALUE, &self.t3402_value)?;
        encode_optional_ie1(buf, iei::EXTENDED_EMM_CAUSE, &self.extended_emm_cause)
    }

    fn presence_mask(&self) -> u32 {
        use attach_reject_presence as p;

        presence_mask_of(&[
            (self.esm_message_container.is_some(), p::ESM_MESSAGE_CONTAINER),
            (self.t3346_value.is_some(), p::T3346_VALUE),
            (self.t3402_value.is_some(), p::T3402_VALUE),
            (self.extended_emm_cause.is_some(), p::EXTENDED_EMM_CAUSE),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::PartialTaiList;
    use lte_common::Plmn;

    const MINIMAL_ATTACH_REQUEST: &str = "72 08 09 10 10 00 00 00 00 10 02 e0 e0 00 04 02 01 d0 11";

    fn vector(s: &str) -> Vec<u8> {
        hex::decode(s.replace(' ', "")).unwrap()
    }

    #[test]
    fn test_attach_request_mandatory_only() {
        let data = vector(MINIMAL_ATTACH_REQUEST);
        let mut buf = data.as_slice();
        let msg = AttachRequest::decode_body(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert_eq!(msg.eps_attach_type, EpsAttachType::CombinedEpsImsiAttach);
        assert!(msg.nas_key_set_identifier.is_no_key());
        assert_eq!(
            msg.eps_mobile_identity,
            EpsMobileIdentity::Imsi("001010000000001".to_string())
        );
        assert_eq!(msg.ue_network_capability.eea, 0xE0);
        assert_eq!(msg.esm_message_container.0.data(), &[0x02, 0x01, 0xD0, 0x11]);
        assert_eq!(msg.presence_mask(), 0);

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_attach_request_truncated_mandatory() {
        let data = vector(MINIMAL_ATTACH_REQUEST);
        for cut in 0..data.len() {
            assert!(
                AttachRequest::decode_body(&mut &data[..cut]).is_err(),
                "decoded with {cut} octets"
            );
        }
    }

    #[test]
    fn test_attach_request_unknown_iei() {
        let mut data = vector(MINIMAL_ATTACH_REQUEST);
        data.extend_from_slice(&[0x77, 0x01, 0x00]);
        assert!(matches!(
            AttachRequest::decode_body(&mut data.as_slice()),
            Err(crate::codec::NasError::UnexpectedIei { actual: 0x77, .. })
        ));
    }

    #[test]
    fn test_attach_request_half_octet_optionals() {
        let mut data = vector(MINIMAL_ATTACH_REQUEST);
        data.extend_from_slice(&[0x91, 0xF1, 0xD1, 0xE1, 0xC1]);
        let msg = AttachRequest::decode_body(&mut data.as_slice()).unwrap();
        use attach_request_presence as p;
        assert_eq!(
            msg.presence_mask(),
            p::TMSI_STATUS
                | p::ADDITIONAL_UPDATE_TYPE
                | p::DEVICE_PROPERTIES
                | p::OLD_GUTI_TYPE
                | p::MS_NETWORK_FEATURE_SUPPORT
        );
        assert!(msg.tmsi_status.unwrap().valid_tmsi);
        assert!(msg.additional_update_type.unwrap().sms_only());
        assert!(msg.device_properties.unwrap().low_priority);

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    fn sample_accept() -> AttachAccept {
        let tai = TrackingAreaIdentity::new(Plmn::new(1, 1, false), 1);
        AttachAccept {
            eps_attach_result: EpsAttachResult::EpsOnly,
            t3412_value: GprsTimer::new(1, 22),
            tai_list: TrackingAreaIdentityList::single(tai),
            esm_message_container: EsmMessageContainer::from(vec![0x52, 0x01, 0xC1]),
            ..Default::default()
        }
    }

    #[test]
    fn test_attach_accept_round_trip() {
        let mut msg = sample_accept();
        msg.guti = Some(EpsMobileIdentity::Guti(crate::ies::Guti {
            plmn: Plmn::new(1, 1, false),
            mme_group_id: 0x8001,
            mme_code: 1,
            m_tmsi: 0x1234_5678,
        }));
        msg.emm_cause = Some(EmmCause::CsDomainNotAvailable);
        msg.t3402_value = Some(GprsTimer::new(1, 12));
        msg.eps_network_feature_support = Some(EpsNetworkFeatureSupport {
            features: EpsNetworkFeatureSupport::IMS_VOPS,
            features2: None,
        });
        msg.additional_update_result = Some(AdditionalUpdateResult(AdditionalUpdateResult::SMS_ONLY));

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(&out[..2], &[0x01, 0x36]);
        assert!(out.ends_with(&[0x64, 0x01, 0x01, 0xF2]));

        let decoded = AttachAccept::decode_body(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, msg);
        use attach_accept_presence as p;
        assert_eq!(
            decoded.presence_mask(),
            p::GUTI | p::EMM_CAUSE | p::T3402_VALUE | p::EPS_NETWORK_FEATURE_SUPPORT
                | p::ADDITIONAL_UPDATE_RESULT
        );
        assert!(matches!(decoded.tai_list.lists[0], PartialTaiList::NonConsecutive { .. }));
    }

    #[test]
    fn test_attach_accept_omits_success_cause() {
        let mut msg = sample_accept();
        let mut plain = Vec::new();
        msg.encode_body(&mut plain).unwrap();

        msg.emm_cause = Some(EmmCause::from(crate::enums::EMM_CAUSE_SUCCESS));
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, plain);
    }

    #[test]
    fn test_attach_complete() {
        let data = [0x00, 0x03, 0x52, 0x01, 0xC2];
        let msg = AttachComplete::decode_body(&mut &data[..]).unwrap();
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
        assert!(AttachComplete::decode_body(&mut &[0x00u8][..]).is_err());
    }

    #[test]
    fn test_attach_reject_with_esm_container() {
        let mut msg = AttachReject::new(EmmCause::EsmFailure);
        msg.esm_message_container = Some(EsmMessageContainer::from(vec![0x02, 0x01, 0xD1, 0x1B]));
        msg.extended_emm_cause = Some(ExtendedEmmCause {
            eutran_not_allowed: true,
            ..Default::default()
        });

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0x13, 0x78, 0x00, 0x04, 0x02, 0x01, 0xD1, 0x1B, 0xA1]);
        assert_eq!(AttachReject::decode_body(&mut out.as_slice()).unwrap(), msg);
    }
}
