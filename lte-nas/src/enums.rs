//! NAS protocol enumerations
//!
//! Based on 3GPP TS 24.007 (protocol discriminators) and TS 24.301
//! (message types, cause values).

use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};

/// Protocol discriminator, low nibble of the first octet
/// 3GPP TS 24.007 Section 11.2.3.1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ProtocolDiscriminator {
    /// EPS session management messages
    EpsSessionManagement = 0x2,
    /// EPS mobility management messages
    EpsMobilityManagement = 0x7,
}

/// Security header type, high nibble of the first EMM octet
/// 3GPP TS 24.301 Section 9.3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SecurityHeaderType {
    /// Plain NAS message, not security protected
    #[default]
    NotProtected = 0x0,
    /// Integrity protected
    IntegrityProtected = 0x1,
    /// Integrity protected and ciphered
    IntegrityProtectedAndCiphered = 0x2,
    /// Integrity protected with new EPS security context
    IntegrityProtectedWithNewSecurityContext = 0x3,
    /// Integrity protected and ciphered with new EPS security context
    IntegrityProtectedAndCipheredWithNewSecurityContext = 0x4,
    /// Security header for the Service Request message
    ServiceRequest = 0xC,
}

impl SecurityHeaderType {
    /// Returns true if the message is security protected
    pub fn is_protected(&self) -> bool {
        !matches!(self, SecurityHeaderType::NotProtected)
    }

    /// Returns true if the message is ciphered
    pub fn is_ciphered(&self) -> bool {
        matches!(
            self,
            SecurityHeaderType::IntegrityProtectedAndCiphered
                | SecurityHeaderType::IntegrityProtectedAndCipheredWithNewSecurityContext
        )
    }
}

/// EMM message type
/// 3GPP TS 24.301 Section 9.8 (table 9.8.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EmmMessageType {
    AttachRequest = 0x41,
    AttachAccept = 0x42,
    AttachComplete = 0x43,
    AttachReject = 0x44,
    /// Detach request in either direction
    DetachRequest = 0x45,
    DetachAccept = 0x46,

    TrackingAreaUpdateRequest = 0x48,
    TrackingAreaUpdateAccept = 0x49,
    TrackingAreaUpdateComplete = 0x4A,
    TrackingAreaUpdateReject = 0x4B,

    ExtendedServiceRequest = 0x4C,
    ServiceReject = 0x4E,

    GutiReallocationCommand = 0x50,
    GutiReallocationComplete = 0x51,
    AuthenticationRequest = 0x52,
    AuthenticationResponse = 0x53,
    AuthenticationReject = 0x54,
    IdentityRequest = 0x55,
    IdentityResponse = 0x56,
    AuthenticationFailure = 0x5C,
    SecurityModeCommand = 0x5D,
    SecurityModeComplete = 0x5E,
    SecurityModeReject = 0x5F,

    EmmStatus = 0x60,
    EmmInformation = 0x61,
    DownlinkNasTransport = 0x62,
    UplinkNasTransport = 0x63,
    CsServiceNotification = 0x64,
    DownlinkGenericNasTransport = 0x68,
    UplinkGenericNasTransport = 0x69,
}

/// ESM message type
/// 3GPP TS 24.301 Section 9.8 (table 9.8.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum EsmMessageType {
    ActivateDefaultEpsBearerContextRequest = 0xC1,
    ActivateDefaultEpsBearerContextAccept = 0xC2,
    ActivateDefaultEpsBearerContextReject = 0xC3,
    ActivateDedicatedEpsBearerContextRequest = 0xC5,
    ActivateDedicatedEpsBearerContextAccept = 0xC6,
    ActivateDedicatedEpsBearerContextReject = 0xC7,
    ModifyEpsBearerContextRequest = 0xC9,
    ModifyEpsBearerContextAccept = 0xCA,
    ModifyEpsBearerContextReject = 0xCB,
    DeactivateEpsBearerContextRequest = 0xCD,
    DeactivateEpsBearerContextAccept = 0xCE,

    PdnConnectivityRequest = 0xD0,
    PdnConnectivityReject = 0xD1,
    PdnDisconnectRequest = 0xD2,
    PdnDisconnectReject = 0xD3,
    BearerResourceAllocationRequest = 0xD4,
    BearerResourceAllocationReject = 0xD5,
    BearerResourceModificationRequest = 0xD6,
    BearerResourceModificationReject = 0xD7,

    EsmInformationRequest = 0xD9,
    EsmInformationResponse = 0xDA,

    EsmStatus = 0xE8,
}

/// Cause value that marks a successful EMM procedure.
///
/// It is never a 3GPP cause and never goes on the wire.
pub const EMM_CAUSE_SUCCESS: u8 = 0;

/// EMM cause
/// 3GPP TS 24.301 Section 9.9.3.9 and Annex A
///
/// Values without a variant are kept in `Other` so they re-encode unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum EmmCause {
    ImsiUnknownInHss = 2,
    IllegalUe = 3,
    ImeiNotAccepted = 5,
    IllegalMe = 6,
    EpsServicesNotAllowed = 7,
    EpsAndNonEpsServicesNotAllowed = 8,
    UeIdentityCannotBeDerived = 9,
    ImplicitlyDetached = 10,
    PlmnNotAllowed = 11,
    TrackingAreaNotAllowed = 12,
    RoamingNotAllowedInTrackingArea = 13,
    EpsServicesNotAllowedInPlmn = 14,
    NoSuitableCellsInTrackingArea = 15,
    MscTemporarilyNotReachable = 16,
    NetworkFailure = 17,
    CsDomainNotAvailable = 18,
    EsmFailure = 19,
    MacFailure = 20,
    SynchFailure = 21,
    Congestion = 22,
    UeSecurityCapabilitiesMismatch = 23,
    SecurityModeRejectedUnspecified = 24,
    NotAuthorizedForThisCsg = 25,
    NonEpsAuthenticationUnacceptable = 26,
    RequestedServiceOptionNotAuthorized = 35,
    CsServiceTemporarilyNotAvailable = 39,
    NoEpsBearerContextActivated = 40,
    SevereNetworkFailure = 42,
    SemanticallyIncorrectMessage = 95,
    InvalidMandatoryInformation = 96,
    MessageTypeNonExistent = 97,
    MessageTypeNotCompatible = 98,
    InformationElementNonExistent = 99,
    ConditionalIeError = 100,
    MessageNotCompatible = 101,
    ProtocolErrorUnspecified = 111,
    #[num_enum(catch_all)]
    Other(u8),
}

impl EmmCause {
    /// True for the internal success marker.
    pub fn is_success(&self) -> bool {
        u8::from(*self) == EMM_CAUSE_SUCCESS
    }
}

/// ESM cause
/// 3GPP TS 24.301 Section 9.9.4.4 and Annex B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum EsmCause {
    OperatorDeterminedBarring = 8,
    InsufficientResources = 26,
    UnknownOrMissingApn = 27,
    UnknownPdnType = 28,
    UserAuthenticationFailed = 29,
    RequestRejectedByGateway = 30,
    RequestRejectedUnspecified = 31,
    ServiceOptionNotSupported = 32,
    RequestedServiceOptionNotSubscribed = 33,
    ServiceOptionTemporarilyOutOfOrder = 34,
    PtiAlreadyInUse = 35,
    RegularDeactivation = 36,
    EpsQosNotAccepted = 37,
    NetworkFailure = 38,
    ReactivationRequested = 39,
    SemanticErrorInTftOperation = 41,
    SyntacticalErrorInTftOperation = 42,
    InvalidEpsBearerIdentity = 43,
    SemanticErrorsInPacketFilters = 44,
    SyntacticalErrorsInPacketFilters = 45,
    PtiMismatch = 47,
    LastPdnDisconnectionNotAllowed = 49,
    PdnTypeIpv4OnlyAllowed = 50,
    PdnTypeIpv6OnlyAllowed = 51,
    SingleAddressBearersOnlyAllowed = 52,
    EsmInformationNotReceived = 53,
    PdnConnectionDoesNotExist = 54,
    MultiplePdnConnectionsNotAllowed = 55,
    CollisionWithNetworkInitiatedRequest = 56,
    PdnTypeIpv4v6OnlyAllowed = 57,
    PdnTypeNonIpOnlyAllowed = 58,
    UnsupportedQciValue = 59,
    BearerHandlingNotSupported = 60,
    RequestedApnNotSupportedInCurrentRat = 66,
    InvalidPtiValue = 81,
    SemanticallyIncorrectMessage = 95,
    InvalidMandatoryInformation = 96,
    MessageTypeNonExistent = 97,
    MessageTypeNotCompatible = 98,
    InformationElementNonExistent = 99,
    ConditionalIeError = 100,
    MessageNotCompatible = 101,
    ProtocolErrorUnspecified = 111,
    ApnRestrictionNotCompatible = 112,
    #[num_enum(catch_all)]
    Other(u8),
}

/// Default timer values in seconds, 3GPP TS 24.301 Section 10.2 and 10.3
pub mod timer_defaults {
    /// T3402: attach / TAU retry after failure
    pub const T3402: u32 = 720;
    /// T3412: periodic tracking area update
    pub const T3412: u32 = 3240;
    /// T3450: attach accept / TAU accept / GUTI reallocation command
    pub const T3450: u32 = 6;
    /// T3460: authentication request / security mode command
    pub const T3460: u32 = 6;
    /// T3470: identity request
    pub const T3470: u32 = 6;
    /// T3485: activate bearer context request
    pub const T3485: u32 = 8;
    /// T3486: modify bearer context request
    pub const T3486: u32 = 8;
    /// T3489: ESM information request
    pub const T3489: u32 = 4;
    /// T3495: deactivate bearer context request
    pub const T3495: u32 = 8;
}
