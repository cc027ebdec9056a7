//! NAS (Non-Access Stratum) protocol library for EPS
//!
//! Implements LTE NAS message encoding/decoding for:
//! - EMM (EPS Mobility Management, 3GPP TS 24.301 Section 8.2)
//! - ESM (EPS Session Management, 3GPP TS 24.301 Section 8.3)
//!
//! # Overview
//!
//! Information elements of TS 24.008 and TS 24.301 live in [`ies`], each with
//! a [`codec::NasDecode`] / [`codec::NasEncode`] pair over `bytes::Buf` and
//! `bytes::BufMut`. Messages in [`messages`] are built from those IEs; the
//! dispatch functions pick the message from the protocol discriminator and
//! message type octets.
//!
//! # Message Structure
//!
//! NAS messages consist of:
//! - A header (plain EMM, plain ESM, security protected or Service Request)
//! - Message-specific information elements (IEs)
//!
//! ## Header Types
//!
//! - [`EmmHeader`]: Plain EMM message header (2 bytes)
//! - [`EsmHeader`]: Plain ESM message header (3 bytes)
//! - [`SecurityProtectedHeader`]: Security protected header (6 bytes)
//!
//! # Example
//!
//! ```rust
//! use lte_nas::{decode_nas_message, EmmMessage, NasMessage};
//!
//! // Attach Complete with an empty ESM message container
//! let pdu = [0x07, 0x43, 0x00, 0x00];
//! let (message, consumed) = decode_nas_message(&pdu).unwrap();
//! assert_eq!(consumed, pdu.len());
//! assert!(matches!(message, NasMessage::Emm(EmmMessage::AttachComplete(_))));
//! assert_eq!(message.to_vec().unwrap(), pdu);
//! ```

pub mod codec;
pub mod enums;
pub mod header;
pub mod ies;
pub mod messages;
pub mod nas_codec;

#[cfg(test)]
mod capture_tests;

// Re-export commonly used types
pub use codec::{
    decode_tagged, encode_with_iei, InformationElement1, NasDecode, NasEncode, NasError, NasResult,
};
pub use enums::{
    EmmCause, EmmMessageType, EsmCause, EsmMessageType, ProtocolDiscriminator, SecurityHeaderType,
};
pub use header::{EmmHeader, EsmHeader, SecurityProtectedHeader};
pub use nas_codec::NasCodec;

// Re-export message types
pub use messages::{
    decode_emm, decode_emm_message, decode_esm, decode_esm_message, decode_nas_message,
    encode_emm_message, encode_esm_message, encode_nas_message, EmmMessage, EmmMessageBody,
    EsmBody, EsmMessage, EsmMessageBody, NasMessage, ProtectedNasMessage,
};
pub use messages::{
    // EMM messages
    AttachAccept, AttachComplete, AttachReject, AttachRequest, AuthenticationFailure,
    AuthenticationReject, AuthenticationRequest, AuthenticationResponse, CsServiceNotification,
    DetachAccept, DetachRequest, DownlinkGenericNasTransport, DownlinkNasTransport,
    EmmInformation, EmmStatus, ExtendedServiceRequest, GutiReallocationCommand,
    GutiReallocationComplete, IdentityRequest, IdentityResponse, NetworkDetachRequest,
    SecurityModeCommand, SecurityModeComplete, SecurityModeReject, ServiceReject, ServiceRequest,
    TrackingAreaUpdateAccept, TrackingAreaUpdateComplete, TrackingAreaUpdateReject,
    TrackingAreaUpdateRequest, UplinkGenericNasTransport, UplinkNasTransport,
    // ESM messages
    ActivateDedicatedEpsBearerContextAccept, ActivateDedicatedEpsBearerContextReject,
    ActivateDedicatedEpsBearerContextRequest, ActivateDefaultEpsBearerContextAccept,
    ActivateDefaultEpsBearerContextReject, ActivateDefaultEpsBearerContextRequest,
    BearerResourceAllocationReject, BearerResourceAllocationRequest,
    BearerResourceModificationReject, BearerResourceModificationRequest,
    DeactivateEpsBearerContextAccept, DeactivateEpsBearerContextRequest, EsmInformationRequest,
    EsmInformationResponse, EsmStatus, ModifyEpsBearerContextAccept, ModifyEpsBearerContextReject,
    ModifyEpsBearerContextRequest, PdnConnectivityReject, PdnConnectivityRequest,
    PdnDisconnectReject, PdnDisconnectRequest,
};
