//! EMM (EPS Mobility Management) Messages
//!
//! This module contains implementations of EMM messages
//! as defined in 3GPP TS 24.301 Section 8.2.
//!
//! ## Attach Messages
//!
//! - [`AttachRequest`] - UE to network attach request
//! - [`AttachAccept`] - Network to UE attach accept
//! - [`AttachComplete`] - UE to network attach complete
//! - [`AttachReject`] - Network to UE attach reject
//!
//! ## Detach Messages
//!
//! - [`DetachRequest`] - UE originating detach request
//! - [`NetworkDetachRequest`] - UE terminated detach request
//! - [`DetachAccept`] - Detach accept, either direction
//!
//! ## Tracking Area Update Messages
//!
//! - [`TrackingAreaUpdateRequest`], [`TrackingAreaUpdateAccept`],
//!   [`TrackingAreaUpdateComplete`], [`TrackingAreaUpdateReject`]
//!
//! ## Service Messages
//!
//! - [`ServiceRequest`] - UE to network service request (short header)
//! - [`ExtendedServiceRequest`] - UE to network extended service request
//! - [`ServiceReject`] - Network to UE service reject
//!
//! ## Common Procedures
//!
//! - [`GutiReallocationCommand`], [`GutiReallocationComplete`]
//! - [`AuthenticationRequest`], [`AuthenticationResponse`],
//!   [`AuthenticationReject`], [`AuthenticationFailure`]
//! - [`IdentityRequest`], [`IdentityResponse`]
//! - [`SecurityModeCommand`], [`SecurityModeComplete`], [`SecurityModeReject`]
//! - [`EmmInformation`]
//!
//! ## Status Messages
//!
//! - [`EmmStatus`] - EMM status message for error reporting
//!
//! ## NAS Transport Messages
//!
//! - [`DownlinkNasTransport`], [`UplinkNasTransport`]
//! - [`DownlinkGenericNasTransport`], [`UplinkGenericNasTransport`]
//!
//! ## Notification Messages
//!
//! - [`CsServiceNotification`] - Network to UE CS service notification

pub mod attach;
mod authentication;
mod detach;
mod guti_reallocation;
mod identity;
mod information;
pub mod nas_transport;
pub mod notification;
pub mod security_mode;
pub mod service;
mod status;
pub mod tracking_area_update;

pub use attach::*;
pub use authentication::*;
pub use detach::*;
pub use guti_reallocation::*;
pub use identity::*;
pub use information::*;
pub use nas_transport::*;
pub use notification::*;
pub use security_mode::*;
pub use service::*;
pub use status::*;
pub use tracking_area_update::*;
