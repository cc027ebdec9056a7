//! NAS Information Elements (IEs)
//!
//! IEs of 3GPP TS 24.008 used by EPS NAS live in [`common`], [`mobile_identity`],
//! [`mm`], [`gmm`], [`sm`], [`pco`] and [`tft`]. The TS 24.301 EMM and ESM
//! IEs live in [`emm`], [`eps_mobile_identity`], [`tai`], [`ue_capability`]
//! and [`esm`]; [`bitrate`] holds the bit rate ladder they share with the
//! 24.008 QoS.
//!
//! ## IE Types
//!
//! - Type 1: half-octet, [`crate::codec::InformationElement1`]
//! - Type 3: fixed length V / TV
//! - Type 4: LV / TLV
//! - Type 6: LV-E / TLV-E

pub mod bitrate;
pub mod common;
pub mod emm;
pub mod eps_mobile_identity;
pub mod esm;
pub mod gmm;
pub mod mm;
pub mod mobile_identity;
pub mod pco;
pub mod sm;
pub mod tai;
pub mod tft;
pub mod ue_capability;

pub use bitrate::{code_to_kbps, kbps_to_code, BitrateCode};
pub use common::*;
pub use emm::*;
pub use eps_mobile_identity::{EpsMobileIdentity, Guti};
pub use esm::*;
pub use gmm::*;
pub use mm::*;
pub use mobile_identity::{MobileIdentity, MobileIdentityType, Tmgi};
pub use pco::{ProtocolConfigurationOptions, ProtocolOrContainer, PCO_MAX_OPTIONS};
pub use sm::*;
pub use tai::{PartialTaiList, TrackingAreaIdentity, TrackingAreaIdentityList, TAI_LIST_MAX_PARTIAL};
pub use tft::{PacketFilter, PacketFilterComponent, TrafficFlowTemplate, TftOperationCode};
pub use ue_capability::{UeAdditionalSecurityCapability, UeNetworkCapability, UeSecurityCapability};
