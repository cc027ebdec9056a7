//! Security Mode Messages (3GPP TS 24.301 Sections 8.2.20 - 8.2.22)
//!
//! - Security Mode Command - network to UE
//! - Security Mode Complete - UE to network
//! - Security Mode Reject - UE to network

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, encode_optional_ie1, read_u8, InformationElement1,
    NasDecode, NasEncode, NasResult,
};
use crate::enums::{EmmCause, EmmMessageType};
use crate::ies::{
    HashMme, ImeisvRequest, MobileIdentity, NasKeySetIdentifier, NasSecurityAlgorithms, Nonce,
    ReplayedNasMessageContainer, UeAdditionalSecurityCapability, UeSecurityCapability,
};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

// ============================================================================
// Security Mode Command (3GPP TS 24.301 Section 8.2.20)
// ============================================================================

/// IEI values for Security Mode Command optional IEs
pub mod security_mode_command_iei {
    /// IMEISV request
    pub const IMEISV_REQUEST: u8 = 0xC0;
    /// Replayed NonceUE
    pub const REPLAYED_NONCE_UE: u8 = 0x55;
    /// NonceMME
    pub const NONCE_MME: u8 = 0x56;
    /// HashMME
    pub const HASH_MME: u8 = 0x4F;
    /// Replayed UE additional security capability
    pub const REPLAYED_UE_ADDITIONAL_SECURITY_CAPABILITY: u8 = 0x6F;
}

/// Presence mask bits of [`SecurityModeCommand`]
pub mod security_mode_command_presence {
    #![allow(missing_docs)]
    pub const IMEISV_REQUEST: u32 = 1 << 0;
    pub const REPLAYED_NONCE_UE: u32 = 1 << 1;
    pub const NONCE_MME: u32 = 1 << 2;
    pub const HASH_MME: u32 = 1 << 3;
    pub const REPLAYED_UE_ADDITIONAL_SECURITY_CAPABILITY: u32 = 1 << 4;
}

/// Security Mode Command message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityModeCommand {
    /// Selected NAS security algorithms (mandatory, V)
    pub selected_nas_security_algorithms: NasSecurityAlgorithms,
    /// NAS key set identifier (mandatory, Type 1, low nibble; high nibble spare)
    pub nas_key_set_identifier: NasKeySetIdentifier,
    /// Replayed UE security capabilities (mandatory, LV)
    pub replayed_ue_security_capabilities: UeSecurityCapability,
    /// IMEISV request (TV 1, IEI 0xC)
    pub imeisv_request: Option<ImeisvRequest>,
    /// Replayed NonceUE (TV, IEI 0x55)
    pub replayed_nonce_ue: Option<Nonce>,
    /// NonceMME (TV, IEI 0x56)
    pub nonce_mme: Option<Nonce>,
    /// HashMME (TLV, IEI 0x4F)
    pub hash_mme: Option<HashMme>,
    /// Replayed UE additional security capability (TLV, IEI 0x6F)
    pub replayed_ue_additional_security_capability: Option<UeAdditionalSecurityCapability>,
}

impl EmmMessageBody for SecurityModeCommand {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::SecurityModeCommand;
    const NAME: &'static str = "Security Mode Command";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use security_mode_command_iei as iei;

        check_mandatory_length(buf, 5)?;
        let mut msg = Self {
            selected_nas_security_algorithms: NasSecurityAlgorithms::nas_decode(buf)?,
            nas_key_set_identifier: NasKeySetIdentifier::decode(read_u8(buf)? & 0x0F)?,
            replayed_ue_security_capabilities: UeSecurityCapability::nas_decode(buf)?,
            ..Default::default()
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::IMEISV_REQUEST => {
                    keep_first(
                        &mut msg.imeisv_request,
                        Self::NAME,
                        raw,
                        ImeisvRequest::decode(raw & 0x0F)?,
                    )
                }
                iei::REPLAYED_NONCE_UE => keep_first(
                    &mut msg.replayed_nonce_ue,
                    Self::NAME,
                    raw,
                    Nonce::nas_decode(buf)?,
                ),
                iei::NONCE_MME => keep_first(
                    &mut msg.nonce_mme,
                    Self::NAME,
                    raw,
                    Nonce::nas_decode(buf)?,
                ),
                iei::HASH_MME => keep_first(
                    &mut msg.hash_mme,
                    Self::NAME,
                    raw,
                    HashMme::nas_decode(buf)?,
                ),
                iei::REPLAYED_UE_ADDITIONAL_SECURITY_CAPABILITY => {
                    keep_first(
                        &mut msg.replayed_ue_additional_security_capability,
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
        use security_mode_command_iei as iei;

        self.selected_nas_security_algorithms.nas_encode(buf)?;
        buf.put_u8(self.nas_key_set_identifier.encode());
        self.replayed_ue_security_capabilities.nas_encode(buf)?;
        encode_optional_ie1(buf, iei::IMEISV_REQUEST, &self.imeisv_request)?;
        encode_optional(buf, iei::REPLAYED_NONCE_UE, &self.replayed_nonce_ue)?;
        encode_optional(buf, iei::NONCE_MME, &self.nonce_mme)?;
        encode_optional(buf, iei::HASH_MME, &self.hash_mme)?;
        encode_optional(
            buf,
            iei::REPLAYED_UE_ADDITIONAL_SECURITY_CAPABILITY,
            &self.replayed_ue_additional_security_capability,
        )
    }

    fn presence_mask(&self) -> u32 {
        use security_mode_command_presence as p;

        presence_mask_of(&[
            (self.imeisv_request.is_some(), p::IMEISV_REQUEST),
            (self.replayed_nonce_ue.is_some(), p::REPLAYED_NONCE_UE),
            (self.nonce_mme.is_some(), p::NONCE_MME),
            (self.hash_mme.is_some(), p::HASH_MME),
            (
                self.replayed_ue_additional_security_capability.is_some(),
                p::REPLAYED_UE_ADDITIONAL_SECURITY_CAPABILITY,
            ),
        ])
    }
}

// ============================================================================
// Security Mode Complete (3GPP TS 24.301 Section 8.2.21)
// ============================================================================

/// IEI values for Security Mode Complete optional IEs
pub mod security_mode_complete_iei {
    /// IMEISV
    pub const IMEISV: u8 = 0x23;
    /// Replayed NAS message container
    pub const REPLAYED_NAS_MESSAGE_CONTAINER: u8 = 0x79;
}

/// Presence mask bits of [`SecurityModeComplete`]
pub mod security_mode_complete_presence {
    #![allow(missing_docs)]
    pub const IMEISV: u32 = 1 << 0;
    pub const REPLAYED_NAS_MESSAGE_CONTAINER: u32 = 1 << 1;
}

/// Security Mode Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityModeComplete {
    /// IMEISV (TLV, IEI 0x23)
    pub imeisv: Option<MobileIdentity>,
    /// Replayed NAS message container (TLV-E, IEI 0x79)
    pub replayed_nas_message_container: Option<ReplayedNasMessageContainer>,
}

impl EmmMessageBody for SecurityModeComplete {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::SecurityModeComplete;
    const NAME: &'static str = "Security Mode Complete";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use security_mode_complete_iei as iei;

        let mut msg = Self::default();
        while let Some((raw, key)) = next_iei(buf) {
            match key {
                iei::IMEISV => keep_first(
                    &mut msg.imeisv,
                    Self::NAME,
                    raw,
                    MobileIdentity::nas_decode(buf)?,
                ),
                iei::REPLAYED_NAS_MESSAGE_CONTAINER => {
                    keep_first(
                        &mut msg.replayed_nas_message_container,
                        Self::NAME,
                        raw,
                        ReplayedNasMessageContainer::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        use security_mode_complete_iei as iei;

        encode_optional(buf, iei::IMEISV, &self.imeisv)?;
        encode_optional(
            buf,
            iei::REPLAYED_NAS_MESSAGE_CONTAINER,
            &self.replayed_nas_message_container,
        )
    }

    fn presence_mask(&self) -> u32 {
        use security_mode_complete_presence as p;

        presence_mask_of(&[
            (self.imeisv.is_some(), p::IMEISV),
            (
                self.replayed_nas_message_container.is_some(),
                p::REPLAYED_NAS_MESSAGE_CONTAINER,
            ),
        ])
    }
}

// ============================================================================
// Security Mode Reject (3GPP TS 24.301 Section 8.2.22)
// ============================================================================

/// Security Mode Reject message (UE to network)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityModeReject {
    /// EMM cause (mandatory, V)
    pub emm_cause: EmmCause,
}

impl EmmMessageBody for SecurityModeReject {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::SecurityModeReject;
    const NAME: &'static str = "Security Mode Reject";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        Ok(Self {
            emm_cause: EmmCause::nas_decode(buf)?,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.emm_cause.nas_encode(buf)
    }
}
