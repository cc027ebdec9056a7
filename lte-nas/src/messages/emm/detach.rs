//! Detach Messages (3GPP TS 24.301 Sections 8.2.9 - 8.2.11)
//!
//! Both detach requests share message type 0x45; the direction decides
//! the layout:
//! - Detach Request (UE originating) - UE to network
//! - Detach Request (UE terminated) - network to UE
//! - Detach Accept - either direction, no IEs

use bytes::{Buf, BufMut};

use crate::codec::{
    check_mandatory_length, encode_optional, read_u8, InformationElement1, NasDecode, NasEncode,
    NasResult,
};
use crate::enums::{EmmCause, EmmMessageType};
use crate::ies::{DetachType, EpsMobileIdentity, NasKeySetIdentifier};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

// ============================================================================
// Detach Request (UE originating) - 3GPP TS 24.301 Section 8.2.11.1
// ============================================================================

/// Detach Request message (UE originating - UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetachRequest {
    /// Detach type (mandatory, Type 1, low nibble)
    pub detach_type: DetachType,
    /// NAS key set identifier (mandatory, Type 1, high nibble)
    pub nas_key_set_identifier: NasKeySetIdentifier,
    /// GUTI or IMSI (mandatory, LV)
    pub eps_mobile_identity: EpsMobileIdentity,
}

impl EmmMessageBody for DetachRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::DetachRequest;
    const NAME: &'static str = "Detach Request";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 3)?;
        let octet = read_u8(buf)?;
        Ok(Self {
            detach_type: DetachType::decode(octet & 0x0F)?,
            nas_key_set_identifier: NasKeySetIdentifier::decode(octet >> 4)?,
            eps_mobile_identity: EpsMobileIdentity::nas_decode(buf)?,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8((self.nas_key_set_identifier.encode() << 4) | self.detach_type.encode());
        self.eps_mobile_identity.nas_encode(buf)
    }
}

// ============================================================================
// Detach Request (UE terminated) - 3GPP TS 24.301 Section 8.2.11.2
// ============================================================================

/// IEI values for the network originated Detach Request
pub mod network_detach_request_iei {
    /// EMM cause
    pub const EMM_CAUSE: u8 = 0x53;
}

/// Presence mask bits of [`NetworkDetachRequest`]
pub mod network_detach_request_presence {
    #![allow(missing_docs)]
    pub const EMM_CAUSE: u32 = 1 << 0;
}

/// Detach Request message (UE terminated - network to UE)
///
/// Decoding a PDU with message type 0x45 always yields [`DetachRequest`];
/// decode this layout explicitly with [`crate::decode_emm`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkDetachRequest {
    /// Detach type (mandatory, Type 1, low nibble; high nibble spare)
    pub detach_type: DetachType,
    /// EMM cause (TV, IEI 0x53)
    pub emm_cause: Option<EmmCause>,
}

impl EmmMessageBody for NetworkDetachRequest {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::DetachRequest;
    const NAME: &'static str = "Detach Request (UE terminated)";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 1)?;
        let mut msg = Self {
            detach_type: DetachType::decode(read_u8(buf)? & 0x0F)?,
            emm_cause: None,
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                network_detach_request_iei::EMM_CAUSE => {
                    keep_first(&mut msg.emm_cause, Self::NAME, raw, EmmCause::nas_decode(buf)?)
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.detach_type.encode());
        encode_optional(buf, network_detach_request_iei::EMM_CAUSE, &self.emm_cause)
    }

    fn presence_mask(&self) -> u32 {
        presence_mask_of(&[(
            self.emm_cause.is_some(),
            network_detach_request_presence::EMM_CAUSE,
        )])
    }
}

// ============================================================================
// Detach Accept - 3GPP TS 24.301 Section 8.2.10
// ============================================================================

/// Detach Accept message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetachAccept;

impl EmmMessageBody for DetachAccept {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::DetachAccept;
    const NAME: &'static str = "Detach Accept";

    fn decode_body<B: Buf>(_buf: &mut B) -> NasResult<Self> {
        Ok(Self)
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) -> NasResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::Guti;

    #[test]
    fn test_detach_request_switch_off() {
        let data = [
            0x09, 0x0B, 0xF6, 0x00, 0xF1, 0x10, 0x80, 0x01, 0x02, 0xC0, 0x00, 0x0A, 0x5E,
        ];
        let msg = DetachRequest::decode_body(&mut &data[..]).unwrap();
        assert!(msg.detach_type.switch_off);
        assert_eq!(msg.detach_type.type_of_detach, DetachType::EPS);
        assert_eq!(msg.nas_key_set_identifier, NasKeySetIdentifier::native(0));
        let EpsMobileIdentity::Guti(Guti { m_tmsi, .. }) = msg.eps_mobile_identity else {
            panic!("expected GUTI");
        };
        assert_eq!(m_tmsi, 0xC000_0A5E);

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_network_detach_request_with_cause() {
        let data = [0x02, 0x53, 0x07];
        let msg = NetworkDetachRequest::decode_body(&mut &data[..]).unwrap();
        assert_eq!(msg.detach_type.type_of_detach, 2);
        assert_eq!(msg.emm_cause, Some(EmmCause::EpsServicesNotAllowed));
        assert_eq!(msg.presence_mask(), network_detach_request_presence::EMM_CAUSE);

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_network_detach_request_spare_nibble_ignored() {
        let msg = NetworkDetachRequest::decode_body(&mut &[0xF1u8][..]).unwrap();
        assert_eq!(msg.detach_type, DetachType::new(false, 1));
        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, vec![0x01]);
    }

    #[test]
    fn test_detach_accept_leaves_trailing_octets() {
        let data = [0xAAu8];
        let mut buf = &data[..];
        DetachAccept::decode_body(&mut buf).unwrap();
        assert_eq!(buf.len(), 1);
    }
}
