//! GUTI Reallocation messages (3GPP TS 24.301 Sections 8.2.16, 8.2.17)

use bytes::{Buf, BufMut};

use crate::codec::{check_mandatory_length, encode_optional, NasDecode, NasEncode, NasResult};
use crate::enums::EmmMessageType;
use crate::ies::{EpsMobileIdentity, TrackingAreaIdentityList};
use crate::messages::{keep_first, next_iei, presence_mask_of, unexpected_iei, EmmMessageBody};

/// IEI values for GUTI Reallocation Command optional IEs
pub mod guti_reallocation_command_iei {
    /// TAI list
    pub const TAI_LIST: u8 = 0x54;
}

/// Presence mask bits of [`GutiReallocationCommand`]
pub mod guti_reallocation_command_presence {
    #![allow(missing_docs)]
    pub const TAI_LIST: u32 = 1 << 0;
}

/// GUTI Reallocation Command message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GutiReallocationCommand {
    /// New GUTI (mandatory, LV)
    pub guti: EpsMobileIdentity,
    /// TAI list (TLV, IEI 0x54)
    pub tai_list: Option<TrackingAreaIdentityList>,
}

impl EmmMessageBody for GutiReallocationCommand {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::GutiReallocationCommand;
    const NAME: &'static str = "GUTI Reallocation Command";

    fn decode_body<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_mandatory_length(buf, 2)?;
        let mut msg = Self {
            guti: EpsMobileIdentity::nas_decode(buf)?,
            tai_list: None,
        };

        while let Some((raw, key)) = next_iei(buf) {
            match key {
                guti_reallocation_command_iei::TAI_LIST => {
                    keep_first(
                        &mut msg.tai_list,
                        Self::NAME,
                        raw,
                        TrackingAreaIdentityList::nas_decode(buf)?,
                    )
                }
                _ => return Err(unexpected_iei(Self::NAME, raw)),
            }
        }

        Ok(msg)
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        self.guti.nas_encode(buf)?;
        encode_optional(buf, guti_reallocation_command_iei::TAI_LIST, &self.tai_list)
    }

    fn presence_mask(&self) -> u32 {
        presence_mask_of(&[(
            self.tai_list.is_some(),
            guti_reallocation_command_presence::TAI_LIST,
        )])
    }
}

/// GUTI Reallocation Complete message (UE to network)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GutiReallocationComplete;

impl EmmMessageBody for GutiReallocationComplete {
    const MESSAGE_TYPE: EmmMessageType = EmmMessageType::GutiReallocationComplete;
    const NAME: &'static str = "GUTI Reallocation Complete";

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
    use crate::ies::{PartialTaiList, TrackingAreaIdentity};
    use lte_common::Plmn;

    #[test]
    fn test_guti_reallocation_command_with_consecutive_tai_list() {
        let data = [
            0x0B, 0xF6, 0x00, 0xF1, 0x10, 0x80, 0x01, 0x02, 0xC0, 0x00, 0x0A, 0x5F, 0x54, 0x06,
            0x22, 0x00, 0xF1, 0x10, 0x00, 0x10,
        ];
        let msg = GutiReallocationCommand::decode_body(&mut &data[..]).unwrap();
        let list = msg.tai_list.as_ref().unwrap();
        assert_eq!(
            list.lists[0],
            PartialTaiList::Consecutive {
                plmn: Plmn::new(1, 1, false),
                first_tac: 0x10,
                count: 3,
            }
        );
        assert!(list.contains(&TrackingAreaIdentity::new(Plmn::new(1, 1, false), 0x12)));
        assert!(!list.contains(&TrackingAreaIdentity::new(Plmn::new(1, 1, false), 0x13)));

        let mut out = Vec::new();
        msg.encode_body(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_guti_reallocation_command_requires_guti() {
        assert!(GutiReallocationCommand::decode_body(&mut &[0x0Bu8][..]).is_err());
    }
}
