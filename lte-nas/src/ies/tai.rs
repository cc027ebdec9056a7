//! Tracking area identity and tracking area identity list
//! (3GPP TS 24.301 Sections 9.9.3.32 and 9.9.3.33)
//!
//! Each partial list starts with one octet:
//!
//! ```text
//! +-------+---------------+---------------------------+
//! | spare | type of list  | number of elements - 1    |
//! +-------+---------------+---------------------------+
//! ```
//!
//! - type 0: one PLMN, then one TAC per element
//! - type 1: one PLMN, then the first TAC of a consecutive run
//! - type 2: one PLMN + TAC per element

use bytes::{Buf, BufMut};
use lte_common::Plmn;

use super::common::decode_plmn;
use crate::codec::{
    check_content_len, check_list_len, encode_lv_with, read_lv, read_u16, read_u8, NasDecode,
    NasEncode, NasError, NasResult,
};

/// Upper bound on partial lists and on TAIs in one TAI list
pub const TAI_LIST_MAX_PARTIAL: usize = 16;

// ============================================================================
// Tracking area identity (9.9.3.32)
// ============================================================================

/// Tracking area identity (Type 3, 5 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TrackingAreaIdentity {
    /// PLMN
    pub plmn: Plmn,
    /// Tracking area code
    pub tac: u16,
}

impl TrackingAreaIdentity {
    /// Create a TAI
    pub fn new(plmn: Plmn, tac: u16) -> Self {
        Self { plmn, tac }
    }
}

impl NasDecode for TrackingAreaIdentity {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let plmn = decode_plmn(buf)?;
        let tac = read_u16(buf)?;
        Ok(Self { plmn, tac })
    }
}

impl NasEncode for TrackingAreaIdentity {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_slice(&self.plmn.encode());
        buf.put_u16(self.tac);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        5
    }
}

// ============================================================================
// Tracking area identity list (9.9.3.33)
// ============================================================================

/// One partial tracking area identity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialTaiList {
    /// Type 0: non-consecutive TACs in one PLMN
    NonConsecutive { plmn: Plmn, tacs: Vec<u16> },
    /// Type 1: `count` consecutive TACs in one PLMN starting at `first_tac`
    Consecutive { plmn: Plmn, first_tac: u16, count: u8 },
    /// Type 2: TAIs of possibly different PLMNs
    Multiple(Vec<TrackingAreaIdentity>),
}

impl PartialTaiList {
    const TYPE_NON_CONSECUTIVE: u8 = 0;
    const TYPE_CONSECUTIVE: u8 = 1;
    const TYPE_MULTIPLE: u8 = 2;

    /// Number of TAIs this partial list stands for
    pub fn len(&self) -> usize {
        match self {
            PartialTaiList::NonConsecutive { tacs, .. } => tacs.len(),
            PartialTaiList::Consecutive { count, .. } => usize::from(*count),
            PartialTaiList::Multiple(tais) => tais.len(),
        }
    }

    /// True if the partial list names no TAI
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `tai` belongs to this partial list
    pub fn contains(&self, tai: &TrackingAreaIdentity) -> bool {
        match self {
            PartialTaiList::NonConsecutive { plmn, tacs } => {
                *plmn == tai.plmn && tacs.contains(&tai.tac)
            }
            PartialTaiList::Consecutive {
                plmn,
                first_tac,
                count,
            } => {
                let first = u32::from(*first_tac);
                let tac = u32::from(tai.tac);
                *plmn == tai.plmn && tac >= first && tac < first + u32::from(*count)
            }
            PartialTaiList::Multiple(tais) => tais.contains(tai),
        }
    }

    fn type_of_list(&self) -> u8 {
        match self {
            PartialTaiList::NonConsecutive { .. } => Self::TYPE_NON_CONSECUTIVE,
            PartialTaiList::Consecutive { .. } => Self::TYPE_CONSECUTIVE,
            PartialTaiList::Multiple(_) => Self::TYPE_MULTIPLE,
        }
    }

    fn encoded_len(&self) -> usize {
        1 + match self {
            PartialTaiList::NonConsecutive { tacs, .. } => 3 + 2 * tacs.len(),
            PartialTaiList::Consecutive { .. } => 5,
            PartialTaiList::Multiple(tais) => 5 * tais.len(),
        }
    }

    fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let header = read_u8(buf)?;
        if header & 0x80 != 0 {
            return Err(NasError::value(format!(
                "partial TAI list header 0x{header:02X} has the spare bit set"
            )));
        }
        let count = usize::from(header & 0x1F) + 1;
        check_list_len("partial TAI list", count, TAI_LIST_MAX_PARTIAL)?;

        match (header >> 5) & 0x03 {
            Self::TYPE_NON_CONSECUTIVE => {
                let plmn = decode_plmn(buf)?;
                let tacs = (0..count)
                    .map(|_| read_u16(buf))
                    .collect::<NasResult<Vec<_>>>()?;
                Ok(PartialTaiList::NonConsecutive { plmn, tacs })
            }
            Self::TYPE_CONSECUTIVE => {
                let plmn = decode_plmn(buf)?;
                let first_tac = read_u16(buf)?;
                Ok(PartialTaiList::Consecutive {
                    plmn,
                    first_tac,
                    count: count as u8,
                })
            }
            Self::TYPE_MULTIPLE => {
                let tais = (0..count)
                    .map(|_| TrackingAreaIdentity::nas_decode(buf))
                    .collect::<NasResult<Vec<_>>>()?;
                Ok(PartialTaiList::Multiple(tais))
            }
            t => Err(NasError::value(format!("type of TAI list {t}"))),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        let count = self.len();
        if count == 0 {
            return Err(NasError::value("empty partial TAI list"));
        }
        check_list_len("partial TAI list", count, TAI_LIST_MAX_PARTIAL)?;
        buf.put_u8((self.type_of_list() << 5) | (count as u8 - 1));
        match self {
            PartialTaiList::NonConsecutive { plmn, tacs } => {
                buf.put_slice(&plmn.encode());
                for tac in tacs {
                    buf.put_u16(*tac);
                }
            }
            PartialTaiList::Consecutive {
                plmn, first_tac, ..
            } => {
                buf.put_slice(&plmn.encode());
                buf.put_u16(*first_tac);
            }
            PartialTaiList::Multiple(tais) => {
                for tai in tais {
                    tai.nas_encode(buf)?;
                }
            }
        }
        Ok(())
    }
}

/// Tracking area identity list (Type 4, 6-96 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackingAreaIdentityList {
    /// Partial lists in wire order
    pub lists: Vec<PartialTaiList>,
}

impl TrackingAreaIdentityList {
    /// List holding a single TAI
    pub fn single(tai: TrackingAreaIdentity) -> Self {
        Self {
            lists: vec![PartialTaiList::NonConsecutive {
                plmn: tai.plmn,
                tacs: vec![tai.tac],
            }],
        }
    }

    /// True if any partial list names `tai`
    pub fn contains(&self, tai: &TrackingAreaIdentity) -> bool {
        self.lists.iter().any(|l| l.contains(tai))
    }

    /// Number of TAIs across all partial lists
    pub fn tai_count(&self) -> usize {
        self.lists.iter().map(PartialTaiList::len).sum()
    }

    fn content_len(&self) -> usize {
        self.lists.iter().map(PartialTaiList::encoded_len).sum()
    }
}

impl NasDecode for TrackingAreaIdentityList {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("TAI list", content.len(), 6, 96)?;
        let mut lists = Vec::new();
        while content.has_remaining() {
            lists.push(PartialTaiList::decode(&mut content)?);
            check_list_len("TAI list", lists.len(), TAI_LIST_MAX_PARTIAL)?;
        }
        let list = Self { lists };
        check_list_len("TAI list", list.tai_count(), TAI_LIST_MAX_PARTIAL)?;
        Ok(list)
    }
}

impl NasEncode for TrackingAreaIdentityList {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        check_list_len("TAI list", self.lists.len(), TAI_LIST_MAX_PARTIAL)?;
        check_list_len("TAI list", self.tai_count(), TAI_LIST_MAX_PARTIAL)?;
        encode_lv_with(buf, |c| {
            for list in &self.lists {
                list.encode(c)?;
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLMN: Plmn = Plmn::new(1, 1, false);

    #[test]
    fn test_tai() {
        let data = [0x00, 0xF1, 0x10, 0x00, 0x01];
        let tai = TrackingAreaIdentity::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(tai, TrackingAreaIdentity::new(PLMN, 1));
        let mut out = Vec::new();
        tai.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_tai_list_non_consecutive() {
        let data = [0x08, 0x01, 0x00, 0xF1, 0x10, 0x00, 0x01, 0x00, 0x07];
        let list = TrackingAreaIdentityList::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(
            list.lists,
            vec![PartialTaiList::NonConsecutive {
                plmn: PLMN,
                tacs: vec![1, 7]
            }]
        );
        assert!(list.contains(&TrackingAreaIdentity::new(PLMN, 7)));
        assert!(!list.contains(&TrackingAreaIdentity::new(PLMN, 2)));

        let mut out = Vec::new();
        list.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(list.encoded_len(), data.len());
    }

    #[test]
    fn test_tai_list_consecutive_and_multiple() {
        let data = [
            0x0C, // length
            0x23, 0x00, 0xF1, 0x10, 0x00, 0x10, // type 1, 4 TACs from 0x10
            0x40, 0x00, 0xF2, 0x20, 0x00, 0x05, // type 2, one TAI
        ];
        let list = TrackingAreaIdentityList::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(list.tai_count(), 5);
        assert!(list.contains(&TrackingAreaIdentity::new(PLMN, 0x13)));
        assert!(!list.contains(&TrackingAreaIdentity::new(PLMN, 0x14)));
        assert!(list.contains(&TrackingAreaIdentity::new(Plmn::new(2, 2, false), 5)));

        let mut out = Vec::new();
        list.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_tai_list_spare_bit_is_rejected() {
        let data = [0x06, 0x80, 0x00, 0xF1, 0x10, 0x00, 0x01];
        assert!(matches!(
            TrackingAreaIdentityList::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
        let mut valid = data;
        valid[1] = 0x00;
        assert_eq!(TrackingAreaIdentityList::nas_decode(&mut &valid[..]).unwrap().tai_count(), 1);
    }

    #[test]
    fn test_tai_list_element_overrun() {
        // type 0 claiming three TACs but carrying one
        let data = [0x06, 0x02, 0x00, 0xF1, 0x10, 0x00, 0x01];
        assert!(matches!(
            TrackingAreaIdentityList::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_tai_list_count_bound() {
        // type 1 with 32 consecutive TACs
        let data = [0x06, 0x3F, 0x00, 0xF1, 0x10, 0x00, 0x01];
        assert!(matches!(
            TrackingAreaIdentityList::nas_decode(&mut &data[..]),
            Err(NasError::ListTooLong { .. })
        ));
    }

    #[test]
    fn test_tai_list_single() {
        let list = TrackingAreaIdentityList::single(TrackingAreaIdentity::new(PLMN, 1));
        let mut out = Vec::new();
        list.nas_encode(&mut out).unwrap();
        assert_eq!(out, vec![0x06, 0x00, 0x00, 0xF1, 0x10, 0x00, 0x01]);
    }
}
