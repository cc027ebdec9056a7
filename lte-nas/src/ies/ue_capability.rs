//! UE capability information elements
//! (3GPP TS 24.301 Sections 9.9.3.34, 9.9.3.36 and 9.9.3.53)

use bytes::{Buf, BufMut};
use lte_common::OctetString;

use crate::codec::{
    check_content_len, encode_lv_with, read_lv, NasDecode, NasEncode, NasError, NasResult,
};

/// Algorithm bit masks shared by the EEA/EIA/UEA/UIA/GEA octets
pub mod algorithm {
    /// Algorithm 0 (null), bit 8
    pub const ALG0: u8 = 0x80;
    /// Algorithm 1, bit 7
    pub const ALG1: u8 = 0x40;
    /// Algorithm 2, bit 6
    pub const ALG2: u8 = 0x20;
    /// Algorithm 3, bit 5
    pub const ALG3: u8 = 0x10;
}

// ============================================================================
// UE network capability (9.9.3.34)
// ============================================================================

/// UMTS octets of the UE network capability (octets 5 and 6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UmtsAlgorithms {
    /// UEA0-UEA7
    pub uea: u8,
    /// UCS2 support (octet 6, bit 8)
    pub ucs2: bool,
    /// UIA1-UIA7
    pub uia: u8,
}

/// Feature bits of octets 7 onward, as `(index into features, mask)`
pub mod network_feature {
    /// eNodeB-based access class control for CSFB
    pub const ACC_CSFB: (usize, u8) = (0, 0x10);
    /// LTE positioning protocol
    pub const LPP: (usize, u8) = (0, 0x08);
    /// Location services notification mechanisms
    pub const LCS: (usize, u8) = (0, 0x04);
    /// 1xSRVCC
    pub const SRVCC_1X: (usize, u8) = (0, 0x02);
    /// Notification procedure
    pub const NF: (usize, u8) = (0, 0x01);
    /// Extended protocol configuration options
    pub const EPCO: (usize, u8) = (1, 0x80);
    /// Header compression for control plane CIoT EPS optimization
    pub const HC_CP_CIOT: (usize, u8) = (1, 0x40);
    /// Attach without PDN connection
    pub const ERW_OPDN: (usize, u8) = (1, 0x20);
    /// S1-U data transfer
    pub const S1U_DATA: (usize, u8) = (1, 0x10);
    /// User plane CIoT EPS optimization
    pub const UP_CIOT: (usize, u8) = (1, 0x08);
    /// Control plane CIoT EPS optimization
    pub const CP_CIOT: (usize, u8) = (1, 0x04);
    /// Dual connectivity with NR
    pub const DCNR: (usize, u8) = (2, 0x10);
    /// N1 mode
    pub const N1_MODE: (usize, u8) = (2, 0x20);
}

/// UE network capability (Type 4, 2-13 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UeNetworkCapability {
    /// EEA0-EEA7 (octet 3)
    pub eea: u8,
    /// EIA0-EIA7 (octet 4)
    pub eia: u8,
    /// Octets 5 and 6
    pub umts: Option<UmtsAlgorithms>,
    /// Octets 7 onward, as received
    pub features: OctetString,
}

impl UeNetworkCapability {
    const MAX_CONTENT_LEN: usize = 13;

    /// Capability with only the EPS algorithm octets
    pub fn new(eea: u8, eia: u8) -> Self {
        Self {
            eea,
            eia,
            ..Default::default()
        }
    }

    /// True if the feature bit is set
    pub fn supports(&self, feature: (usize, u8)) -> bool {
        let (index, mask) = feature;
        self.features
            .data()
            .get(index)
            .is_some_and(|octet| octet & mask != 0)
    }

    fn content_len(&self) -> usize {
        2 + if self.umts.is_some() { 2 } else { 0 } + self.features.len()
    }
}

impl NasDecode for UeNetworkCapability {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("UE network capability", content.len(), 2, Self::MAX_CONTENT_LEN)?;
        let eea = content.get_u8();
        let eia = content.get_u8();
        let umts = match content.remaining() {
            0 => None,
            1 => return Err(NasError::value("UE network capability ends inside UMTS octets")),
            _ => {
                let uea = content.get_u8();
                let octet = content.get_u8();
                Some(UmtsAlgorithms {
                    uea,
                    ucs2: octet & 0x80 != 0,
                    uia: octet & 0x7F,
                })
            }
        };
        Ok(Self {
            eea,
            eia,
            umts,
            features: OctetString::from_slice(&content),
        })
    }
}

impl NasEncode for UeNetworkCapability {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        if self.umts.is_none() && !self.features.is_empty() {
            return Err(NasError::value("UE network capability features without UMTS octets"));
        }
        if self.content_len() > Self::MAX_CONTENT_LEN {
            return Err(NasError::OctetStringTooLongForIei {
                len: self.content_len(),
                max: Self::MAX_CONTENT_LEN,
            });
        }
        encode_lv_with(buf, |c| {
            c.put_u8(self.eea);
            c.put_u8(self.eia);
            if let Some(umts) = &self.umts {
                c.put_u8(umts.uea);
                c.put_u8((u8::from(umts.ucs2) << 7) | (umts.uia & 0x7F));
            }
            c.put_slice(self.features.data());
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

// ============================================================================
// UE security capability (9.9.3.36)
// ============================================================================

/// UE security capability (Type 4, 2, 4 or 5 content octets)
///
/// Bit 8 of the UIA and GEA octets is spare and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UeSecurityCapability {
    /// EEA0-EEA7
    pub eea: u8,
    /// EIA0-EIA7
    pub eia: u8,
    /// UEA0-UEA7 and UIA1-UIA7
    pub umts: Option<(u8, u8)>,
    /// GEA1-GEA7, only with UMTS octets present
    pub gea: Option<u8>,
}

impl UeSecurityCapability {
    /// Echo the EPS octets of a UE network capability
    pub fn from_network_capability(cap: &UeNetworkCapability) -> Self {
        Self {
            eea: cap.eea,
            eia: cap.eia,
            umts: cap.umts.map(|u| (u.uea, u.uia)),
            gea: None,
        }
    }

    fn content_len(&self) -> usize {
        2 + if self.umts.is_some() { 2 } else { 0 } + usize::from(self.gea.is_some())
    }
}

impl NasDecode for UeSecurityCapability {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        let len = content.len();
        check_content_len("UE security capability", len, 2, 5)?;
        if len == 3 {
            return Err(NasError::value("UE security capability ends inside UMTS octets"));
        }
        let eea = content.get_u8();
        let eia = content.get_u8();
        let umts = (len >= 4).then(|| (content.get_u8(), content.get_u8() & 0x7F));
        let gea = (len == 5).then(|| content.get_u8() & 0x7F);
        Ok(Self {
            eea,
            eia,
            umts,
            gea,
        })
    }
}

impl NasEncode for UeSecurityCapability {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        if self.gea.is_some() && self.umts.is_none() {
            return Err(NasError::value("UE security capability GEA without UMTS octets"));
        }
        encode_lv_with(buf, |c| {
            c.put_u8(self.eea);
            c.put_u8(self.eia);
            if let Some((uea, uia)) = self.umts {
                c.put_u8(uea);
                c.put_u8(uia & 0x7F);
            }
            if let Some(gea) = self.gea {
                c.put_u8(gea & 0x7F);
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

// ============================================================================
// UE additional security capability (9.9.3.53)
// ============================================================================

/// UE additional security capability (Type 4, 4 content octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UeAdditionalSecurityCapability {
    /// 5G-EA0-5G-EA15
    pub nr_ea: u16,
    /// 5G-IA0-5G-IA15
    pub nr_ia: u16,
}

impl NasDecode for UeAdditionalSecurityCapability {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("UE additional security capability", content.len(), 4, 4)?;
        Ok(Self {
            nr_ea: content.get_u16(),
            nr_ia: content.get_u16(),
        })
    }
}

impl NasEncode for UeAdditionalSecurityCapability {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            c.put_u16(self.nr_ea);
            c.put_u16(self.nr_ia);
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        5
    }
}
