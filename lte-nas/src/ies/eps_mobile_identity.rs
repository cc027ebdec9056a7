//! EPS mobile identity (3GPP TS 24.301 Section 9.9.3.12)
//!
//! ```text
//! GUTI:
//! +-----------------------+-------+-----------------+
//! | 1 1 1 1               | 0     | 1 1 0           |  octet 3
//! +-----------------------+-------+-----------------+
//! | MCC / MNC (3 octets)                            |  octets 4-6
//! | MME group ID (2 octets)                         |  octets 7-8
//! | MME code (1 octet)                              |  octet 9
//! | M-TMSI (4 octets)                               |  octets 10-13
//! +-------------------------------------------------+
//! ```
//!
//! IMSI and IMEI are BCD coded as in the 24.008 mobile identity.

use bytes::{Buf, BufMut};
use lte_common::Plmn;

use super::common::decode_plmn;
use super::mobile_identity::{
    decode_digits, encode_digits, DigitBounds, ODD_EVEN_FLAG, TYPE_MASK,
};
use crate::codec::{
    check_content_len, encode_lv_with, read_lv, NasDecode, NasEncode, NasError, NasResult,
};

/// Globally unique temporary identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guti {
    /// PLMN of the MME
    pub plmn: Plmn,
    /// MME group ID
    pub mme_group_id: u16,
    /// MME code
    pub mme_code: u8,
    /// M-TMSI
    pub m_tmsi: u32,
}

/// EPS mobile identity (Type 4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpsMobileIdentity {
    Imsi(String),
    Guti(Guti),
    Imei(String),
}

impl Default for EpsMobileIdentity {
    fn default() -> Self {
        EpsMobileIdentity::Guti(Guti::default())
    }
}

impl EpsMobileIdentity {
    /// IMSI type of identity
    pub const TYPE_IMSI: u8 = 0x01;
    /// IMEI type of identity
    pub const TYPE_IMEI: u8 = 0x03;
    /// GUTI type of identity
    pub const TYPE_GUTI: u8 = 0x06;

    const GUTI_FIRST_OCTET: u8 = 0xF0 | Self::TYPE_GUTI;
    const GUTI_CONTENT_LEN: usize = 11;

    fn content_len(&self) -> usize {
        match self {
            EpsMobileIdentity::Imsi(d) | EpsMobileIdentity::Imei(d) => d.len() / 2 + 1,
            EpsMobileIdentity::Guti(_) => Self::GUTI_CONTENT_LEN,
        }
    }
}

impl NasDecode for EpsMobileIdentity {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("EPS mobile identity", content.len(), 1, 11)?;
        let first = content.get_u8();
        match first & TYPE_MASK {
            Self::TYPE_IMSI => {
                let digits = decode_digits(first, &content)?;
                DigitBounds::IMSI.check(digits.len())?;
                Ok(EpsMobileIdentity::Imsi(digits))
            }
            Self::TYPE_IMEI => {
                let digits = decode_digits(first, &content)?;
                DigitBounds::IMEI.check(digits.len())?;
                Ok(EpsMobileIdentity::Imei(digits))
            }
            Self::TYPE_GUTI => {
                if first & 0xF0 != 0xF0 || first & ODD_EVEN_FLAG != 0 {
                    return Err(NasError::value(format!("GUTI identity octet 0x{first:02X}")));
                }
                let len = Self::GUTI_CONTENT_LEN;
                check_content_len("GUTI", content.len() + 1, len, len)?;
                let plmn = decode_plmn(&mut content)?;
                Ok(EpsMobileIdentity::Guti(Guti {
                    plmn,
                    mme_group_id: content.get_u16(),
                    mme_code: content.get_u8(),
                    m_tmsi: content.get_u32(),
                }))
            }
            t => Err(NasError::value(format!("EPS type of identity {t}"))),
        }
    }
}

impl NasEncode for EpsMobileIdentity {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| match self {
            EpsMobileIdentity::Imsi(d) => encode_digits(c, Self::TYPE_IMSI, DigitBounds::IMSI, d),
            EpsMobileIdentity::Imei(d) => encode_digits(c, Self::TYPE_IMEI, DigitBounds::IMEI, d),
            EpsMobileIdentity::Guti(guti) => {
                c.put_u8(Self::GUTI_FIRST_OCTET);
                c.put_slice(&guti.plmn.encode());
                c.put_u16(guti.mme_group_id);
                c.put_u8(guti.mme_code);
                c.put_u32(guti.m_tmsi);
                Ok(())
            }
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imsi_from_attach_request() {
        let data = hex::decode("080910100000000010").unwrap();
        let id = EpsMobileIdentity::nas_decode(&mut data.as_slice()).unwrap();
        assert_eq!(id, EpsMobileIdentity::Imsi("001010000000001".to_string()));

        let mut out = Vec::new();
        id.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(id.encoded_len(), data.len());
    }

    #[test]
    fn test_guti() {
        let data = [
            0x0B, 0xF6, 0x00, 0xF1, 0x10, 0x80, 0x01, 0x02, 0xC0, 0x00, 0x0A, 0x5E,
        ];
        let id = EpsMobileIdentity::nas_decode(&mut &data[..]).unwrap();
        let EpsMobileIdentity::Guti(guti) = &id else {
            panic!("expected GUTI, got {id:?}");
        };
        assert_eq!(guti.plmn, Plmn::new(1, 1, false));
        assert_eq!(guti.mme_group_id, 0x8001);
        assert_eq!(guti.mme_code, 0x02);
        assert_eq!(guti.m_tmsi, 0xC000_0A5E);

        let mut out = Vec::new();
        id.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_guti_wrong_length() {
        let data = [0x05, 0xF6, 0x00, 0xF1, 0x10, 0x80];
        assert!(EpsMobileIdentity::nas_decode(&mut &data[..]).is_err());
    }

    #[test]
    fn test_unknown_type() {
        let data = [0x02, 0x02, 0x00];
        assert!(matches!(
            EpsMobileIdentity::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_imei() {
        let id = EpsMobileIdentity::Imei("356938035643809".to_string());
        let mut out = Vec::new();
        id.nas_encode(&mut out).unwrap();
        assert_eq!(out[0], 8);
        assert_eq!(out[1], 0x3B);
        assert_eq!(EpsMobileIdentity::nas_decode(&mut out.as_slice()).unwrap(), id);
    }
}
