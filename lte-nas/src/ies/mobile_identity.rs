//! Mobile Identity (3GPP TS 24.008 Section 10.5.1.4)
//!
//! ```text
//!   8     7     6     5     4       3     2     1
//! +-----------------------+-------+-----------------+
//! | Identity digit 1      | odd/  | Type of identity|  octet 3
//! |                       | even  |                 |
//! +-----------------------+-------+-----------------+
//! | Identity digit p+1    | Identity digit p        |  octet 4..
//! +-----------------------+-------------------------+
//! ```
//!
//! Digit identities (IMSI, IMEI, IMEISV) are BCD packed after the first
//! digit; an even digit count ends in a 0xF filler nibble.

use bytes::{Buf, BufMut, Bytes};
use lte_common::{OctetString, Plmn};

use crate::codec::{
    check_content_len, encode_lv_with, expect_consumed, put_u24, read_lv, read_u24, read_u8,
    NasDecode, NasEncode, NasError, NasResult,
};
use crate::ies::common::decode_plmn;

/// Type of identity (octet 3, bits 1-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MobileIdentityType {
    /// No identity
    NoIdentity = 0,
    /// IMSI
    Imsi = 1,
    /// IMEI
    Imei = 2,
    /// IMEISV
    Imeisv = 3,
    /// TMSI / P-TMSI / M-TMSI
    Tmsi = 4,
    /// TMGI and optional MBMS session identity
    Tmgi = 5,
}

pub(crate) const ODD_EVEN_FLAG: u8 = 0x08;
pub(crate) const TYPE_MASK: u8 = 0x07;
const FILLER: u8 = 0x0F;

/// Allowed digit count of a BCD identity
#[derive(Debug, Clone, Copy)]
pub(crate) struct DigitBounds {
    name: &'static str,
    min: usize,
    max: usize,
}

impl DigitBounds {
    pub(crate) const IMSI: Self = Self {
        name: "IMSI digits",
        min: 6,
        max: 15,
    };
    pub(crate) const IMEI: Self = Self {
        name: "IMEI digits",
        min: 15,
        max: 15,
    };
    pub(crate) const IMEISV: Self = Self {
        name: "IMEISV digits",
        min: 16,
        max: 16,
    };

    pub(crate) fn check(self, len: usize) -> NasResult<()> {
        check_content_len(self.name, len, self.min, self.max)
    }
}

/// Temporary mobile group identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tmgi {
    /// MBMS service ID (24 bits)
    pub mbms_service_id: u32,
    /// PLMN of the MBMS service, when indicated
    pub plmn: Option<Plmn>,
    /// MBMS session identity, when indicated
    pub mbms_session_id: Option<u8>,
}

impl Tmgi {
    const SESSION_FLAG: u8 = 0x20;
    const PLMN_FLAG: u8 = 0x10;
}

/// Mobile identity value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MobileIdentity {
    /// No identity; the content octets are kept as received
    NoIdentity(OctetString),
    /// IMSI digits (6 to 15)
    Imsi(String),
    /// IMEI digits (15)
    Imei(String),
    /// IMEISV digits (16)
    Imeisv(String),
    /// Temporary identity
    Tmsi(u32),
    /// Temporary mobile group identity
    Tmgi(Tmgi),
}

impl Default for MobileIdentity {
    fn default() -> Self {
        MobileIdentity::NoIdentity(OctetString::from_slice(&[0x00]))
    }
}

impl MobileIdentity {
    /// Type of identity carried
    pub fn identity_type(&self) -> MobileIdentityType {
        match self {
            MobileIdentity::NoIdentity(_) => MobileIdentityType::NoIdentity,
            MobileIdentity::Imsi(_) => MobileIdentityType::Imsi,
            MobileIdentity::Imei(_) => MobileIdentityType::Imei,
            MobileIdentity::Imeisv(_) => MobileIdentityType::Imeisv,
            MobileIdentity::Tmsi(_) => MobileIdentityType::Tmsi,
            MobileIdentity::Tmgi(_) => MobileIdentityType::Tmgi,
        }
    }

    /// Decode the identity from its content octets (length already removed)
    pub fn decode_content(mut content: Bytes) -> NasResult<Self> {
        let first = read_u8(&mut content)?;
        match first & TYPE_MASK {
            0 => {
                check_content_len("no identity", content.len() + 1, 1, 3)?;
                let mut raw = vec![first];
                raw.extend_from_slice(&content);
                Ok(MobileIdentity::NoIdentity(OctetString::from_vec(raw)))
            }
            1 => {
                let digits = decode_digits(first, &content)?;
                DigitBounds::IMSI.check(digits.len())?;
                Ok(MobileIdentity::Imsi(digits))
            }
            2 => {
                let digits = decode_digits(first, &content)?;
                DigitBounds::IMEI.check(digits.len())?;
                Ok(MobileIdentity::Imei(digits))
            }
            3 => {
                let digits = decode_digits(first, &content)?;
                DigitBounds::IMEISV.check(digits.len())?;
                Ok(MobileIdentity::Imeisv(digits))
            }
            4 => {
                if first & 0xF0 != 0xF0 {
                    return Err(NasError::value(format!(
                        "TMSI identity octet 0x{first:02X} lacks the 0xF filler"
                    )));
                }
                if first & ODD_EVEN_FLAG != 0 {
                    return Err(NasError::value("TMSI identity flagged odd"));
                }
                check_content_len("TMSI", content.len(), 4, 4)?;
                Ok(MobileIdentity::Tmsi(content.get_u32()))
            }
            5 => {
                if first & 0xC8 != 0 {
                    return Err(NasError::value(format!(
                        "TMGI identity octet 0x{first:02X} has spare bits set"
                    )));
                }
                let mbms_service_id = read_u24(&mut content)?;
                let plmn = if first & Tmgi::PLMN_FLAG != 0 {
                    Some(decode_plmn(&mut content)?)
                } else {
                    None
                };
                let mbms_session_id = if first & Tmgi::SESSION_FLAG != 0 {
                    Some(read_u8(&mut content)?)
                } else {
                    None
                };
                expect_consumed("TMGI", &content)?;
                Ok(MobileIdentity::Tmgi(Tmgi {
                    mbms_service_id,
                    plmn,
                    mbms_session_id,
                }))
            }
            t => Err(NasError::value(format!("type of identity {t}"))),
        }
    }

    /// Encode the identity content octets (without length)
    pub fn encode_content<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        match self {
            MobileIdentity::NoIdentity(raw) => {
                if raw.is_empty() {
                    buf.put_u8(MobileIdentityType::NoIdentity as u8);
                } else {
                    buf.put_slice(raw.data());
                }
            }
            MobileIdentity::Imsi(d) => {
                encode_digits(buf, MobileIdentityType::Imsi as u8, DigitBounds::IMSI, d)?
            }
            MobileIdentity::Imei(d) => {
                encode_digits(buf, MobileIdentityType::Imei as u8, DigitBounds::IMEI, d)?
            }
            MobileIdentity::Imeisv(d) => {
                encode_digits(buf, MobileIdentityType::Imeisv as u8, DigitBounds::IMEISV, d)?
            }
            MobileIdentity::Tmsi(tmsi) => {
                buf.put_u8(0xF0 | MobileIdentityType::Tmsi as u8);
                buf.put_u32(*tmsi);
            }
            MobileIdentity::Tmgi(tmgi) => {
                let mut first = MobileIdentityType::Tmgi as u8;
                if tmgi.plmn.is_some() {
                    first |= Tmgi::PLMN_FLAG;
                }
                if tmgi.mbms_session_id.is_some() {
                    first |= Tmgi::SESSION_FLAG;
                }
                buf.put_u8(first);
                put_u24(buf, tmgi.mbms_service_id);
                if let Some(plmn) = &tmgi.plmn {
                    buf.put_slice(&plmn.encode());
                }
                if let Some(id) = tmgi.mbms_session_id {
                    buf.put_u8(id);
                }
            }
        }
        Ok(())
    }

    /// Length of the content octets
    pub fn content_len(&self) -> usize {
        match self {
            MobileIdentity::NoIdentity(raw) => raw.len().max(1),
            MobileIdentity::Imsi(d) | MobileIdentity::Imei(d) | MobileIdentity::Imeisv(d) => {
                d.len() / 2 + 1
            }
            MobileIdentity::Tmsi(_) => 5,
            MobileIdentity::Tmgi(t) => {
                let plmn_len = if t.plmn.is_some() { 3 } else { 0 };
                4 + plmn_len + usize::from(t.mbms_session_id.is_some())
            }
        }
    }
}

fn digit(n: u8) -> NasResult<char> {
    if n > 9 {
        return Err(NasError::value(format!("identity digit 0x{n:X}")));
    }
    Ok(char::from(b'0' + n))
}

pub(crate) fn decode_digits(first: u8, rest: &[u8]) -> NasResult<String> {
    let odd = first & ODD_EVEN_FLAG != 0;
    let mut digits = String::with_capacity(1 + rest.len() * 2);
    digits.push(digit(first >> 4)?);

    for (i, octet) in rest.iter().enumerate() {
        digits.push(digit(octet & 0x0F)?);
        let hi = octet >> 4;
        if i + 1 == rest.len() && !odd {
            if hi != FILLER {
                return Err(NasError::value(format!(
                    "even identity ends in 0x{hi:X}, expected filler"
                )));
            }
        } else {
            digits.push(digit(hi)?);
        }
    }

    if !odd && rest.is_empty() {
        return Err(NasError::value("even identity without digits"));
    }
    Ok(digits)
}

pub(crate) fn encode_digits<B: BufMut>(
    buf: &mut B,
    type_bits: u8,
    bounds: DigitBounds,
    digits: &str,
) -> NasResult<()> {
    bounds.check(digits.len())?;
    let nibbles = digits
        .bytes()
        .map(|b| {
            if b.is_ascii_digit() {
                Ok(b - b'0')
            } else {
                Err(NasError::value(format!("identity digit {:?}", char::from(b))))
            }
        })
        .collect::<NasResult<Vec<u8>>>()?;
    let (first, rest) = nibbles
        .split_first()
        .ok_or_else(|| NasError::value("identity without digits"))?;

    let odd_even = if nibbles.len() % 2 == 1 { ODD_EVEN_FLAG } else { 0 };
    buf.put_u8((first << 4) | odd_even | (type_bits & TYPE_MASK));
    for pair in rest.chunks(2) {
        let hi = pair.get(1).copied().unwrap_or(FILLER);
        buf.put_u8((hi << 4) | pair[0]);
    }
    Ok(())
}

impl NasDecode for MobileIdentity {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let content = read_lv(buf)?;
        check_content_len("mobile identity", content.len(), 1, 9)?;
        Self::decode_content(content)
    }
}

impl NasEncode for MobileIdentity {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| self.encode_content(c))
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(id: &MobileIdentity) -> Vec<u8> {
        let mut out = Vec::new();
        id.nas_encode(&mut out).unwrap();
        assert_eq!(out.len(), id.encoded_len());
        out
    }

    #[test]
    fn test_imsi_odd_digits() {
        let data = [0x08, 0x09, 0x10, 0x10, 0x00, 0x00, 0x00, 0x00, 0x10];
        let id = MobileIdentity::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(id, MobileIdentity::Imsi("001010000000001".into()));
        assert_eq!(encode(&id), data);
    }

    #[test]
    fn test_digit_count_is_checked_on_encode() {
        let mut out = Vec::new();
        assert!(matches!(
            MobileIdentity::Imsi(String::new()).nas_encode(&mut out),
            Err(NasError::BufferTooShort { .. })
        ));
        assert!(matches!(
            MobileIdentity::Imsi("0010100000000012".into()).nas_encode(&mut out),
            Err(NasError::ValueDoesntMatch(_))
        ));
        assert!(MobileIdentity::Imei("35349006987331".into())
            .nas_encode(&mut out)
            .is_err());
    }

    #[test]
    fn test_imeisv_even_digits() {
        let id = MobileIdentity::Imeisv("3534900698733104".into());
        let out = encode(&id);
        assert_eq!(out[0], 9);
        assert_eq!(out[1], 0x33);
        assert_eq!(out[9] >> 4, 0x0F);
        assert_eq!(MobileIdentity::nas_decode(&mut out.as_slice()).unwrap(), id);
    }

    #[test]
    fn test_even_identity_requires_filler() {
        // IMEISV flagged even whose last high nibble is a digit.
        let data = [0x02, 0x33, 0x55];
        assert!(matches!(
            MobileIdentity::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_imsi_digit_count_bounds() {
        // Five digit IMSI, odd
        let data = [0x03, 0x19, 0x32, 0x54];
        assert!(matches!(
            MobileIdentity::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_tmsi() {
        let data = [0x05, 0xF4, 0xC0, 0x01, 0x02, 0x03];
        let id = MobileIdentity::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(id, MobileIdentity::Tmsi(0xC0010203));
        assert_eq!(encode(&id), data);
    }

    #[test]
    fn test_tmsi_requires_filler_nibble() {
        let data = [0x05, 0x04, 0xC0, 0x01, 0x02, 0x03];
        assert!(matches!(
            MobileIdentity::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_tmgi_with_plmn_and_session() {
        let id = MobileIdentity::Tmgi(Tmgi {
            mbms_service_id: 0x123456,
            plmn: Some(Plmn::new(1, 1, false)),
            mbms_session_id: Some(7),
        });
        let out = encode(&id);
        assert_eq!(out, vec![0x08, 0x35, 0x12, 0x34, 0x56, 0x00, 0xF1, 0x10, 0x07]);
        assert_eq!(MobileIdentity::nas_decode(&mut out.as_slice()).unwrap(), id);
    }

    #[test]
    fn test_tmgi_rejects_spare_bits() {
        let data = [0x04, 0x85, 0x12, 0x34, 0x56];
        assert!(MobileIdentity::nas_decode(&mut &data[..]).is_err());
    }

    #[test]
    fn test_no_identity_kept_verbatim() {
        let data = [0x03, 0xF0, 0xFF, 0xFF];
        let id = MobileIdentity::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(id.identity_type(), MobileIdentityType::NoIdentity);
        assert_eq!(encode(&id), data);
    }

    #[test]
    fn test_unknown_identity_type() {
        let data = [0x01, 0x07];
        assert!(matches!(
            MobileIdentity::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }
}
