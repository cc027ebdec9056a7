//! Core LTE identifiers: PLMN and packed BCD digit strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// BCD filler nibble used to pad an odd number of digits.
pub const BCD_FILLER: u8 = 0x0F;

/// Public Land Mobile Network identifier.
///
/// A PLMN consists of:
/// - MCC (Mobile Country Code): 3 decimal digits
/// - MNC (Mobile Network Code): 2 or 3 decimal digits
///
/// The `long_mnc` field indicates whether the MNC uses 3 digits (true) or 2 digits (false).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Plmn {
    /// Mobile Country Code (3 digits, range 0-999)
    pub mcc: u16,
    /// Mobile Network Code (2-3 digits, range 0-999)
    pub mnc: u16,
    /// True if MNC is 3 digits, false if 2 digits
    pub long_mnc: bool,
}

impl Plmn {
    /// Creates a new PLMN with the given MCC and MNC.
    pub const fn new(mcc: u16, mnc: u16, long_mnc: bool) -> Self {
        Self { mcc, mnc, long_mnc }
    }

    /// Parses MCC and MNC digit strings, e.g. `("001", "01")`.
    ///
    /// Returns `None` unless the MCC has 3 digits and the MNC has 2 or 3.
    pub fn parse(mcc: &str, mnc: &str) -> Option<Self> {
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if mcc.len() != 3 || !(2..=3).contains(&mnc.len()) || !all_digits(mcc) || !all_digits(mnc)
        {
            return None;
        }
        Some(Self {
            mcc: mcc.parse().ok()?,
            mnc: mnc.parse().ok()?,
            long_mnc: mnc.len() == 3,
        })
    }

    /// Encodes the PLMN into the 3-octet TS 24.008 layout.
    ///
    /// - Octet 1: MCC digit 2 (high nibble) | MCC digit 1 (low nibble)
    /// - Octet 2: MNC digit 3 or 0xF (high nibble) | MCC digit 3 (low nibble)
    /// - Octet 3: MNC digit 2 (high nibble) | MNC digit 1 (low nibble)
    pub fn encode(&self) -> [u8; 3] {
        let mcc1 = ((self.mcc / 100) % 10) as u8;
        let mcc2 = ((self.mcc / 10) % 10) as u8;
        let mcc3 = (self.mcc % 10) as u8;

        let (mnc1, mnc2, mnc3) = if self.long_mnc {
            (
                ((self.mnc / 100) % 10) as u8,
                ((self.mnc / 10) % 10) as u8,
                (self.mnc % 10) as u8,
            )
        } else {
            (((self.mnc / 10) % 10) as u8, (self.mnc % 10) as u8, BCD_FILLER)
        };

        [(mcc2 << 4) | mcc1, (mnc3 << 4) | mcc3, (mnc2 << 4) | mnc1]
    }

    /// Decodes a PLMN from the 3-octet layout.
    ///
    /// Returns `None` if any digit nibble is not decimal. The MNC digit 3
    /// nibble may be the 0xF filler, which selects a 2-digit MNC.
    pub fn decode(bytes: [u8; 3]) -> Option<Self> {
        let mcc1 = bytes[0] & 0x0F;
        let mcc2 = bytes[0] >> 4;
        let mcc3 = bytes[1] & 0x0F;
        let mnc3 = bytes[1] >> 4;
        let mnc1 = bytes[2] & 0x0F;
        let mnc2 = bytes[2] >> 4;

        if [mcc1, mcc2, mcc3, mnc1, mnc2].iter().any(|&d| d > 9) {
            return None;
        }

        let mcc = 100 * mcc1 as u16 + 10 * mcc2 as u16 + mcc3 as u16;
        let short_mnc = 10 * mnc1 as u16 + mnc2 as u16;
        match mnc3 {
            BCD_FILLER => Some(Self::new(mcc, short_mnc, false)),
            d if d <= 9 => Some(Self::new(mcc, 10 * short_mnc + d as u16, true)),
            _ => None,
        }
    }
}

impl fmt::Debug for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.long_mnc {
            write!(f, "Plmn({:03}-{:03})", self.mcc, self.mnc)
        } else {
            write!(f, "Plmn({:03}-{:02})", self.mcc, self.mnc)
        }
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.long_mnc {
            write!(f, "{:03}{:03}", self.mcc, self.mnc)
        } else {
            write!(f, "{:03}{:02}", self.mcc, self.mnc)
        }
    }
}

/// Packs a decimal digit string as BCD, two digits per octet, low nibble first.
///
/// An odd digit count is padded with the 0xF filler in the final high nibble.
/// Returns `None` if `digits` contains anything other than `0-9`.
pub fn bcd_encode(digits: &str) -> Option<Vec<u8>> {
    let nibbles: Vec<u8> = digits
        .bytes()
        .map(|b| b.is_ascii_digit().then(|| b - b'0'))
        .collect::<Option<_>>()?;

    Some(
        nibbles
            .chunks(2)
            .map(|pair| match pair {
                [lo, hi] => (hi << 4) | lo,
                _ => (BCD_FILLER << 4) | pair[0],
            })
            .collect(),
    )
}

/// Unpacks a BCD digit string, stopping at the first filler nibble.
///
/// Returns `None` if a nibble other than the filler lies outside `0-9`.
pub fn bcd_decode(bytes: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        for nibble in [b & 0x0F, b >> 4] {
            match nibble {
                BCD_FILLER => return Some(out),
                d if d <= 9 => out.push((b'0' + d) as char),
                _ => return None,
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plmn_encode_two_digit_mnc() {
        let plmn = Plmn::new(1, 1, false);
        assert_eq!(plmn.encode(), [0x00, 0xF1, 0x10]);
    }

    #[test]
    fn test_plmn_encode_three_digit_mnc() {
        let plmn = Plmn::new(310, 410, true);
        assert_eq!(plmn.encode(), [0x13, 0x00, 0x14]);
    }

    #[test]
    fn test_plmn_decode() {
        assert_eq!(Plmn::decode([0x00, 0xF1, 0x10]), Some(Plmn::new(1, 1, false)));
        assert_eq!(Plmn::decode([0x13, 0x00, 0x14]), Some(Plmn::new(310, 410, true)));
        assert_eq!(Plmn::decode([0x09, 0xF1, 0x07]), Some(Plmn::new(901, 70, false)));
    }

    #[test]
    fn test_plmn_decode_rejects_non_decimal_digits() {
        assert_eq!(Plmn::decode([0xFF, 0xFF, 0xFF]), None);
        assert_eq!(Plmn::decode([0x0A, 0xF1, 0x10]), None);
        assert_eq!(Plmn::decode([0x00, 0xE1, 0x10]), None);
    }

    #[test]
    fn test_plmn_parse_and_display() {
        let plmn = Plmn::parse("208", "93").unwrap();
        assert_eq!(plmn, Plmn::new(208, 93, false));
        assert_eq!(plmn.to_string(), "20893");
        assert_eq!(format!("{plmn:?}"), "Plmn(208-93)");
        assert!(Plmn::parse("20", "93").is_none());
        assert!(Plmn::parse("208", "9a").is_none());
        assert_eq!(Plmn::parse("310", "014").unwrap().to_string(), "310014");
    }

    #[test]
    fn test_bcd_encode_odd_and_even() {
        assert_eq!(bcd_encode("112").unwrap(), vec![0x11, 0xF2]);
        assert_eq!(bcd_encode("1234").unwrap(), vec![0x21, 0x43]);
        assert_eq!(bcd_encode("").unwrap(), Vec::<u8>::new());
        assert!(bcd_encode("12#").is_none());
    }

    #[test]
    fn test_bcd_decode_stops_at_filler() {
        assert_eq!(bcd_decode(&[0x11, 0xF2]).unwrap(), "112");
        assert_eq!(bcd_decode(&[0x21, 0x43]).unwrap(), "1234");
        assert!(bcd_decode(&[0xA1]).is_none());
    }
}
