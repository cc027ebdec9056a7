//! Mobility management information elements (3GPP TS 24.008 Section 10.5.3)

use bytes::{Buf, BufMut};
use lte_common::{bcd_decode, bcd_encode, OctetString};

use crate::codec::{
    check_content_len, check_length, check_list_len, encode_lv_with, read_lv, read_u8,
    write_lv, NasDecode, NasEncode, NasError, NasResult,
};

// ============================================================================
// Authentication parameter RAND (10.5.3.1)
// ============================================================================

/// Authentication parameter RAND (Type 3, 16 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthenticationParameterRand(pub [u8; 16]);

impl NasDecode for AuthenticationParameterRand {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, 16)?;
        let mut rand = [0u8; 16];
        buf.copy_to_slice(&mut rand);
        Ok(Self(rand))
    }
}

impl NasEncode for AuthenticationParameterRand {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_slice(&self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        16
    }
}

// ============================================================================
// Authentication parameter AUTN (10.5.3.1.1)
// ============================================================================

/// Authentication parameter AUTN (Type 4, 16 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationParameterAutn {
    /// SQN xor AK, AMF and MAC
    pub value: OctetString,
}

impl AuthenticationParameterAutn {
    /// AUTN length
    pub const LEN: usize = 16;
}

impl NasDecode for AuthenticationParameterAutn {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let content = read_lv(buf)?;
        check_content_len("AUTN", content.len(), Self::LEN, Self::LEN)?;
        Ok(Self {
            value: OctetString::from_slice(&content),
        })
    }
}

impl NasEncode for AuthenticationParameterAutn {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, self.value.data())
    }

    fn encoded_len(&self) -> usize {
        1 + self.value.len()
    }
}

// ============================================================================
// Authentication failure parameter (10.5.3.2.2)
// ============================================================================

/// Authentication failure parameter (Type 4, AUTS of 14 octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationFailureParameter {
    /// Re-synchronisation token
    pub auts: OctetString,
}

impl AuthenticationFailureParameter {
    /// AUTS length
    pub const LEN: usize = 14;
}

impl NasDecode for AuthenticationFailureParameter {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let content = read_lv(buf)?;
        check_content_len("AUTS", content.len(), Self::LEN, Self::LEN)?;
        Ok(Self {
            auts: OctetString::from_slice(&content),
        })
    }
}

impl NasEncode for AuthenticationFailureParameter {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, self.auts.data())
    }

    fn encoded_len(&self) -> usize {
        1 + self.auts.len()
    }
}

// ============================================================================
// Network name (10.5.3.5a)
// ============================================================================

/// Network name (Type 4)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkName {
    /// Coding scheme (0 = GSM 7-bit default alphabet, 1 = UCS2)
    pub coding_scheme: u8,
    /// Add country initials
    pub add_ci: bool,
    /// Number of spare bits in the last text octet
    pub spare_bits_in_last_octet: u8,
    /// Encoded text string
    pub text: OctetString,
}

impl NetworkName {
    const EXT: u8 = 0x80;
}

impl NasDecode for NetworkName {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("network name", content.len(), 1, usize::MAX)?;
        let octet = content.get_u8();
        if octet & Self::EXT == 0 {
            return Err(NasError::value("network name without extension bit"));
        }
        Ok(Self {
            coding_scheme: (octet >> 4) & 0x07,
            add_ci: octet & 0x08 != 0,
            spare_bits_in_last_octet: octet & 0x07,
            text: OctetString::from_slice(&content),
        })
    }
}

impl NasEncode for NetworkName {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            c.put_u8(
                Self::EXT
                    | ((self.coding_scheme & 0x07) << 4)
                    | (u8::from(self.add_ci) << 3)
                    | (self.spare_bits_in_last_octet & 0x07),
            );
            c.put_slice(self.text.data());
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        2 + self.text.len()
    }
}

// ============================================================================
// Time zone (10.5.3.8)
// ============================================================================

/// Time zone (Type 3, 1 octet, quarter hours in swapped BCD with sign bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeZone(pub u8);

impl NasDecode for TimeZone {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(Self(read_u8(buf)?))
    }
}

impl NasEncode for TimeZone {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

// ============================================================================
// Time zone and time (10.5.3.9)
// ============================================================================

/// Time zone and time (Type 3, 7 octets)
///
/// Date and time fields are semi-octets with the units digit in the high
/// nibble; the decoded values are plain decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeZoneAndTime {
    /// Year within the century (0-99)
    pub year: u8,
    /// Month
    pub month: u8,
    /// Day
    pub day: u8,
    /// Hour
    pub hour: u8,
    /// Minute
    pub minute: u8,
    /// Second
    pub second: u8,
    /// Time zone octet as carried
    pub time_zone: TimeZone,
}

fn swapped_bcd_decode(octet: u8) -> NasResult<u8> {
    let (tens, units) = (octet & 0x0F, octet >> 4);
    if tens > 9 || units > 9 {
        return Err(NasError::value(format!("semi-octet value 0x{octet:02X}")));
    }
    Ok(tens * 10 + units)
}

fn swapped_bcd_encode(value: u8) -> u8 {
    ((value % 10) << 4) | ((value / 10) % 10)
}

impl NasDecode for TimeZoneAndTime {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, 7)?;
        Ok(Self {
            year: swapped_bcd_decode(buf.get_u8())?,
            month: swapped_bcd_decode(buf.get_u8())?,
            day: swapped_bcd_decode(buf.get_u8())?,
            hour: swapped_bcd_decode(buf.get_u8())?,
            minute: swapped_bcd_decode(buf.get_u8())?,
            second: swapped_bcd_decode(buf.get_u8())?,
            time_zone: TimeZone(buf.get_u8()),
        })
    }
}

impl NasEncode for TimeZoneAndTime {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        for v in [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ] {
            buf.put_u8(swapped_bcd_encode(v));
        }
        buf.put_u8(self.time_zone.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        7
    }
}

// ============================================================================
// Daylight saving time (10.5.3.12)
// ============================================================================

/// Daylight saving time (Type 4, 1 content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaylightSavingTime {
    /// Adjustment: 0 none, 1 +1 hour, 2 +2 hours
    pub value: u8,
}

impl NasDecode for DaylightSavingTime {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("daylight saving time", content.len(), 1, 1)?;
        Ok(Self {
            value: content.get_u8() & 0x03,
        })
    }
}

impl NasEncode for DaylightSavingTime {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &[self.value & 0x03])
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// Emergency number list (10.5.3.13)
// ============================================================================

/// One emergency number
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmergencyNumber {
    /// Emergency service category bits (police, ambulance, fire, ...)
    pub service_category: u8,
    /// Number digits
    pub digits: String,
}

/// Emergency number list (Type 4, 3-48 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmergencyNumberList {
    /// Entries in wire order
    pub numbers: Vec<EmergencyNumber>,
}

impl EmergencyNumberList {
    /// Maximum number of entries accepted
    pub const MAX_NUMBERS: usize = 16;
}

impl NasDecode for EmergencyNumberList {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("emergency number list", content.len(), 3, 48)?;

        let mut numbers = Vec::new();
        while content.has_remaining() {
            let mut entry = read_lv(&mut content)?;
            check_content_len("emergency number", entry.len(), 1, usize::MAX)?;
            let service_category = entry.get_u8() & 0x1F;
            let digits = bcd_decode(&entry)
                .ok_or_else(|| NasError::value("emergency number digits"))?;
            numbers.push(EmergencyNumber {
                service_category,
                digits,
            });
            check_list_len("emergency number list", numbers.len(), Self::MAX_NUMBERS)?;
        }
        Ok(Self { numbers })
    }
}

impl NasEncode for EmergencyNumberList {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        check_list_len(
            "emergency number list",
            self.numbers.len(),
            Self::MAX_NUMBERS,
        )?;
        encode_lv_with(buf, |c| {
            for number in &self.numbers {
                let digits = bcd_encode(&number.digits)
                    .ok_or_else(|| NasError::value("emergency number digits"))?;
                encode_lv_with(c, |e| {
                    e.put_u8(number.service_category & 0x1F);
                    e.put_slice(&digits);
                    Ok(())
                })?;
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self
            .numbers
            .iter()
            .map(|n| 2 + (n.digits.len() + 1) / 2)
            .sum::<usize>()
    }
}
