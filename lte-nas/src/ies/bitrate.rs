//! Bit rate ladder shared by QoS (3GPP TS 24.008 Section 10.5.6.5),
//! EPS QoS (TS 24.301 Section 9.9.4.3) and APN-AMBR (TS 24.301
//! Section 9.9.4.2).
//!
//! A rate is one base octet, optionally refined by an extension octet when the
//! base is [`BASE_ESCAPE`], which in turn is refined by an extension-2 octet
//! when the extension is [`EXTENSION_ESCAPE`].
//!
//! ```text
//! base        0x01-0x3F   1 kbps steps          1 ..    63 kbps
//!             0x40-0x7F   8 kbps steps         64 ..   568 kbps
//!             0x80-0xFE  64 kbps steps        576 ..  8640 kbps
//!             0xFF        0 kbps
//! extension   0x01-0x4A 100 kbps steps       8700 .. 16000 kbps
//!             0x4B-0xBA   1 Mbps steps         17 ..   128 Mbps
//!             0xBB-0xFA   2 Mbps steps        130 ..   256 Mbps
//! extension-2 0x01-0x3D   4 Mbps steps        260 ..   500 Mbps
//!             0x3E-0xA1  10 Mbps steps        510 ..  1500 Mbps
//!             0xA2-0xF6 100 Mbps steps       1600 .. 10000 Mbps
//! ```
//!
//! Encoding rounds down to the nearest representable rate.

/// Base code for 0 kbps
pub const ZERO_KBPS: u8 = 0xFF;
/// Highest base code; an extension octet may refine it
pub const BASE_ESCAPE: u8 = 0xFE;
/// Highest extension code; an extension-2 octet may refine it
pub const EXTENSION_ESCAPE: u8 = 0xFA;
/// Highest meaningful extension-2 code
pub const EXTENSION2_MAX: u8 = 0xF6;

/// Highest rate the base octet alone can carry
pub const BASE_MAX_KBPS: u64 = 8_640;
/// Highest rate reachable through the extension octet
pub const EXTENSION_MAX_KBPS: u64 = 256_000;
/// Highest rate reachable through the extension-2 octet
pub const EXTENSION2_MAX_KBPS: u64 = 10_000_000;

/// The three octets that together code one bit rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BitrateCode {
    /// Base octet
    pub base: u8,
    /// Extension octet, 0 when unused
    pub extension: u8,
    /// Extension-2 octet, 0 when unused
    pub extension2: u8,
}

impl BitrateCode {
    /// Code for a base-only rate
    pub const fn base(base: u8) -> Self {
        Self {
            base,
            extension: 0,
            extension2: 0,
        }
    }
}

/// Rate coded by a base octet
pub fn base_code_to_kbps(code: u8) -> u64 {
    let code = u64::from(code);
    match code {
        // 0 is "subscribed" uplink / reserved downlink and carries no rate.
        0 | 0xFF => 0,
        0x01..=0x3F => code,
        0x40..=0x7F => 64 + (code - 0x40) * 8,
        _ => 576 + (code - 0x80) * 64,
    }
}

/// Rate coded by an extension octet, `None` for 0 (use the base octet)
pub fn extension_code_to_kbps(code: u8) -> Option<u64> {
    let code = u64::from(code);
    match code {
        0 => None,
        0x01..=0x4A => Some(8_600 + code * 100),
        0x4B..=0xBA => Some(16_000 + (code - 0x4A) * 1_000),
        0xBB..=0xFA => Some(128_000 + (code - 0xBA) * 2_000),
        _ => Some(EXTENSION_MAX_KBPS),
    }
}

/// Rate coded by an extension-2 octet, `None` for 0 (use the extension octet)
pub fn extension2_code_to_kbps(code: u8) -> Option<u64> {
    let code = u64::from(code);
    match code {
        0 => None,
        0x01..=0x3D => Some(256_000 + code * 4_000),
        0x3E..=0xA1 => Some(500_000 + (code - 0x3D) * 10_000),
        0xA2..=0xF6 => Some(1_500_000 + (code - 0xA1) * 100_000),
        _ => Some(EXTENSION2_MAX_KBPS),
    }
}

/// Largest base code whose rate does not exceed `kbps`
pub fn kbps_to_base_code(kbps: u64) -> u8 {
    match kbps {
        0 => ZERO_KBPS,
        1..=63 => kbps as u8,
        64..=575 => (0x40 + (kbps - 64) / 8) as u8,
        576..=BASE_MAX_KBPS => (0x80 + (kbps - 576) / 64) as u8,
        _ => BASE_ESCAPE,
    }
}

/// Decode the full ladder.
pub fn code_to_kbps(code: BitrateCode) -> u64 {
    let base = base_code_to_kbps(code.base);
    if code.base != BASE_ESCAPE {
        return base;
    }
    let Some(extended) = extension_code_to_kbps(code.extension) else {
        return base;
    };
    if code.extension != EXTENSION_ESCAPE {
        return extended;
    }
    extension2_code_to_kbps(code.extension2).unwrap_or(extended)
}

/// Encode a rate on the full ladder, saturating at 10 Gbps.
pub fn kbps_to_code(kbps: u64) -> BitrateCode {
    if kbps <= BASE_MAX_KBPS {
        return BitrateCode::base(kbps_to_base_code(kbps));
    }

    let extension = if kbps <= 16_000 {
        (kbps - 8_600) / 100
    } else if kbps <= 128_000 {
        0x4A + (kbps - 16_000) / 1_000
    } else if kbps <= EXTENSION_MAX_KBPS {
        0xBA + (kbps - 128_000) / 2_000
    } else {
        u64::from(EXTENSION_ESCAPE)
    } as u8;
    if kbps <= EXTENSION_MAX_KBPS {
        return BitrateCode {
            base: BASE_ESCAPE,
            extension,
            extension2: 0,
        };
    }

    let extension2 = if kbps <= 500_000 {
        (kbps - 256_000) / 4_000
    } else if kbps <= 1_500_000 {
        0x3D + (kbps - 500_000) / 10_000
    } else {
        (0xA1 + (kbps - 1_500_000) / 100_000).min(u64::from(EXTENSION2_MAX))
    } as u8;
    BitrateCode {
        base: BASE_ESCAPE,
        extension: EXTENSION_ESCAPE,
        extension2,
    }
}
