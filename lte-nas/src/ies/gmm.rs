//! GPRS mobility management information elements
//! (3GPP TS 24.008 Section 10.5.5 and 10.5.7)

use bytes::{Buf, BufMut};
use lte_common::OctetString;

use crate::codec::{
    check_content_len, check_length, encode_lv_with, get_u24, put_u24, read_lv, read_u8,
    write_lv, InformationElement1, NasDecode, NasEncode, NasResult,
};

// ============================================================================
// DRX parameter (10.5.5.6)
// ============================================================================

/// DRX parameter (Type 3, 2 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrxParameter {
    /// SPLIT PG CYCLE CODE
    pub split_pg_cycle_code: u8,
    /// CN specific DRX cycle length coefficient and DRX value for S1 mode
    pub cn_specific_drx_cycle: u8,
    /// SPLIT on CCCH
    pub split_on_ccch: bool,
    /// Non-DRX timer
    pub non_drx_timer: u8,
}

impl NasDecode for DrxParameter {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, 2)?;
        let split_pg_cycle_code = buf.get_u8();
        let octet = buf.get_u8();
        Ok(Self {
            split_pg_cycle_code,
            cn_specific_drx_cycle: octet >> 4,
            split_on_ccch: octet & 0x08 != 0,
            non_drx_timer: octet & 0x07,
        })
    }
}

impl NasEncode for DrxParameter {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.split_pg_cycle_code);
        buf.put_u8(
            ((self.cn_specific_drx_cycle & 0x0F) << 4)
                | (u8::from(self.split_on_ccch) << 3)
                | (self.non_drx_timer & 0x07),
        );
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// MS network capability (10.5.5.12)
// ============================================================================

/// MS network capability (Type 4, 1-8 content octets)
///
/// The first two octets are decoded; later octets are kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MsNetworkCapability {
    /// GEA/1 supported
    pub gea1: bool,
    /// SM capabilities via dedicated channels
    pub sm_cap_dedicated: bool,
    /// SM capabilities via GPRS channels
    pub sm_cap_gprs: bool,
    /// UCS2 support
    pub ucs2: bool,
    /// SS screening indicator (2 bits)
    pub ss_screening_indicator: u8,
    /// SoLSA capability
    pub solsa: bool,
    /// Revision level indicator
    pub revision_level_indicator: bool,
    /// PFC feature mode
    pub pfc: bool,
    /// GEA/2 to GEA/7 as bits 6..1 (GEA/2 is the most significant)
    pub extended_gea: u8,
    /// LCS VA capability
    pub lcsva: bool,
    /// Content octets after the second, if any
    pub extension: OctetString,
    /// True when the content had only one octet
    pub short: bool,
}

impl MsNetworkCapability {
    /// Largest content length accepted
    pub const MAX_CONTENT_LEN: usize = 8;
}

impl NasDecode for MsNetworkCapability {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len(
            "MS network capability",
            content.len(),
            1,
            Self::MAX_CONTENT_LEN,
        )?;

        let o1 = content.get_u8();
        let mut cap = Self {
            gea1: o1 & 0x80 != 0,
            sm_cap_dedicated: o1 & 0x40 != 0,
            sm_cap_gprs: o1 & 0x20 != 0,
            ucs2: o1 & 0x10 != 0,
            ss_screening_indicator: (o1 >> 2) & 0x03,
            solsa: o1 & 0x02 != 0,
            revision_level_indicator: o1 & 0x01 != 0,
            short: true,
            ..Self::default()
        };

        if content.has_remaining() {
            let o2 = content.get_u8();
            cap.pfc = o2 & 0x80 != 0;
            cap.extended_gea = (o2 >> 1) & 0x3F;
            cap.lcsva = o2 & 0x01 != 0;
            cap.short = false;
            cap.extension = OctetString::from_slice(&content);
        }
        Ok(cap)
    }
}

impl NasEncode for MsNetworkCapability {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            c.put_u8(
                (u8::from(self.gea1) << 7)
                    | (u8::from(self.sm_cap_dedicated) << 6)
                    | (u8::from(self.sm_cap_gprs) << 5)
                    | (u8::from(self.ucs2) << 4)
                    | ((self.ss_screening_indicator & 0x03) << 2)
                    | (u8::from(self.solsa) << 1)
                    | u8::from(self.revision_level_indicator),
            );
            if !self.short {
                c.put_u8(
                    (u8::from(self.pfc) << 7)
                        | ((self.extended_gea & 0x3F) << 1)
                        | u8::from(self.lcsva),
                );
                c.put_slice(self.extension.data());
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        if self.short {
            2
        } else {
            3 + self.extension.len()
        }
    }
}

// ============================================================================
// P-TMSI signature (10.5.5.8)
// ============================================================================

/// P-TMSI signature (Type 3, 3 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PTmsiSignature(pub u32);

impl NasDecode for PTmsiSignature {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, 3)?;
        Ok(Self(get_u24(buf)))
    }
}

impl NasEncode for PTmsiSignature {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        put_u24(buf, self.0);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        3
    }
}

// ============================================================================
// TMSI status (10.5.5.4)
// ============================================================================

/// TMSI status (Type 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TmsiStatus {
    /// A valid TMSI is available
    pub valid_tmsi: bool,
}

impl InformationElement1 for TmsiStatus {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            valid_tmsi: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.valid_tmsi)
    }
}

// ============================================================================
// GPRS timers (10.5.7.3, 10.5.7.4, 10.5.7.4a)
// ============================================================================

/// Timer unit code meaning "deactivated" in every GPRS timer flavour
pub const TIMER_UNIT_DEACTIVATED: u8 = 0x07;

fn timer_octet(unit: u8, value: u8) -> u8 {
    ((unit & 0x07) << 5) | (value & 0x1F)
}

/// GPRS timer (Type 3, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GprsTimer {
    /// Unit: 0 = 2 s, 1 = 1 min, 2 = 6 min, 7 = deactivated
    pub unit: u8,
    /// Timer value (5 bits)
    pub value: u8,
}

impl GprsTimer {
    /// Create a timer
    pub fn new(unit: u8, value: u8) -> Self {
        Self {
            unit: unit & 0x07,
            value: value & 0x1F,
        }
    }

    /// Timer duration in seconds, `None` when deactivated
    pub fn seconds(&self) -> Option<u32> {
        let value = u32::from(self.value);
        match self.unit {
            0 => Some(value * 2),
            2 => Some(value * 360),
            TIMER_UNIT_DEACTIVATED => None,
            // Other values are interpreted as multiples of 1 minute.
            _ => Some(value * 60),
        }
    }

    fn from_octet(octet: u8) -> Self {
        Self::new(octet >> 5, octet)
    }
}

impl NasDecode for GprsTimer {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(Self::from_octet(read_u8(buf)?))
    }
}

impl NasEncode for GprsTimer {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(timer_octet(self.unit, self.value));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

/// GPRS timer 2 (Type 4, 1 content octet, same coding as [`GprsTimer`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GprsTimer2(pub GprsTimer);

impl NasDecode for GprsTimer2 {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("GPRS timer 2", content.len(), 1, 1)?;
        Ok(Self(GprsTimer::from_octet(content.get_u8())))
    }
}

impl NasEncode for GprsTimer2 {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &[timer_octet(self.0.unit, self.0.value)])
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

/// GPRS timer 3 (Type 4, 1 content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GprsTimer3 {
    /// Unit: 0 = 10 min, 1 = 1 h, 2 = 10 h, 3 = 2 s, 4 = 30 s, 5 = 1 min,
    /// 6 = 320 h, 7 = deactivated
    pub unit: u8,
    /// Timer value (5 bits)
    pub value: u8,
}

impl GprsTimer3 {
    /// Create a timer
    pub fn new(unit: u8, value: u8) -> Self {
        Self {
            unit: unit & 0x07,
            value: value & 0x1F,
        }
    }

    /// Timer duration in seconds, `None` when deactivated
    pub fn seconds(&self) -> Option<u32> {
        let value = u32::from(self.value);
        let unit_secs = match self.unit {
            0 => 600,
            1 => 3_600,
            2 => 36_000,
            3 => 2,
            4 => 30,
            5 => 60,
            6 => 1_152_000,
            _ => return None,
        };
        Some(value * unit_secs)
    }
}

impl NasDecode for GprsTimer3 {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("GPRS timer 3", content.len(), 1, 1)?;
        let octet = content.get_u8();
        Ok(Self::new(octet >> 5, octet))
    }
}

impl NasEncode for GprsTimer3 {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &[timer_octet(self.unit, self.value)])
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// Voice domain preference and UE's usage setting (10.5.5.28)
// ============================================================================

/// Voice domain preference and UE's usage setting (Type 4, 1 content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoiceDomainPreference {
    /// UE's usage setting: false = voice centric, true = data centric
    pub ue_usage_setting: bool,
    /// Voice domain preference for E-UTRAN (2 bits)
    pub voice_domain_preference: u8,
}

impl NasDecode for VoiceDomainPreference {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("voice domain preference", content.len(), 1, 1)?;
        let octet = content.get_u8();
        Ok(Self {
            ue_usage_setting: octet & 0x04 != 0,
            voice_domain_preference: octet & 0x03,
        })
    }
}

impl NasEncode for VoiceDomainPreference {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(
            buf,
            &[(u8::from(self.ue_usage_setting) << 2) | (self.voice_domain_preference & 0x03)],
        )
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// Network resource identifier container (10.5.5.31)
// ============================================================================

/// Network resource identifier container (Type 4, 2 content octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkResourceIdentifierContainer {
    /// NRI container value (10 bits)
    pub nri: u16,
}

impl NasDecode for NetworkResourceIdentifierContainer {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("NRI container", content.len(), 2, 2)?;
        let hi = u16::from(content.get_u8());
        let lo = u16::from(content.get_u8());
        Ok(Self {
            nri: (hi << 2) | (lo >> 6),
        })
    }
}

impl NasEncode for NetworkResourceIdentifierContainer {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        let nri = self.nri & 0x03FF;
        write_lv(buf, &[(nri >> 2) as u8, ((nri & 0x03) << 6) as u8])
    }

    fn encoded_len(&self) -> usize {
        3
    }
}

// ============================================================================
// Extended DRX parameters (10.5.5.32)
// ============================================================================

/// Extended DRX parameters (Type 4, 1 content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedDrxParameters {
    /// Paging time window (4 bits)
    pub paging_time_window: u8,
    /// eDRX value (4 bits)
    pub edrx_value: u8,
}

impl NasDecode for ExtendedDrxParameters {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("extended DRX parameters", content.len(), 1, 1)?;
        let octet = content.get_u8();
        Ok(Self {
            paging_time_window: octet >> 4,
            edrx_value: octet & 0x0F,
        })
    }
}

impl NasEncode for ExtendedDrxParameters {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            c.put_u8(((self.paging_time_window & 0x0F) << 4) | (self.edrx_value & 0x0F));
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        2
    }
}
