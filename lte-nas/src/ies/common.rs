//! Common information elements (3GPP TS 24.008 Section 10.5.1)
//!
//! IEs shared by the CS and PS domains that EMM messages reuse unchanged.

use bytes::{Buf, BufMut};
use lte_common::{OctetString, Plmn};

use crate::codec::{
    check_content_len, check_length, check_list_len, encode_lv_with, read_array, read_lv,
    read_u8, write_lv, InformationElement1, NasDecode, NasEncode, NasError, NasResult,
};

/// Decode a 3-octet PLMN, rejecting non-decimal digits.
pub(crate) fn decode_plmn<B: Buf>(buf: &mut B) -> NasResult<Plmn> {
    let bytes = read_array::<B, 3>(buf)?;
    Plmn::decode(bytes).ok_or_else(|| {
        NasError::value(format!("PLMN digits {}", hex::encode(bytes)))
    })
}

// ============================================================================
// Ciphering Key Sequence Number (10.5.1.2)
// ============================================================================

/// Ciphering key sequence number (Type 1, 3 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CipheringKeySequenceNumber {
    /// Key sequence (7 = no key available)
    pub value: u8,
}

impl CipheringKeySequenceNumber {
    /// No key is available
    pub const NO_KEY: u8 = 7;

    /// Create a new CKSN
    pub fn new(value: u8) -> Self {
        Self { value: value & 0x07 }
    }
}

impl InformationElement1 for CipheringKeySequenceNumber {
    fn decode(value: u8) -> NasResult<Self> {
        // Bit 4 is spare.
        Ok(Self::new(value))
    }

    fn encode(&self) -> u8 {
        self.value & 0x07
    }
}

// ============================================================================
// Location Area Identification (10.5.1.3)
// ============================================================================

/// Location area identification (Type 3, 5 octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocationAreaIdentification {
    /// PLMN of the location area
    pub plmn: Plmn,
    /// Location area code
    pub lac: u16,
}

impl LocationAreaIdentification {
    /// Encoded size
    pub const SIZE: usize = 5;

    /// Create a LAI
    pub fn new(plmn: Plmn, lac: u16) -> Self {
        Self { plmn, lac }
    }
}

impl NasDecode for LocationAreaIdentification {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, Self::SIZE)?;
        let plmn = decode_plmn(buf)?;
        let lac = buf.get_u16();
        Ok(Self { plmn, lac })
    }
}

impl NasEncode for LocationAreaIdentification {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_slice(&self.plmn.encode());
        buf.put_u16(self.lac);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        Self::SIZE
    }
}

// ============================================================================
// Mobile Station Classmark 2 (10.5.1.6)
// ============================================================================

/// Mobile station classmark 2 (Type 4, 3 content octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MsClassmark2 {
    /// Revision level (2 bits)
    pub revision_level: u8,
    /// Controlled early classmark sending
    pub es_ind: bool,
    /// A5/1 *not* available
    pub a51: bool,
    /// RF power capability (3 bits)
    pub rf_power_capability: u8,
    /// PS capability
    pub ps_capability: bool,
    /// SS screening indicator (2 bits)
    pub ss_screen_indicator: u8,
    /// SM capability
    pub sm_capability: bool,
    /// VBS notification reception
    pub vbs: bool,
    /// VGCS notification reception
    pub vgcs: bool,
    /// Frequency capability
    pub fc: bool,
    /// Classmark 3 available
    pub cm3: bool,
    /// LCS value added location request capability
    pub lcsva_cap: bool,
    /// UCS2 treatment
    pub ucs2: bool,
    /// SoLSA
    pub solsa: bool,
    /// CM service prompt
    pub cmsp: bool,
    /// A5/3 available
    pub a53: bool,
    /// A5/2 available
    pub a52: bool,
}

impl MsClassmark2 {
    /// Content length in octets
    pub const CONTENT_LEN: usize = 3;
}

impl NasDecode for MsClassmark2 {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len(
            "MS classmark 2",
            content.len(),
            Self::CONTENT_LEN,
            Self::CONTENT_LEN,
        )?;
        let o1 = content.get_u8();
        let o2 = content.get_u8();
        let o3 = content.get_u8();
        Ok(Self {
            revision_level: (o1 >> 5) & 0x03,
            es_ind: o1 & 0x10 != 0,
            a51: o1 & 0x08 != 0,
            rf_power_capability: o1 & 0x07,
            ps_capability: o2 & 0x40 != 0,
            ss_screen_indicator: (o2 >> 4) & 0x03,
            sm_capability: o2 & 0x08 != 0,
            vbs: o2 & 0x04 != 0,
            vgcs: o2 & 0x02 != 0,
            fc: o2 & 0x01 != 0,
            cm3: o3 & 0x80 != 0,
            lcsva_cap: o3 & 0x20 != 0,
            ucs2: o3 & 0x10 != 0,
            solsa: o3 & 0x08 != 0,
            cmsp: o3 & 0x04 != 0,
            a53: o3 & 0x02 != 0,
            a52: o3 & 0x01 != 0,
        })
    }
}

impl NasEncode for MsClassmark2 {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        let o1 = ((self.revision_level & 0x03) << 5)
            | (u8::from(self.es_ind) << 4)
            | (u8::from(self.a51) << 3)
            | (self.rf_power_capability & 0x07);
        let o2 = (u8::from(self.ps_capability) << 6)
            | ((self.ss_screen_indicator & 0x03) << 4)
            | (u8::from(self.sm_capability) << 3)
            | (u8::from(self.vbs) << 2)
            | (u8::from(self.vgcs) << 1)
            | u8::from(self.fc);
        let o3 = (u8::from(self.cm3) << 7)
            | (u8::from(self.lcsva_cap) << 5)
            | (u8::from(self.ucs2) << 4)
            | (u8::from(self.solsa) << 3)
            | (u8::from(self.cmsp) << 2)
            | (u8::from(self.a53) << 1)
            | u8::from(self.a52);
        write_lv(buf, &[o1, o2, o3])
    }

    fn encoded_len(&self) -> usize {
        1 + Self::CONTENT_LEN
    }
}

// ============================================================================
// Mobile Station Classmark 3 (10.5.1.7)
// ============================================================================

/// Mobile station classmark 3 (Type 4, 0-32 content octets)
///
/// The CSN.1 body is kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MsClassmark3 {
    /// Raw classmark 3 value part
    pub value: OctetString,
}

impl MsClassmark3 {
    /// Largest content length accepted
    pub const MAX_CONTENT_LEN: usize = 32;
}

impl NasDecode for MsClassmark3 {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let content = read_lv(buf)?;
        check_content_len("MS classmark 3", content.len(), 0, Self::MAX_CONTENT_LEN)?;
        Ok(Self {
            value: OctetString::from_slice(&content),
        })
    }
}

impl NasEncode for MsClassmark3 {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, self.value.data())
    }

    fn encoded_len(&self) -> usize {
        1 + self.value.len()
    }
}

// ============================================================================
// PLMN List (10.5.1.13)
// ============================================================================

/// PLMN list (Type 4, 3-45 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlmnList {
    /// PLMNs in wire order
    pub plmns: Vec<Plmn>,
}

impl PlmnList {
    /// Maximum number of PLMNs in the list
    pub const MAX_PLMNS: usize = 15;

    /// Create a list
    pub fn new(plmns: Vec<Plmn>) -> Self {
        Self { plmns }
    }
}

impl NasDecode for PlmnList {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("PLMN list", content.len(), 3, usize::MAX)?;
        if content.len() % 3 != 0 {
            return Err(NasError::value(format!(
                "PLMN list length {} is not a multiple of 3",
                content.len()
            )));
        }
        check_list_len("PLMN list", content.len() / 3, Self::MAX_PLMNS)?;

        let mut plmns = Vec::with_capacity(content.len() / 3);
        while content.has_remaining() {
            plmns.push(decode_plmn(&mut content)?);
        }
        Ok(Self { plmns })
    }
}

impl NasEncode for PlmnList {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        check_list_len("PLMN list", self.plmns.len(), Self::MAX_PLMNS)?;
        encode_lv_with(buf, |c| {
            for plmn in &self.plmns {
                c.put_slice(&plmn.encode());
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + 3 * self.plmns.len()
    }
}

// ============================================================================
// MS Network Feature Support (10.5.1.15)
// ============================================================================

/// MS network feature support (Type 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MsNetworkFeatureSupport {
    /// Extended periodic timers supported
    pub extended_periodic_timers: bool,
}

impl InformationElement1 for MsNetworkFeatureSupport {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            extended_periodic_timers: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.extended_periodic_timers)
    }
}

// ============================================================================
// Supported Codec List (10.5.4.32)
// ============================================================================

/// One entry of the supported codec list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedCodec {
    /// System identification (e.g. 0x04 GSM, 0x00 UMTS)
    pub system_id: u8,
    /// Codec bitmap, 1 or 2 octets in practice
    pub bitmap: OctetString,
}

/// Supported codec list (Type 4, 3-n content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupportedCodecList {
    /// Codec entries in wire order
    pub codecs: Vec<SupportedCodec>,
}

impl SupportedCodecList {
    /// Maximum number of codec entries accepted
    pub const MAX_CODECS: usize = 16;
}

impl NasDecode for SupportedCodecList {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("supported codec list", content.len(), 3, usize::MAX)?;

        let mut codecs = Vec::new();
        while content.has_remaining() {
            let system_id = read_u8(&mut content)?;
            let bitmap = read_lv(&mut content)?;
            codecs.push(SupportedCodec {
                system_id,
                bitmap: OctetString::from_slice(&bitmap),
            });
            check_list_len("supported codec list", codecs.len(), Self::MAX_CODECS)?;
        }
        Ok(Self { codecs })
    }
}

impl NasEncode for SupportedCodecList {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        check_list_len("supported codec list", self.codecs.len(), Self::MAX_CODECS)?;
        encode_lv_with(buf, |c| {
            for codec in &self.codecs {
                c.put_u8(codec.system_id);
                write_lv(c, codec.bitmap.data())?;
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self
            .codecs
            .iter()
            .map(|c| 2 + c.bitmap.len())
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cksn_masks_spare_bit() {
        let cksn = CipheringKeySequenceNumber::decode(0x0F).unwrap();
        assert_eq!(cksn.value, 7);
        assert_eq!(cksn.encode(), 0x07);
    }

    #[test]
    fn test_lai_decode() {
        let data = [0x00, 0xF1, 0x10, 0x12, 0x34];
        let mut buf = &data[..];
        let lai = LocationAreaIdentification::nas_decode(&mut buf).unwrap();
        assert_eq!(lai.plmn, Plmn::new(1, 1, false));
        assert_eq!(lai.lac, 0x1234);

        let mut out = Vec::new();
        lai.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_lai_truncated() {
        let data = [0x00, 0xF1, 0x10, 0x12];
        assert!(matches!(
            LocationAreaIdentification::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort { expected: 5, .. })
        ));
    }

    #[test]
    fn test_ms_classmark2_from_handset() {
        let data = [0x03, 0x57, 0x58, 0xA6];
        let cm2 = MsClassmark2::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(cm2.revision_level, 2);
        assert!(cm2.es_ind);
        assert!(!cm2.a51);
        assert_eq!(cm2.rf_power_capability, 7);
        assert!(cm2.ps_capability);
        assert_eq!(cm2.ss_screen_indicator, 1);
        assert!(cm2.sm_capability);
        assert!(cm2.cm3);
        assert!(cm2.lcsva_cap);
        assert!(!cm2.ucs2);
        assert!(cm2.cmsp);
        assert!(cm2.a53);
        assert!(!cm2.a52);

        let mut out = Vec::new();
        cm2.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_ms_classmark2_wrong_length() {
        let data = [0x02, 0x57, 0x58];
        assert!(MsClassmark2::nas_decode(&mut &data[..]).is_err());
    }

    #[test]
    fn test_plmn_list() {
        let data = [0x06, 0x00, 0xF1, 0x10, 0x13, 0x00, 0x14];
        let list = PlmnList::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(
            list.plmns,
            vec![Plmn::new(1, 1, false), Plmn::new(310, 410, true)]
        );
        let mut out = Vec::new();
        list.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(list.encoded_len(), data.len());
    }

    #[test]
    fn test_plmn_list_bounds() {
        let ragged = [0x04, 0x00, 0xF1, 0x10, 0x13];
        assert!(matches!(
            PlmnList::nas_decode(&mut &ragged[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));

        let mut too_many = vec![48u8];
        for _ in 0..16 {
            too_many.extend_from_slice(&[0x00, 0xF1, 0x10]);
        }
        assert!(matches!(
            PlmnList::nas_decode(&mut too_many.as_slice()),
            Err(NasError::ListTooLong { max: 15, .. })
        ));
    }

    #[test]
    fn test_supported_codecs_from_handset() {
        let data = [0x08, 0x04, 0x02, 0x60, 0x04, 0x00, 0x02, 0x1F, 0x00];
        let list = SupportedCodecList::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(list.codecs.len(), 2);
        assert_eq!(list.codecs[0].system_id, 0x04);
        assert_eq!(list.codecs[0].bitmap.data(), &[0x60, 0x04]);
        assert_eq!(list.codecs[1].system_id, 0x00);
        assert_eq!(list.codecs[1].bitmap.data(), &[0x1F, 0x00]);

        let mut out = Vec::new();
        list.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_supported_codecs_truncated_entry() {
        let data = [0x03, 0x04, 0x02, 0x60];
        assert!(matches!(
            SupportedCodecList::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_ms_network_feature_support() {
        let v = MsNetworkFeatureSupport::decode(0x01).unwrap();
        assert!(v.extended_periodic_timers);
        assert_eq!(v.encode(), 0x01);
    }
}
