//! EPS session management information elements (3GPP TS 24.301 Section 9.9.4)

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut};
use lte_common::OctetString;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::bitrate::{code_to_kbps, kbps_to_code, BitrateCode, EXTENSION_MAX_KBPS};
use super::pco::ProtocolConfigurationOptions;
use crate::codec::{
    check_content_len, decode_bstring, encode_bstring, encode_lv_e_with, encode_lv_with,
    read_array, read_lv, read_lv_e, read_u8, write_lv, InformationElement1, NasDecode, NasEncode,
    NasError, NasResult,
};
use crate::enums::EsmCause;

// ============================================================================
// APN aggregate maximum bit rate (9.9.4.2)
// ============================================================================

/// Downlink / uplink code pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitratePair {
    /// Downlink code
    pub downlink: u8,
    /// Uplink code
    pub uplink: u8,
}

/// APN aggregate maximum bit rate (Type 4, 2, 4 or 6 content octets)
///
/// Codes are kept as received. The extension-2 octets of APN-AMBR count in
/// steps of 256 Mbps on top of the extended value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApnAggregateMaximumBitRate {
    /// Base codes (octets 3 and 4)
    pub base: BitratePair,
    /// Extended codes (octets 5 and 6)
    pub extended: Option<BitratePair>,
    /// Extended-2 codes (octets 7 and 8)
    pub extended2: Option<BitratePair>,
}

impl ApnAggregateMaximumBitRate {
    const EXTENDED2_STEP_KBPS: u64 = 256_000;

    /// Build the shortest coding for the given rates
    pub fn from_kbps(downlink: u64, uplink: u64) -> Self {
        let (dl, dl2) = Self::split(downlink);
        let (ul, ul2) = Self::split(uplink);
        let base = BitratePair {
            downlink: dl.base,
            uplink: ul.base,
        };
        let extended = BitratePair {
            downlink: dl.extension,
            uplink: ul.extension,
        };
        let extended2 = BitratePair {
            downlink: dl2,
            uplink: ul2,
        };
        let needs_ext2 = extended2 != BitratePair::default();
        let needs_ext = needs_ext2 || extended != BitratePair::default();
        Self {
            base,
            extended: needs_ext.then_some(extended),
            extended2: needs_ext2.then_some(extended2),
        }
    }

    fn split(kbps: u64) -> (BitrateCode, u8) {
        if kbps <= EXTENSION_MAX_KBPS {
            return (kbps_to_code(kbps), 0);
        }
        let steps = (kbps / Self::EXTENDED2_STEP_KBPS).min(0xFE);
        let rest = kbps - steps * Self::EXTENDED2_STEP_KBPS;
        (kbps_to_code(rest.min(EXTENSION_MAX_KBPS)), steps as u8)
    }

    fn rate(&self, pick: fn(&BitratePair) -> u8) -> u64 {
        let code = BitrateCode {
            base: pick(&self.base),
            extension: self.extended.as_ref().map_or(0, pick),
            extension2: 0,
        };
        let steps = u64::from(self.extended2.as_ref().map_or(0, pick));
        code_to_kbps(code) + steps * Self::EXTENDED2_STEP_KBPS
    }

    /// Downlink rate in kbps
    pub fn downlink_kbps(&self) -> u64 {
        self.rate(|p| p.downlink)
    }

    /// Uplink rate in kbps
    pub fn uplink_kbps(&self) -> u64 {
        self.rate(|p| p.uplink)
    }

    fn content_len(&self) -> usize {
        2 + 2 * usize::from(self.extended.is_some()) + 2 * usize::from(self.extended2.is_some())
    }
}

impl NasDecode for ApnAggregateMaximumBitRate {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        let len = content.len();
        if !matches!(len, 2 | 4 | 6) {
            return Err(NasError::value(format!("APN-AMBR of {len} octets")));
        }
        let mut pair = || BitratePair {
            downlink: content.get_u8(),
            uplink: content.get_u8(),
        };
        let base = pair();
        let extended = (len >= 4).then(&mut pair);
        let extended2 = (len == 6).then(&mut pair);
        Ok(Self {
            base,
            extended,
            extended2,
        })
    }
}

impl NasEncode for ApnAggregateMaximumBitRate {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        if self.extended2.is_some() && self.extended.is_none() {
            return Err(NasError::value("APN-AMBR extended-2 without extended"));
        }
        let pairs = [Some(self.base), self.extended, self.extended2];
        encode_lv_with(buf, |c| {
            for pair in pairs.iter().flatten() {
                c.put_u8(pair.downlink);
                c.put_u8(pair.uplink);
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

// ============================================================================
// EPS quality of service (9.9.4.3)
// ============================================================================

/// One set of EPS bearer bit rate codes, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpsBitRates {
    /// Maximum bit rate for uplink
    pub max_uplink: u8,
    /// Maximum bit rate for downlink
    pub max_downlink: u8,
    /// Guaranteed bit rate for uplink
    pub guaranteed_uplink: u8,
    /// Guaranteed bit rate for downlink
    pub guaranteed_downlink: u8,
}

impl EpsBitRates {
    fn decode<B: Buf>(buf: &mut B) -> Self {
        Self {
            max_uplink: buf.get_u8(),
            max_downlink: buf.get_u8(),
            guaranteed_uplink: buf.get_u8(),
            guaranteed_downlink: buf.get_u8(),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.max_uplink);
        buf.put_u8(self.max_downlink);
        buf.put_u8(self.guaranteed_uplink);
        buf.put_u8(self.guaranteed_downlink);
    }

    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// EPS quality of service (Type 4, 1, 5, 9 or 13 content octets)
///
/// Bit rates are kept as the raw ladder codes received; the `*_kbps`
/// accessors interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpsQualityOfService {
    /// QoS class identifier
    pub qci: u8,
    /// Octets 4-7
    pub bit_rates: Option<EpsBitRates>,
    /// Octets 8-11
    pub bit_rates_ext: Option<EpsBitRates>,
    /// Octets 12-15
    pub bit_rates_ext2: Option<EpsBitRates>,
}

impl EpsQualityOfService {
    /// QoS without bit rates (non-GBR bearer)
    pub fn new(qci: u8) -> Self {
        Self {
            qci,
            ..Default::default()
        }
    }

    /// QoS for a GBR bearer. Extension octets are present only when needed.
    pub fn with_bit_rates_kbps(
        qci: u8,
        max_uplink: u64,
        max_downlink: u64,
        guaranteed_uplink: u64,
        guaranteed_downlink: u64,
    ) -> Self {
        let codes = [max_uplink, max_downlink, guaranteed_uplink, guaranteed_downlink]
            .map(kbps_to_code);
        let pick = |f: fn(&BitrateCode) -> u8| EpsBitRates {
            max_uplink: f(&codes[0]),
            max_downlink: f(&codes[1]),
            guaranteed_uplink: f(&codes[2]),
            guaranteed_downlink: f(&codes[3]),
        };
        let ext = pick(|c| c.extension);
        let ext2 = pick(|c| c.extension2);
        let needs_ext2 = !ext2.is_zero();
        let needs_ext = needs_ext2 || !ext.is_zero();
        Self {
            qci,
            bit_rates: Some(pick(|c| c.base)),
            bit_rates_ext: needs_ext.then_some(ext),
            bit_rates_ext2: needs_ext2.then_some(ext2),
        }
    }

    fn rate(&self, pick: fn(&EpsBitRates) -> u8) -> Option<u64> {
        let base = self.bit_rates.as_ref().map(pick)?;
        Some(code_to_kbps(BitrateCode {
            base,
            extension: self.bit_rates_ext.as_ref().map_or(0, pick),
            extension2: self.bit_rates_ext2.as_ref().map_or(0, pick),
        }))
    }

    /// Maximum uplink rate in kbps
    pub fn max_uplink_kbps(&self) -> Option<u64> {
        self.rate(|r| r.max_uplink)
    }

    /// Maximum downlink rate in kbps
    pub fn max_downlink_kbps(&self) -> Option<u64> {
        self.rate(|r| r.max_downlink)
    }

    /// Guaranteed uplink rate in kbps
    pub fn guaranteed_uplink_kbps(&self) -> Option<u64> {
        self.rate(|r| r.guaranteed_uplink)
    }

    /// Guaranteed downlink rate in kbps
    pub fn guaranteed_downlink_kbps(&self) -> Option<u64> {
        self.rate(|r| r.guaranteed_downlink)
    }

    fn content_len(&self) -> usize {
        [self.bit_rates, self.bit_rates_ext, self.bit_rates_ext2]
            .iter()
            .flatten()
            .count()
            * 4
            + 1
    }
}

impl NasDecode for EpsQualityOfService {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        let len = content.len();
        if !matches!(len, 1 | 5 | 9 | 13) {
            return Err(NasError::value(format!("EPS QoS of {len} octets")));
        }
        let qci = content.get_u8();
        let bit_rates = (len >= 5).then(|| EpsBitRates::decode(&mut content));
        let bit_rates_ext = (len >= 9).then(|| EpsBitRates::decode(&mut content));
        let bit_rates_ext2 = (len == 13).then(|| EpsBitRates::decode(&mut content));
        Ok(Self {
            qci,
            bit_rates,
            bit_rates_ext,
            bit_rates_ext2,
        })
    }
}

impl NasEncode for EpsQualityOfService {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        if (self.bit_rates_ext.is_some() && self.bit_rates.is_none())
            || (self.bit_rates_ext2.is_some() && self.bit_rates_ext.is_none())
        {
            return Err(NasError::value("EPS QoS extension octets without base"));
        }
        encode_lv_with(buf, |c| {
            c.put_u8(self.qci);
            for rates in [self.bit_rates, self.bit_rates_ext, self.bit_rates_ext2]
                .iter()
                .flatten()
            {
                rates.encode(c);
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

// ============================================================================
// ESM cause (9.9.4.4)
// ============================================================================

impl NasDecode for EsmCause {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(EsmCause::from(read_u8(buf)?))
    }
}

impl NasEncode for EsmCause {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(u8::from(*self));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

// ============================================================================
// Half-octet ESM IEs
// ============================================================================

/// ESM information transfer flag (Type 1, 9.9.4.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EsmInformationTransferFlag {
    /// Security protected ESM information transfer requested
    pub requested: bool,
}

impl InformationElement1 for EsmInformationTransferFlag {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            requested: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.requested)
    }
}

/// Connectivity type (Type 1, 24.008 10.5.6.19)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityType {
    /// The PDN connection is considered a LIPA PDN connection
    pub lipa: bool,
}

impl InformationElement1 for ConnectivityType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self {
            lipa: value & 0x01 != 0,
        })
    }

    fn encode(&self) -> u8 {
        u8::from(self.lipa)
    }
}

/// Linked EPS bearer identity (Type 1, 9.9.4.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkedEpsBearerIdentity(pub u8);

impl InformationElement1 for LinkedEpsBearerIdentity {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self(value & 0x0F))
    }

    fn encode(&self) -> u8 {
        self.0 & 0x0F
    }
}

/// PDN type (Type 1, 9.9.4.10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PdnType {
    #[default]
    Ipv4 = 1,
    Ipv6 = 2,
    Ipv4v6 = 3,
    Unused = 4,
    NonIp = 5,
}

impl InformationElement1 for PdnType {
    fn decode(value: u8) -> NasResult<Self> {
        PdnType::try_from(value & 0x07)
            .map_err(|_| NasError::value(format!("PDN type {}", value & 0x07)))
    }

    fn encode(&self) -> u8 {
        u8::from(*self)
    }
}

// ============================================================================
// PDN address (9.9.4.9)
// ============================================================================

/// PDN address (Type 4, 5-13 content octets)
///
/// IPv6 addresses carry only the 8-octet interface identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdnAddress {
    Ipv4(Ipv4Addr),
    Ipv6 {
        interface_identifier: [u8; 8],
    },
    Ipv4v6 {
        interface_identifier: [u8; 8],
        ipv4: Ipv4Addr,
    },
    /// No address; any address octets are ignored
    NonIp,
}

impl Default for PdnAddress {
    fn default() -> Self {
        PdnAddress::Ipv4(Ipv4Addr::UNSPECIFIED)
    }
}

impl PdnAddress {
    /// PDN type carried in octet 3
    pub fn pdn_type(&self) -> PdnType {
        match self {
            PdnAddress::Ipv4(_) => PdnType::Ipv4,
            PdnAddress::Ipv6 { .. } => PdnType::Ipv6,
            PdnAddress::Ipv4v6 { .. } => PdnType::Ipv4v6,
            PdnAddress::NonIp => PdnType::NonIp,
        }
    }

    fn content_len(&self) -> usize {
        1 + match self {
            PdnAddress::Ipv4(_) => 4,
            PdnAddress::Ipv6 { .. } => 8,
            PdnAddress::Ipv4v6 { .. } => 12,
            PdnAddress::NonIp => 0,
        }
    }
}

impl NasDecode for PdnAddress {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("PDN address", content.len(), 1, 13)?;
        let pdn_type = PdnType::decode(content.get_u8())?;
        let expected = match pdn_type {
            PdnType::Ipv4 => 4,
            PdnType::Ipv6 => 8,
            PdnType::Ipv4v6 => 12,
            PdnType::NonIp => return Ok(PdnAddress::NonIp),
            PdnType::Unused => return Err(NasError::value("PDN address of unused PDN type")),
        };
        if content.len() != expected {
            return Err(NasError::value(format!(
                "{pdn_type:?} PDN address of {} octets",
                content.len()
            )));
        }
        Ok(match pdn_type {
            PdnType::Ipv4 => PdnAddress::Ipv4(Ipv4Addr::from(content.get_u32())),
            PdnType::Ipv6 => PdnAddress::Ipv6 {
                interface_identifier: read_array(&mut content)?,
            },
            _ => PdnAddress::Ipv4v6 {
                interface_identifier: read_array(&mut content)?,
                ipv4: Ipv4Addr::from(content.get_u32()),
            },
        })
    }
}

impl NasEncode for PdnAddress {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            c.put_u8(self.pdn_type().encode());
            match self {
                PdnAddress::Ipv4(ipv4) => c.put_slice(&ipv4.octets()),
                PdnAddress::Ipv6 {
                    interface_identifier,
                } => c.put_slice(interface_identifier),
                PdnAddress::Ipv4v6 {
                    interface_identifier,
                    ipv4,
                } => {
                    c.put_slice(interface_identifier);
                    c.put_slice(&ipv4.octets());
                }
                PdnAddress::NonIp => {}
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.content_len()
    }
}

// ============================================================================
// Transaction identifier (9.9.4.17)
// ============================================================================

/// Transaction identifier (Type 4, 1-2 content octets)
///
/// Coded as the 24.008 linked TI and only relevant to GERAN/UTRAN
/// interworking, so the octets are carried opaque.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionIdentifier {
    /// Raw content
    pub value: OctetString,
}

impl NasDecode for TransactionIdentifier {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("transaction identifier", content.len(), 1, 2)?;
        let len = content.len();
        Ok(Self {
            value: decode_bstring(&mut content, len)?,
        })
    }
}

impl NasEncode for TransactionIdentifier {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| encode_bstring(c, &self.value).map(|_| ()))
    }

    fn encoded_len(&self) -> usize {
        1 + self.value.len()
    }
}

// ============================================================================
// Re-attempt indicator (9.9.4.13A)
// ============================================================================

/// Re-attempt indicator (Type 4, 1 content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReAttemptIndicator {
    /// Re-attempt in A/Gb or Iu mode not allowed
    pub ratc: bool,
    /// Re-attempt in an equivalent PLMN not allowed
    pub eplmnc: bool,
}

impl NasDecode for ReAttemptIndicator {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("re-attempt indicator", content.len(), 1, 1)?;
        let octet = content.get_u8();
        Ok(Self {
            ratc: octet & 0x01 != 0,
            eplmnc: octet & 0x02 != 0,
        })
    }
}

impl NasEncode for ReAttemptIndicator {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &[u8::from(self.ratc) | (u8::from(self.eplmnc) << 1)])
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// Extended protocol configuration options (9.9.4.26)
// ============================================================================

/// Extended protocol configuration options (Type 6)
///
/// Same value part as [`ProtocolConfigurationOptions`] behind a 2-octet
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedProtocolConfigurationOptions(pub ProtocolConfigurationOptions);

impl NasDecode for ExtendedProtocolConfigurationOptions {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv_e(buf)?;
        ProtocolConfigurationOptions::decode_value(&mut content).map(Self)
    }
}

impl NasEncode for ExtendedProtocolConfigurationOptions {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        let mut lv = Vec::with_capacity(self.0.encoded_len());
        self.0.nas_encode(&mut lv)?;
        encode_lv_e_with(buf, |c| {
            // Reuse the PCO encoder and drop its 1-octet length.
            c.put_slice(&lv[1..]);
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        2 + self.0.encoded_len() - 1
    }
}

// ============================================================================
// Extended APN aggregate maximum bit rate (9.9.4.29)
// ============================================================================

/// One direction of extended APN-AMBR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedAmbrValue {
    /// Unit code (3 = 4 Mbps, 4 = 16 Mbps, each step multiplying by 4)
    pub unit: u8,
    /// Rate in multiples of `unit`
    pub value: u16,
}

impl ExtendedAmbrValue {
    /// Rate in kbps, `None` for unit 0
    pub fn kbps(&self) -> Option<u64> {
        let unit_kbps: u64 = match self.unit {
            0 => return None,
            1 => 200,
            2 => 1_000,
            // 1 Mbps, 4, 16, 64, 256 Mbps, 1 Gbps, ... up to 256 Pbps
            u => {
                let exp = u32::from(u.min(0x15) - 2);
                1_000 * 1_000u64.pow(exp / 5) * 4u64.pow(exp % 5)
            }
        };
        unit_kbps.checked_mul(u64::from(self.value))
    }
}

/// Extended APN aggregate maximum bit rate (Type 4, 6 content octets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedApnAggregateMaximumBitRate {
    /// Downlink
    pub downlink: ExtendedAmbrValue,
    /// Uplink
    pub uplink: ExtendedAmbrValue,
}

impl NasDecode for ExtendedApnAggregateMaximumBitRate {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("extended APN-AMBR", content.len(), 6, 6)?;
        let mut value = || ExtendedAmbrValue {
            unit: content.get_u8(),
            value: content.get_u16(),
        };
        let downlink = value();
        let uplink = value();
        Ok(Self { downlink, uplink })
    }
}

impl NasEncode for ExtendedApnAggregateMaximumBitRate {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            for v in [self.downlink, self.uplink] {
                c.put_u8(v.unit);
                c.put_u16(v.value);
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        7
    }
}
