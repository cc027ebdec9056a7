//! Session management information elements (3GPP TS 24.008 Section 10.5.6)
//!
//! Protocol configuration options and traffic flow templates live in their
//! own modules ([`super::pco`], [`super::tft`]).

use bytes::{Buf, BufMut};
use lte_common::OctetString;

use crate::codec::{
    check_content_len, encode_lv_with, read_bytes, read_lv, read_u8, write_lv, InformationElement1,
    NasDecode, NasEncode, NasError, NasResult,
};

// ============================================================================
// Access point name (10.5.6.1)
// ============================================================================

/// Access point name (Type 4, 1-100 content octets)
///
/// Held in dotted form (`internet.mnc001.mcc001.gprs`); on the wire each
/// label carries its own length octet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessPointName {
    /// Dotted APN
    pub value: String,
}

impl AccessPointName {
    /// Largest content length accepted
    pub const MAX_CONTENT_LEN: usize = 100;

    /// Create an APN from its dotted form
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    fn labels_len(&self) -> usize {
        // One length octet per label plus the label bytes, dots excluded.
        self.value.split('.').map(|l| 1 + l.len()).sum()
    }
}

impl NasDecode for AccessPointName {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("APN", content.len(), 1, Self::MAX_CONTENT_LEN)?;

        let mut apn = Vec::with_capacity(content.len());
        let mut first = true;
        while content.has_remaining() {
            let label_len = content.get_u8() as usize;
            if label_len > content.remaining() {
                return Err(NasError::value(format!(
                    "APN label of {label_len} octets with {} remaining",
                    content.remaining()
                )));
            }
            let label = read_bytes(&mut content, label_len)?;
            if label.contains(&b'.') {
                return Err(NasError::value("APN label contains a dot"));
            }
            if !first {
                apn.push(b'.');
            }
            first = false;
            apn.extend_from_slice(&label);
        }

        let value = String::from_utf8(apn).map_err(|_| NasError::value("APN is not UTF-8"))?;
        Ok(Self { value })
    }
}

impl NasEncode for AccessPointName {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        if self.labels_len() > Self::MAX_CONTENT_LEN {
            return Err(NasError::OctetStringTooLongForIei {
                len: self.labels_len(),
                max: Self::MAX_CONTENT_LEN,
            });
        }
        encode_lv_with(buf, |c| {
            for label in self.value.split('.') {
                write_lv(c, label.as_bytes())?;
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.labels_len()
    }
}

// ============================================================================
// Quality of service (10.5.6.5)
// ============================================================================

/// Quality of service (Type 4, 12-20 content octets)
///
/// The twelve R99 octets are decoded; octets for extended bit rates are kept
/// as received.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualityOfService {
    /// Delay class (3 bits)
    pub delay_class: u8,
    /// Reliability class (3 bits)
    pub reliability_class: u8,
    /// Peak throughput (4 bits)
    pub peak_throughput: u8,
    /// Precedence class (3 bits)
    pub precedence_class: u8,
    /// Mean throughput (5 bits)
    pub mean_throughput: u8,
    /// Traffic class (3 bits)
    pub traffic_class: u8,
    /// Delivery order (2 bits)
    pub delivery_order: u8,
    /// Delivery of erroneous SDUs (3 bits)
    pub delivery_of_erroneous_sdu: u8,
    /// Maximum SDU size
    pub maximum_sdu_size: u8,
    /// Maximum bit rate for uplink
    pub maximum_bit_rate_uplink: u8,
    /// Maximum bit rate for downlink
    pub maximum_bit_rate_downlink: u8,
    /// Residual BER (4 bits)
    pub residual_ber: u8,
    /// SDU error ratio (4 bits)
    pub sdu_error_ratio: u8,
    /// Transfer delay (6 bits)
    pub transfer_delay: u8,
    /// Traffic handling priority (2 bits)
    pub traffic_handling_priority: u8,
    /// Guaranteed bit rate for uplink
    pub guaranteed_bit_rate_uplink: u8,
    /// Guaranteed bit rate for downlink
    pub guaranteed_bit_rate_downlink: u8,
    /// Signalling indication
    pub signalling_indication: bool,
    /// Source statistics descriptor (4 bits)
    pub source_statistics_descriptor: u8,
    /// Extended bit rate octets (octet 15 onwards)
    pub extension: OctetString,
}

impl QualityOfService {
    /// Content octets always present
    pub const BASE_LEN: usize = 12;
    /// Largest content length accepted
    pub const MAX_CONTENT_LEN: usize = 20;
}

impl NasDecode for QualityOfService {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut c = read_lv(buf)?;
        check_content_len(
            "quality of service",
            c.len(),
            Self::BASE_LEN,
            Self::MAX_CONTENT_LEN,
        )?;

        let o3 = c.get_u8();
        let o4 = c.get_u8();
        let o5 = c.get_u8();
        let o6 = c.get_u8();
        let maximum_sdu_size = c.get_u8();
        let maximum_bit_rate_uplink = c.get_u8();
        let maximum_bit_rate_downlink = c.get_u8();
        let o10 = c.get_u8();
        let o11 = c.get_u8();
        let guaranteed_bit_rate_uplink = c.get_u8();
        let guaranteed_bit_rate_downlink = c.get_u8();
        let o14 = c.get_u8();

        Ok(Self {
            delay_class: (o3 >> 3) & 0x07,
            reliability_class: o3 & 0x07,
            peak_throughput: (o4 >> 4) & 0x0F,
            precedence_class: o4 & 0x07,
            mean_throughput: o5 & 0x1F,
            traffic_class: (o6 >> 5) & 0x07,
            delivery_order: (o6 >> 3) & 0x03,
            delivery_of_erroneous_sdu: o6 & 0x07,
            maximum_sdu_size,
            maximum_bit_rate_uplink,
            maximum_bit_rate_downlink,
            residual_ber: (o10 >> 4) & 0x0F,
            sdu_error_ratio: o10 & 0x0F,
            transfer_delay: (o11 >> 2) & 0x3F,
            traffic_handling_priority: o11 & 0x03,
            guaranteed_bit_rate_uplink,
            guaranteed_bit_rate_downlink,
            signalling_indication: o14 & 0x10 != 0,
            source_statistics_descriptor: o14 & 0x0F,
            extension: OctetString::from_slice(&c),
        })
    }
}

impl NasEncode for QualityOfService {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        encode_lv_with(buf, |c| {
            c.put_u8(((self.delay_class & 0x07) << 3) | (self.reliability_class & 0x07));
            c.put_u8(((self.peak_throughput & 0x0F) << 4) | (self.precedence_class & 0x07));
            c.put_u8(self.mean_throughput & 0x1F);
            c.put_u8(
                ((self.traffic_class & 0x07) << 5)
                    | ((self.delivery_order & 0x03) << 3)
                    | (self.delivery_of_erroneous_sdu & 0x07),
            );
            c.put_u8(self.maximum_sdu_size);
            c.put_u8(self.maximum_bit_rate_uplink);
            c.put_u8(self.maximum_bit_rate_downlink);
            c.put_u8(((self.residual_ber & 0x0F) << 4) | (self.sdu_error_ratio & 0x0F));
            c.put_u8(
                ((self.transfer_delay & 0x3F) << 2) | (self.traffic_handling_priority & 0x03),
            );
            c.put_u8(self.guaranteed_bit_rate_uplink);
            c.put_u8(self.guaranteed_bit_rate_downlink);
            c.put_u8(
                (u8::from(self.signalling_indication) << 4)
                    | (self.source_statistics_descriptor & 0x0F),
            );
            c.put_slice(self.extension.data());
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + Self::BASE_LEN + self.extension.len()
    }
}

// ============================================================================
// Linked TI (10.5.6.7)
// ============================================================================

/// Linked transaction identifier
///
/// Only GERAN/UTRAN bearers are linked by TI, so E-UTRAN peers never send it.
/// Both directions fail with [`NasError::Fatal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkedTi;

impl NasDecode for LinkedTi {
    fn nas_decode<B: Buf>(_buf: &mut B) -> NasResult<Self> {
        Err(NasError::Fatal("linked TI"))
    }
}

impl NasEncode for LinkedTi {
    fn nas_encode<B: BufMut>(&self, _buf: &mut B) -> NasResult<()> {
        Err(NasError::Fatal("linked TI"))
    }

    fn encoded_len(&self) -> usize {
        0
    }
}

// ============================================================================
// LLC service access point identifier (10.5.6.9)
// ============================================================================

/// LLC service access point identifier (Type 3, 1 octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LlcServiceAccessPointIdentifier(pub u8);

impl NasDecode for LlcServiceAccessPointIdentifier {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        Ok(Self(read_u8(buf)? & 0x0F))
    }
}

impl NasEncode for LlcServiceAccessPointIdentifier {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(self.0 & 0x0F);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

// ============================================================================
// Radio priority (10.5.7.2)
// ============================================================================

/// Radio priority (Type 1, 3 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadioPriority(pub u8);

impl InformationElement1 for RadioPriority {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self(value & 0x07))
    }

    fn encode(&self) -> u8 {
        self.0 & 0x07
    }
}

// ============================================================================
// Packet flow identifier (10.5.6.11)
// ============================================================================

/// Packet flow identifier (Type 4, 1 content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketFlowIdentifier(pub u8);

impl NasDecode for PacketFlowIdentifier {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        check_content_len("packet flow identifier", content.len(), 1, 1)?;
        Ok(Self(content.get_u8() & 0x7F))
    }
}

impl NasEncode for PacketFlowIdentifier {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        write_lv(buf, &[self.0 & 0x7F])
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// Request type (10.5.6.17)
// ============================================================================

/// Request type (Type 1, 3 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestType(pub u8);

impl RequestType {
    /// Initial request
    pub const INITIAL_REQUEST: u8 = 1;
    /// Handover
    pub const HANDOVER: u8 = 2;
    /// Emergency
    pub const EMERGENCY: u8 = 4;
}

impl InformationElement1 for RequestType {
    fn decode(value: u8) -> NasResult<Self> {
        Ok(Self(value & 0x07))
    }

    fn encode(&self) -> u8 {
        self.0 & 0x07
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apn_labels() {
        let data = [
            0x09, 0x08, b'i', b'n', b't', b'e', b'r', b'n', b'e', b't',
        ];
        let apn = AccessPointName::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(apn.value, "internet");

        let apn = AccessPointName::new("ims.mnc001");
        let mut out = Vec::new();
        apn.nas_encode(&mut out).unwrap();
        assert_eq!(
            out,
            vec![0x0B, 0x03, b'i', b'm', b's', 0x06, b'm', b'n', b'c', b'0', b'0', b'1']
        );
        assert_eq!(apn.encoded_len(), out.len());
        assert_eq!(AccessPointName::nas_decode(&mut out.as_slice()).unwrap(), apn);
    }

    #[test]
    fn test_apn_label_overrun() {
        let data = [0x03, 0x05, b'a', b'b'];
        assert!(matches!(
            AccessPointName::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_apn_label_with_dot_is_rejected() {
        // One label "a.b" would re-encode as two labels
        let data = [0x04, 0x03, b'a', b'.', b'b'];
        assert!(matches!(
            AccessPointName::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
        let split = [0x04, 0x01, b'a', 0x01, b'b'];
        let apn = AccessPointName::nas_decode(&mut &split[..]).unwrap();
        assert_eq!(apn.value, "a.b");
    }

    #[test]
    fn test_apn_too_long_to_encode() {
        let apn = AccessPointName::new("a".repeat(120));
        let mut out = Vec::new();
        assert!(matches!(
            apn.nas_encode(&mut out),
            Err(NasError::OctetStringTooLongForIei { max: 100, .. })
        ));
    }

    #[test]
    fn test_qos_decode() {
        let data = [
            0x0C, 0x0B, 0x92, 0x1F, 0x73, 0x96, 0xFE, 0xFE, 0x74, 0x4B, 0x40, 0x40, 0x00,
        ];
        let qos = QualityOfService::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(qos.delay_class, 1);
        assert_eq!(qos.reliability_class, 3);
        assert_eq!(qos.peak_throughput, 9);
        assert_eq!(qos.precedence_class, 2);
        assert_eq!(qos.mean_throughput, 0x1F);
        assert_eq!(qos.traffic_class, 3);
        assert_eq!(qos.delivery_order, 2);
        assert_eq!(qos.delivery_of_erroneous_sdu, 3);
        assert_eq!(qos.maximum_sdu_size, 0x96);
        assert_eq!(qos.residual_ber, 7);
        assert_eq!(qos.sdu_error_ratio, 4);
        assert_eq!(qos.transfer_delay, 0x12);
        assert_eq!(qos.traffic_handling_priority, 3);
        assert!(qos.extension.is_empty());

        let mut out = Vec::new();
        qos.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_qos_too_short() {
        let data = [0x03, 0x0B, 0x92, 0x1F];
        assert!(matches!(
            QualityOfService::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_linked_ti_is_fatal() {
        let data = [0x01, 0x00];
        assert_eq!(
            LinkedTi::nas_decode(&mut &data[..]),
            Err(NasError::Fatal("linked TI"))
        );
        let mut out = Vec::new();
        assert_eq!(LinkedTi.nas_encode(&mut out), Err(NasError::Fatal("linked TI")));
    }

    #[test]
    fn test_packet_flow_identifier() {
        let data = [0x01, 0x85];
        let pfi = PacketFlowIdentifier::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(pfi.0, 0x05);
    }
}
