//! Traffic flow template (3GPP TS 24.008 Section 10.5.6.12)
//!
//! ```text
//! +-----------------+---+-----------------------+
//! | TFT op code (3) | E | number of filters (4) |  octet 3
//! +-----------------+---+-----------------------+
//! | packet filter list                          |
//! | parameters list (when E = 1)                |
//! +---------------------------------------------+
//! ```
//!
//! Packet filter contents are a sequence of typed components. The decoder
//! keeps them in wire order; [`PacketFilter::contents_flags`] reports which
//! component types are present.

use bytes::{Buf, BufMut, Bytes};
use lte_common::OctetString;

use crate::codec::{
    check_content_len, check_list_len, decode_bstring, encode_lv_with, expect_consumed, put_u24,
    read_array, read_lv, read_u16, read_u24, read_u32, read_u8, write_lv, NasDecode, NasEncode,
    NasError, NasResult,
};

/// Upper bound on packet filters in one TFT
pub const TFT_MAX_FILTERS: usize = 16;
/// Upper bound on TFT parameters
pub const TFT_MAX_PARAMETERS: usize = 16;

/// TFT operation code (octet 3, bits 8-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TftOperationCode {
    /// Spare
    Spare = 0,
    /// Create new TFT
    #[default]
    CreateNewTft = 1,
    /// Delete existing TFT
    DeleteExistingTft = 2,
    /// Add packet filters to existing TFT
    AddPacketFilters = 3,
    /// Replace packet filters in existing TFT
    ReplacePacketFilters = 4,
    /// Delete packet filters from existing TFT
    DeletePacketFilters = 5,
    /// No TFT operation
    NoTftOperation = 6,
    /// Reserved
    Reserved = 7,
}

impl TftOperationCode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Spare,
            1 => Self::CreateNewTft,
            2 => Self::DeleteExistingTft,
            3 => Self::AddPacketFilters,
            4 => Self::ReplacePacketFilters,
            5 => Self::DeletePacketFilters,
            6 => Self::NoTftOperation,
            _ => Self::Reserved,
        }
    }
}

/// Packet filter component type identifiers
pub mod component_type {
    /// IPv4 remote address and mask
    pub const IPV4_REMOTE_ADDRESS: u8 = 0x10;
    /// IPv6 remote address and mask
    pub const IPV6_REMOTE_ADDRESS: u8 = 0x20;
    /// Protocol identifier / next header
    pub const PROTOCOL_NEXT_HEADER: u8 = 0x30;
    /// Single local port
    pub const SINGLE_LOCAL_PORT: u8 = 0x40;
    /// Local port range
    pub const LOCAL_PORT_RANGE: u8 = 0x41;
    /// Single remote port
    pub const SINGLE_REMOTE_PORT: u8 = 0x50;
    /// Remote port range
    pub const REMOTE_PORT_RANGE: u8 = 0x51;
    /// Security parameter index
    pub const SECURITY_PARAMETER_INDEX: u8 = 0x60;
    /// Type of service / traffic class
    pub const TYPE_OF_SERVICE: u8 = 0x70;
    /// Flow label
    pub const FLOW_LABEL: u8 = 0x80;
}

/// Bits in [`PacketFilter::contents_flags`]
pub mod contents_flag {
    /// IPv4 remote address present
    pub const IPV4_REMOTE_ADDRESS: u16 = 1 << 0;
    /// IPv6 remote address present
    pub const IPV6_REMOTE_ADDRESS: u16 = 1 << 1;
    /// Protocol identifier present
    pub const PROTOCOL_NEXT_HEADER: u16 = 1 << 2;
    /// Single local port present
    pub const SINGLE_LOCAL_PORT: u16 = 1 << 3;
    /// Local port range present
    pub const LOCAL_PORT_RANGE: u16 = 1 << 4;
    /// Single remote port present
    pub const SINGLE_REMOTE_PORT: u16 = 1 << 5;
    /// Remote port range present
    pub const REMOTE_PORT_RANGE: u16 = 1 << 6;
    /// Security parameter index present
    pub const SECURITY_PARAMETER_INDEX: u16 = 1 << 7;
    /// Type of service present
    pub const TYPE_OF_SERVICE: u16 = 1 << 8;
    /// Flow label present
    pub const FLOW_LABEL: u16 = 1 << 9;
}

/// One packet filter component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketFilterComponent {
    /// IPv4 remote address
    Ipv4RemoteAddress {
        /// Address
        addr: [u8; 4],
        /// Mask
        mask: [u8; 4],
    },
    /// IPv6 remote address
    Ipv6RemoteAddress {
        /// Address
        addr: [u8; 16],
        /// Mask
        mask: [u8; 16],
    },
    /// Protocol identifier / next header
    ProtocolNextHeader(u8),
    /// Single local port
    SingleLocalPort(u16),
    /// Local port range
    LocalPortRange {
        /// Low limit
        low: u16,
        /// High limit
        high: u16,
    },
    /// Single remote port
    SingleRemotePort(u16),
    /// Remote port range
    RemotePortRange {
        /// Low limit
        low: u16,
        /// High limit
        high: u16,
    },
    /// IPsec security parameter index
    SecurityParameterIndex(u32),
    /// Type of service / traffic class with mask
    TypeOfService {
        /// Value
        value: u8,
        /// Mask
        mask: u8,
    },
    /// IPv6 flow label (20 bits)
    FlowLabel(u32),
}

impl PacketFilterComponent {
    /// Component type identifier
    pub fn type_id(&self) -> u8 {
        use component_type::*;
        match self {
            Self::Ipv4RemoteAddress { .. } => IPV4_REMOTE_ADDRESS,
            Self::Ipv6RemoteAddress { .. } => IPV6_REMOTE_ADDRESS,
            Self::ProtocolNextHeader(_) => PROTOCOL_NEXT_HEADER,
            Self::SingleLocalPort(_) => SINGLE_LOCAL_PORT,
            Self::LocalPortRange { .. } => LOCAL_PORT_RANGE,
            Self::SingleRemotePort(_) => SINGLE_REMOTE_PORT,
            Self::RemotePortRange { .. } => REMOTE_PORT_RANGE,
            Self::SecurityParameterIndex(_) => SECURITY_PARAMETER_INDEX,
            Self::TypeOfService { .. } => TYPE_OF_SERVICE,
            Self::FlowLabel(_) => FLOW_LABEL,
        }
    }

    /// Presence flag for this component type
    pub fn flag(&self) -> u16 {
        use contents_flag::*;
        match self {
            Self::Ipv4RemoteAddress { .. } => IPV4_REMOTE_ADDRESS,
            Self::Ipv6RemoteAddress { .. } => IPV6_REMOTE_ADDRESS,
            Self::ProtocolNextHeader(_) => PROTOCOL_NEXT_HEADER,
            Self::SingleLocalPort(_) => SINGLE_LOCAL_PORT,
            Self::LocalPortRange { .. } => LOCAL_PORT_RANGE,
            Self::SingleRemotePort(_) => SINGLE_REMOTE_PORT,
            Self::RemotePortRange { .. } => REMOTE_PORT_RANGE,
            Self::SecurityParameterIndex(_) => SECURITY_PARAMETER_INDEX,
            Self::TypeOfService { .. } => TYPE_OF_SERVICE,
            Self::FlowLabel(_) => FLOW_LABEL,
        }
    }

    fn value_len(&self) -> usize {
        match self {
            Self::Ipv4RemoteAddress { .. } => 8,
            Self::Ipv6RemoteAddress { .. } => 32,
            Self::ProtocolNextHeader(_) => 1,
            Self::SingleLocalPort(_) | Self::SingleRemotePort(_) => 2,
            Self::LocalPortRange { .. } | Self::RemotePortRange { .. } => 4,
            Self::SecurityParameterIndex(_) => 4,
            Self::TypeOfService { .. } => 2,
            Self::FlowLabel(_) => 3,
        }
    }

    fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        use component_type::*;
        let type_id = read_u8(buf)?;
        let component = match type_id {
            IPV4_REMOTE_ADDRESS => Self::Ipv4RemoteAddress {
                addr: read_array(buf)?,
                mask: read_array(buf)?,
            },
            IPV6_REMOTE_ADDRESS => Self::Ipv6RemoteAddress {
                addr: read_array(buf)?,
                mask: read_array(buf)?,
            },
            PROTOCOL_NEXT_HEADER => Self::ProtocolNextHeader(read_u8(buf)?),
            SINGLE_LOCAL_PORT => Self::SingleLocalPort(read_u16(buf)?),
            LOCAL_PORT_RANGE => Self::LocalPortRange {
                low: read_u16(buf)?,
                high: read_u16(buf)?,
            },
            SINGLE_REMOTE_PORT => Self::SingleRemotePort(read_u16(buf)?),
            REMOTE_PORT_RANGE => Self::RemotePortRange {
                low: read_u16(buf)?,
                high: read_u16(buf)?,
            },
            SECURITY_PARAMETER_INDEX => Self::SecurityParameterIndex(read_u32(buf)?),
            TYPE_OF_SERVICE => Self::TypeOfService {
                value: read_u8(buf)?,
                mask: read_u8(buf)?,
            },
            FLOW_LABEL => Self::FlowLabel(read_u24(buf)? & 0x000F_FFFF),
            other => {
                return Err(NasError::UnexpectedIei {
                    expected: None,
                    actual: other,
                })
            }
        };
        Ok(component)
    }

    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.type_id());
        match self {
            Self::Ipv4RemoteAddress { addr, mask } => {
                buf.put_slice(addr);
                buf.put_slice(mask);
            }
            Self::Ipv6RemoteAddress { addr, mask } => {
                buf.put_slice(addr);
                buf.put_slice(mask);
            }
            Self::ProtocolNextHeader(v) => buf.put_u8(*v),
            Self::SingleLocalPort(p) | Self::SingleRemotePort(p) => buf.put_u16(*p),
            Self::LocalPortRange { low, high } | Self::RemotePortRange { low, high } => {
                buf.put_u16(*low);
                buf.put_u16(*high);
            }
            Self::SecurityParameterIndex(spi) => buf.put_u32(*spi),
            Self::TypeOfService { value, mask } => {
                buf.put_u8(*value);
                buf.put_u8(*mask);
            }
            Self::FlowLabel(label) => put_u24(buf, *label & 0x000F_FFFF),
        }
    }
}

/// Packet filter direction (bits 6-5 of the identifier octet)
pub mod direction {
    /// Pre-Rel-7 TFT filter
    pub const PRE_REL7: u8 = 0b00;
    /// Downlink only
    pub const DOWNLINK_ONLY: u8 = 0b01;
    /// Uplink only
    pub const UPLINK_ONLY: u8 = 0b10;
    /// Bidirectional
    pub const BIDIRECTIONAL: u8 = 0b11;
}

/// Packet filter for create, add and replace operations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PacketFilter {
    /// Direction, see [`direction`]
    pub direction: u8,
    /// Packet filter identifier (4 bits)
    pub identifier: u8,
    /// Evaluation precedence
    pub evaluation_precedence: u8,
    /// Components in wire order
    pub components: Vec<PacketFilterComponent>,
}

impl PacketFilter {
    /// Bitmask of the component types present, see [`contents_flag`]
    pub fn contents_flags(&self) -> u16 {
        self.components.iter().fold(0, |acc, c| acc | c.flag())
    }

    fn contents_len(&self) -> usize {
        self.components.iter().map(|c| 1 + c.value_len()).sum()
    }

    fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let id_octet = read_u8(buf).map_err(|_| {
            NasError::value("fewer packet filters than announced in the TFT header")
        })?;
        if id_octet & 0xC0 != 0 {
            return Err(NasError::value(format!(
                "packet filter identifier octet 0x{id_octet:02X} has spare bits set"
            )));
        }
        let evaluation_precedence = read_u8(buf)?;
        let mut contents = read_lv(buf)?;

        let mut components = Vec::new();
        while contents.has_remaining() {
            components.push(PacketFilterComponent::decode(&mut contents)?);
        }
        Ok(Self {
            direction: (id_octet >> 4) & 0x03,
            identifier: id_octet & 0x0F,
            evaluation_precedence,
            components,
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        buf.put_u8(((self.direction & 0x03) << 4) | (self.identifier & 0x0F));
        buf.put_u8(self.evaluation_precedence);
        encode_lv_with(buf, |c| {
            for component in &self.components {
                component.encode(c);
            }
            Ok(())
        })
    }
}

/// Packet filter list, shaped by the operation code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PacketFilterList {
    /// No filters (delete existing TFT, no TFT operation)
    #[default]
    Empty,
    /// Filter identifiers to delete
    DeleteIdentifiers(Vec<u8>),
    /// Filters to create, add or replace
    Filters(Vec<PacketFilter>),
}

impl PacketFilterList {
    /// Number of entries, as written in the TFT header
    pub fn len(&self) -> usize {
        match self {
            PacketFilterList::Empty => 0,
            PacketFilterList::DeleteIdentifiers(ids) => ids.len(),
            PacketFilterList::Filters(filters) => filters.len(),
        }
    }

    /// True when no filter is listed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// TFT parameter (parameters list entry)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TftParameter {
    /// Parameter identifier (1 = authorization token, 2 = flow identifier,
    /// 3 = packet filter identifier)
    pub identifier: u8,
    /// Parameter contents
    pub contents: OctetString,
}

/// Traffic flow template (Type 4, 1-255 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrafficFlowTemplate {
    /// Operation code
    pub operation: TftOperationCode,
    /// Packet filters
    pub packet_filters: PacketFilterList,
    /// Parameters list; a non-empty list sets the E bit
    pub parameters: Vec<TftParameter>,
}

impl TrafficFlowTemplate {
    const E_BIT: u8 = 0x10;

    /// Decode the TFT value part (length already removed)
    pub fn decode_value(mut content: Bytes) -> NasResult<Self> {
        let header = read_u8(&mut content)?;
        let operation = TftOperationCode::from_bits(header >> 5);
        let ebit = header & Self::E_BIT != 0;
        let count = (header & 0x0F) as usize;
        check_list_len("TFT packet filters", count, TFT_MAX_FILTERS)?;

        let packet_filters = match operation {
            TftOperationCode::DeletePacketFilters => {
                let mut ids = Vec::with_capacity(count);
                for _ in 0..count {
                    let id = read_u8(&mut content)?;
                    if id & 0xF0 != 0 {
                        return Err(NasError::value(format!(
                            "packet filter identifier octet 0x{id:02X} has spare bits set"
                        )));
                    }
                    ids.push(id);
                }
                PacketFilterList::DeleteIdentifiers(ids)
            }
            TftOperationCode::CreateNewTft
            | TftOperationCode::AddPacketFilters
            | TftOperationCode::ReplacePacketFilters => {
                let mut filters = Vec::with_capacity(count);
                for _ in 0..count {
                    filters.push(PacketFilter::decode(&mut content)?);
                }
                PacketFilterList::Filters(filters)
            }
            _ => {
                if count != 0 {
                    return Err(NasError::value(format!(
                        "TFT operation {operation:?} with {count} packet filters"
                    )));
                }
                PacketFilterList::Empty
            }
        };

        let mut parameters = Vec::new();
        if ebit {
            while content.has_remaining() {
                let identifier = read_u8(&mut content)?;
                let len = read_u8(&mut content)? as usize;
                let contents = decode_bstring(&mut content, len)?;
                parameters.push(TftParameter {
                    identifier,
                    contents,
                });
                check_list_len("TFT parameters", parameters.len(), TFT_MAX_PARAMETERS)?;
            }
            if parameters.is_empty() {
                return Err(NasError::value("TFT E bit set without parameters"));
            }
        }
        expect_consumed("TFT", &content)?;

        Ok(Self {
            operation,
            packet_filters,
            parameters,
        })
    }

    fn value_len(&self) -> usize {
        let filters: usize = match &self.packet_filters {
            PacketFilterList::Empty => 0,
            PacketFilterList::DeleteIdentifiers(ids) => ids.len(),
            PacketFilterList::Filters(filters) => filters
                .iter()
                .map(|f| 3 + f.contents_len())
                .sum(),
        };
        let parameters: usize = self.parameters.iter().map(|p| 2 + p.contents.len()).sum();
        1 + filters + parameters
    }
}

impl NasDecode for TrafficFlowTemplate {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let content = read_lv(buf)?;
        check_content_len("TFT", content.len(), 1, usize::MAX)?;
        Self::decode_value(content)
    }
}

impl NasEncode for TrafficFlowTemplate {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        // The count field holds at most 15.
        check_list_len("TFT packet filters", self.packet_filters.len(), 15)?;
        check_list_len("TFT parameters", self.parameters.len(), TFT_MAX_PARAMETERS)?;

        encode_lv_with(buf, |c| {
            let ebit = if self.parameters.is_empty() { 0 } else { Self::E_BIT };
            c.put_u8(((self.operation as u8) << 5) | ebit | self.packet_filters.len() as u8);
            match &self.packet_filters {
                PacketFilterList::Empty => {}
                PacketFilterList::DeleteIdentifiers(ids) => {
                    for id in ids {
                        c.put_u8(id & 0x0F);
                    }
                }
                PacketFilterList::Filters(filters) => {
                    for filter in filters {
                        filter.encode(c)?;
                    }
                }
            }
            for parameter in &self.parameters {
                c.put_u8(parameter.identifier);
                write_lv(c, parameter.contents.data())?;
            }
            Ok(())
        })
    }

    fn encoded_len(&self) -> usize {
        1 + self.value_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_filter() -> PacketFilter {
        PacketFilter {
            direction: direction::BIDIRECTIONAL,
            identifier: 1,
            evaluation_precedence: 0x10,
            components: vec![
                PacketFilterComponent::Ipv4RemoteAddress {
                    addr: [10, 0, 0, 1],
                    mask: [255, 255, 255, 255],
                },
                PacketFilterComponent::ProtocolNextHeader(17),
                PacketFilterComponent::SingleRemotePort(5060),
            ],
        }
    }

    #[test]
    fn test_create_new_tft() {
        let tft = TrafficFlowTemplate {
            operation: TftOperationCode::CreateNewTft,
            packet_filters: PacketFilterList::Filters(vec![sample_filter()]),
            parameters: vec![],
        };
        let mut out = Vec::new();
        tft.nas_encode(&mut out).unwrap();
        assert_eq!(
            out,
            vec![
                0x12, 0x21, 0x31, 0x10, 0x0E, 0x10, 10, 0, 0, 1, 255, 255, 255, 255, 0x30, 17,
                0x50, 0x13, 0xC4
            ]
        );
        assert_eq!(tft.encoded_len(), out.len());

        let decoded = TrafficFlowTemplate::nas_decode(&mut out.as_slice()).unwrap();
        assert_eq!(decoded, tft);
        match &decoded.packet_filters {
            PacketFilterList::Filters(f) => assert_eq!(
                f[0].contents_flags(),
                contents_flag::IPV4_REMOTE_ADDRESS
                    | contents_flag::PROTOCOL_NEXT_HEADER
                    | contents_flag::SINGLE_REMOTE_PORT
            ),
            other => panic!("unexpected filter list {other:?}"),
        }
    }

    #[test]
    fn test_delete_packet_filters() {
        let data = [0x03, 0xA2, 0x01, 0x02];
        let tft = TrafficFlowTemplate::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(tft.operation, TftOperationCode::DeletePacketFilters);
        assert_eq!(tft.packet_filters, PacketFilterList::DeleteIdentifiers(vec![1, 2]));

        let mut out = Vec::new();
        tft.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_packet_filter_spare_bits_are_rejected() {
        // Create new TFT, one filter whose identifier octet sets bit 8
        let data = [0x06, 0x21, 0xB1, 0x10, 0x02, 0x30, 17];
        assert!(matches!(
            TrafficFlowTemplate::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
        let valid = [0x06, 0x21, 0x31, 0x10, 0x02, 0x30, 17];
        assert!(TrafficFlowTemplate::nas_decode(&mut &valid[..]).is_ok());

        let delete = [0x02, 0xA1, 0x41];
        assert!(matches!(
            TrafficFlowTemplate::nas_decode(&mut &delete[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_no_tft_operation_with_parameters() {
        let data = [0x05, 0xD0, 0x02, 0x02, 0x00, 0x01];
        let tft = TrafficFlowTemplate::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(tft.operation, TftOperationCode::NoTftOperation);
        assert!(tft.packet_filters.is_empty());
        assert_eq!(tft.parameters.len(), 1);
        assert_eq!(tft.parameters[0].identifier, 2);
        assert_eq!(tft.parameters[0].contents.data(), &[0x00, 0x01]);

        let mut out = Vec::new();
        tft.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_missing_packet_filter() {
        // Header announces two filters, only the header octet follows.
        let data = [0x01, 0x22];
        assert!(matches!(
            TrafficFlowTemplate::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_unknown_component_type() {
        let data = [0x06, 0x21, 0x31, 0x10, 0x02, 0x99, 0x00];
        assert!(matches!(
            TrafficFlowTemplate::nas_decode(&mut &data[..]),
            Err(NasError::UnexpectedIei {
                expected: None,
                actual: 0x99
            })
        ));
    }

    #[test]
    fn test_component_overruns_filter_contents() {
        // Single remote port needs two octets, the filter contents give one.
        let data = [0x06, 0x21, 0x31, 0x10, 0x02, 0x50, 0x13];
        assert!(matches!(
            TrafficFlowTemplate::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_delete_existing_tft_with_filters_rejected() {
        let data = [0x02, 0x41, 0x01];
        assert!(TrafficFlowTemplate::nas_decode(&mut &data[..]).is_err());
    }
}
