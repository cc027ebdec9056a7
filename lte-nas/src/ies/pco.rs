//! Protocol configuration options (3GPP TS 24.008 Section 10.5.6.3)
//!
//! ```text
//! +-----+---------------+----------------------+
//! | ext | spare (0000)  | configuration proto. |  octet 3
//! +-----+---------------+----------------------+
//! | protocol / container ID (2 octets)         |
//! | length of contents (1 octet)               |  repeated
//! | contents                                   |
//! +--------------------------------------------+
//! ```

use bytes::{Buf, BufMut};
use lte_common::OctetString;

use crate::codec::{
    check_content_len, check_list_len, decode_bstring, encode_bstring, encode_lv_with, read_lv,
    NasDecode, NasEncode, NasError, NasResult,
};

/// Upper bound on protocol / container entries in one PCO
pub const PCO_MAX_OPTIONS: usize = 64;

/// Well-known protocol and container identifiers
pub mod pco_id {
    /// LCP
    pub const LCP: u16 = 0xC021;
    /// PAP
    pub const PAP: u16 = 0xC023;
    /// CHAP
    pub const CHAP: u16 = 0xC223;
    /// IPCP
    pub const IPCP: u16 = 0x8021;
    /// P-CSCF IPv6 address request / response
    pub const P_CSCF_IPV6: u16 = 0x0001;
    /// DNS server IPv6 address request / response
    pub const DNS_SERVER_IPV6: u16 = 0x0003;
    /// IP address allocation via NAS signalling
    pub const IP_ADDRESS_ALLOCATION_VIA_NAS: u16 = 0x000A;
    /// P-CSCF IPv4 address request / response
    pub const P_CSCF_IPV4: u16 = 0x000C;
    /// DNS server IPv4 address request / response
    pub const DNS_SERVER_IPV4: u16 = 0x000D;
    /// IPv4 link MTU request / response
    pub const IPV4_LINK_MTU: u16 = 0x0010;
}

/// One protocol or container entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolOrContainer {
    /// Protocol or container identifier
    pub id: u16,
    /// Opaque contents, empty when the length octet is zero
    pub contents: OctetString,
}

impl ProtocolOrContainer {
    /// Create an entry
    pub fn new(id: u16, contents: impl Into<OctetString>) -> Self {
        Self {
            id,
            contents: contents.into(),
        }
    }
}

/// Protocol configuration options (Type 4, 1-251 content octets)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolConfigurationOptions {
    /// Configuration protocol (0 = PPP with IP PDP type)
    pub configuration_protocol: u8,
    /// Entries in wire order
    pub options: Vec<ProtocolOrContainer>,
}

impl ProtocolConfigurationOptions {
    const EXT: u8 = 0x80;
    const SPARE_MASK: u8 = 0x78;

    /// Find the first entry with `id`
    pub fn find(&self, id: u16) -> Option<&ProtocolOrContainer> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Decode the PCO value part (length already removed)
    pub fn decode_value<B: Buf>(content: &mut B) -> NasResult<Self> {
        check_content_len("PCO", content.remaining(), 1, usize::MAX)?;
        let header = content.get_u8();
        if header & Self::EXT == 0 {
            return Err(NasError::value("PCO extension bit not set"));
        }
        if header & Self::SPARE_MASK != 0 {
            return Err(NasError::value(format!(
                "PCO header 0x{header:02X} has spare bits set"
            )));
        }

        let mut options = Vec::new();
        while content.remaining() >= 3 {
            let id = content.get_u16();
            let len = content.get_u8() as usize;
            let contents = decode_bstring(content, len)?;
            options.push(ProtocolOrContainer { id, contents });
            check_list_len("PCO", options.len(), PCO_MAX_OPTIONS)?;
        }
        if content.has_remaining() {
            return Err(NasError::value(format!(
                "PCO ends with {} octets that form no entry",
                content.remaining()
            )));
        }

        Ok(Self {
            configuration_protocol: header & 0x07,
            options,
        })
    }

    fn value_len(&self) -> usize {
        1 + self
            .options
            .iter()
            .map(|o| 3 + o.contents.len())
            .sum::<usize>()
    }
}

impl NasDecode for ProtocolConfigurationOptions {
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        let mut content = read_lv(buf)?;
        Self::decode_value(&mut content)
    }
}

impl NasEncode for ProtocolConfigurationOptions {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()> {
        check_list_len("PCO", self.options.len(), PCO_MAX_OPTIONS)?;
        encode_lv_with(buf, |c| {
            c.put_u8(Self::EXT | (self.configuration_protocol & 0x07));
            for option in &self.options {
                if option.contents.len() > u8::MAX as usize {
                    return Err(NasError::OctetStringTooLongForIei {
                        len: option.contents.len(),
                        max: u8::MAX as usize,
                    });
                }
                c.put_u16(option.id);
                c.put_u8(option.contents.len() as u8);
                encode_bstring(c, &option.contents)?;
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

    #[test]
    fn test_pco_request_from_handset() {
        // IPCP config request, then an empty DNS server request.
        let data = [
            0x17, 0x80, 0x80, 0x21, 0x10, 0x01, 0x00, 0x00, 0x10, 0x81, 0x06, 0x00, 0x00, 0x00,
            0x00, 0x83, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0D, 0x00,
        ];
        let pco = ProtocolConfigurationOptions::nas_decode(&mut &data[..]).unwrap();
        assert_eq!(pco.configuration_protocol, 0);
        assert_eq!(pco.options.len(), 2);
        assert_eq!(pco.options[0].id, pco_id::IPCP);
        assert_eq!(pco.options[0].contents.len(), 16);
        assert!(pco.find(pco_id::DNS_SERVER_IPV4).unwrap().contents.is_empty());

        let mut out = Vec::new();
        pco.nas_encode(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(pco.encoded_len(), data.len());
    }

    #[test]
    fn test_pco_requires_ext_bit() {
        let data = [0x01, 0x00];
        assert!(matches!(
            ProtocolConfigurationOptions::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_pco_rejects_spare_bits() {
        let data = [0x01, 0x88];
        assert!(matches!(
            ProtocolConfigurationOptions::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_pco_entry_overruns_ie() {
        let data = [0x05, 0x80, 0x00, 0x0D, 0x04, 0x08];
        assert!(matches!(
            ProtocolConfigurationOptions::nas_decode(&mut &data[..]),
            Err(NasError::BufferTooShort {
                expected: 4,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_pco_rejects_dangling_octets() {
        let data = [0x03, 0x80, 0x00, 0x0D];
        assert!(matches!(
            ProtocolConfigurationOptions::nas_decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_pco_option_limit() {
        let mut data = vec![0x80];
        for _ in 0..=PCO_MAX_OPTIONS {
            data.extend_from_slice(&[0x00, 0x0D, 0x00]);
        }
        let mut framed = vec![data.len() as u8];
        framed.extend_from_slice(&data);
        assert!(matches!(
            ProtocolConfigurationOptions::nas_decode(&mut framed.as_slice()),
            Err(NasError::ListTooLong { max: 64, .. })
        ));
    }

    #[test]
    fn test_pco_encode_empty() {
        let pco = ProtocolConfigurationOptions::default();
        let mut out = Vec::new();
        pco.nas_encode(&mut out).unwrap();
        assert_eq!(out, vec![0x01, 0x80]);
    }
}
