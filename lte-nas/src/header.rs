//! NAS message header structures
//!
//! Implements the EPS NAS headers of 3GPP TS 24.301 Section 9.
//!
//! ## Plain EMM header (2 bytes)
//! ```text
//! +---------------------------+------------------+
//! | Security hdr | Protocol   |   Message Type   |
//! | type (4 bits)| discr. (4) |    (1 byte)      |
//! +---------------------------+------------------+
//! ```
//!
//! ## Plain ESM header (3 bytes)
//! ```text
//! +---------------------------+------------------+------------------+
//! | EPS bearer   | Protocol   |       PTI        |   Message Type   |
//! | id (4 bits)  | discr. (4) |    (1 byte)      |    (1 byte)      |
//! +---------------------------+------------------+------------------+
//! ```
//!
//! ## Security protected header (6 bytes)
//! ```text
//! +---------------------------+-------------------------+-----------------+
//! | Security hdr | Protocol   | Message authentication  | Sequence number |
//! | type (4 bits)| discr. (4) |     code (4 bytes)      |    (1 byte)     |
//! +---------------------------+-------------------------+-----------------+
//! ```
//! followed by a complete plain NAS message.

use bytes::{Buf, BufMut};

use crate::codec::{check_length, NasError, NasResult};
use crate::enums::{EmmMessageType, EsmMessageType, ProtocolDiscriminator, SecurityHeaderType};

/// Split the first octet into (high nibble, protocol discriminator nibble).
#[inline]
fn split_first_octet(octet: u8) -> (u8, u8) {
    (octet >> 4, octet & 0x0F)
}

/// Read and validate the protocol discriminator.
pub fn decode_protocol_discriminator(octet: u8) -> NasResult<ProtocolDiscriminator> {
    let pd = octet & 0x0F;
    ProtocolDiscriminator::try_from(pd).map_err(|_| NasError::ProtocolNotSupported(pd))
}

/// Protocol discriminators are carried inside the header octet, never as a
/// standalone IE.
pub fn encode_protocol_discriminator<B: BufMut>(
    _pd: ProtocolDiscriminator,
    _buf: &mut B,
) -> NasResult<()> {
    Err(NasError::Fatal("protocol discriminator"))
}

fn expect_pd(octet: u8, expected: ProtocolDiscriminator) -> NasResult<()> {
    let (_, pd) = split_first_octet(octet);
    if pd != u8::from(expected) {
        return Err(NasError::ProtocolNotSupported(pd));
    }
    Ok(())
}

/// Plain EMM message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmmHeader {
    /// Security header type (NotProtected for plain messages)
    pub security_header_type: SecurityHeaderType,
    /// Message type
    pub message_type: EmmMessageType,
}

impl EmmHeader {
    /// Size of the plain EMM header in bytes
    pub const SIZE: usize = 2;

    /// Create a plain header for `message_type`
    pub fn new(message_type: EmmMessageType) -> Self {
        Self {
            security_header_type: SecurityHeaderType::NotProtected,
            message_type,
        }
    }

    /// Decode a plain EMM header
    pub fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, Self::SIZE)?;

        let first = buf.get_u8();
        expect_pd(first, ProtocolDiscriminator::EpsMobilityManagement)?;
        let (sht, _) = split_first_octet(first);
        let security_header_type = SecurityHeaderType::try_from(sht)
            .map_err(|_| NasError::value(format!("security header type 0x{sht:X}")))?;

        let mt = buf.get_u8();
        let message_type =
            EmmMessageType::try_from(mt).map_err(|_| NasError::WrongMessageType(mt))?;

        Ok(Self {
            security_header_type,
            message_type,
        })
    }

    /// Encode the header
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(
            (u8::from(self.security_header_type) << 4)
                | u8::from(ProtocolDiscriminator::EpsMobilityManagement),
        );
        buf.put_u8(self.message_type.into());
    }
}

/// Plain ESM message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EsmHeader {
    /// EPS bearer identity (0 when no bearer is assigned)
    pub eps_bearer_identity: u8,
    /// Procedure transaction identity
    pub pti: u8,
    /// Message type
    pub message_type: EsmMessageType,
}

impl EsmHeader {
    /// Size of the plain ESM header in bytes
    pub const SIZE: usize = 3;

    /// Create a header
    pub fn new(eps_bearer_identity: u8, pti: u8, message_type: EsmMessageType) -> Self {
        Self {
            eps_bearer_identity,
            pti,
            message_type,
        }
    }

    /// Decode a plain ESM header
    pub fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, Self::SIZE)?;

        let first = buf.get_u8();
        expect_pd(first, ProtocolDiscriminator::EpsSessionManagement)?;
        let (eps_bearer_identity, _) = split_first_octet(first);
        let pti = buf.get_u8();
        let mt = buf.get_u8();
        let message_type =
            EsmMessageType::try_from(mt).map_err(|_| NasError::WrongMessageType(mt))?;

        Ok(Self {
            eps_bearer_identity,
            pti,
            message_type,
        })
    }

    /// Encode the header
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(
            ((self.eps_bearer_identity & 0x0F) << 4)
                | u8::from(ProtocolDiscriminator::EpsSessionManagement),
        );
        buf.put_u8(self.pti);
        buf.put_u8(self.message_type.into());
    }
}

/// Security protected NAS message header
///
/// The MAC is carried as received; verifying it needs the NAS security
/// context and happens outside the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityProtectedHeader {
    /// Security header type (1-4)
    pub security_header_type: SecurityHeaderType,
    /// Message authentication code
    pub mac: u32,
    /// NAS sequence number
    pub sequence_number: u8,
}

impl SecurityProtectedHeader {
    /// Size of the security protected header in bytes
    pub const SIZE: usize = 6;

    /// Decode a security protected header
    pub fn decode<B: Buf>(buf: &mut B) -> NasResult<Self> {
        check_length(buf, Self::SIZE)?;

        let first = buf.get_u8();
        expect_pd(first, ProtocolDiscriminator::EpsMobilityManagement)?;
        let (sht, _) = split_first_octet(first);
        let security_header_type = match SecurityHeaderType::try_from(sht) {
            Ok(t) if t.is_protected() && t != SecurityHeaderType::ServiceRequest => t,
            _ => {
                return Err(NasError::value(format!(
                    "security header type 0x{sht:X} is not a protected header"
                )))
            }
        };

        Ok(Self {
            security_header_type,
            mac: buf.get_u32(),
            sequence_number: buf.get_u8(),
        })
    }

    /// Encode the header
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(
            (u8::from(self.security_header_type) << 4)
                | u8::from(ProtocolDiscriminator::EpsMobilityManagement),
        );
        buf.put_u32(self.mac);
        buf.put_u8(self.sequence_number);
    }
}

/// Peek the protocol discriminator and security header type of a PDU.
pub fn peek_first_octet(data: &[u8]) -> NasResult<(ProtocolDiscriminator, u8)> {
    let first = *data.first().ok_or(NasError::BufferNull)?;
    let pd = decode_protocol_discriminator(first)?;
    Ok((pd, first >> 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emm_header_encode_decode() {
        let header = EmmHeader::new(EmmMessageType::AttachRequest);
        let mut buf = Vec::new();
        header.encode(&mut buf);
        assert_eq!(buf, vec![0x07, 0x41]);

        let decoded = EmmHeader::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_emm_header_rejects_esm_pd() {
        let data = [0x02, 0x41];
        assert_eq!(
            EmmHeader::decode(&mut &data[..]),
            Err(NasError::ProtocolNotSupported(0x2))
        );
    }

    #[test]
    fn test_emm_header_unknown_message_type() {
        let data = [0x07, 0x47];
        assert_eq!(
            EmmHeader::decode(&mut &data[..]),
            Err(NasError::WrongMessageType(0x47))
        );
    }

    #[test]
    fn test_esm_header_encode_decode() {
        let header = EsmHeader::new(5, 1, EsmMessageType::ActivateDefaultEpsBearerContextRequest);
        let mut buf = Vec::new();
        header.encode(&mut buf);
        assert_eq!(buf, vec![0x52, 0x01, 0xC1]);
        assert_eq!(EsmHeader::decode(&mut buf.as_slice()).unwrap(), header);
    }

    #[test]
    fn test_esm_header_truncated() {
        let data = [0x02, 0x01];
        assert!(matches!(
            EsmHeader::decode(&mut &data[..]),
            Err(NasError::BufferTooShort {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_security_protected_header() {
        let data = [0x27, 0xDE, 0xAD, 0xBE, 0xEF, 0x05, 0x07, 0x43];
        let mut buf = &data[..];
        let header = SecurityProtectedHeader::decode(&mut buf).unwrap();
        assert_eq!(
            header.security_header_type,
            SecurityHeaderType::IntegrityProtectedAndCiphered
        );
        assert_eq!(header.mac, 0xDEADBEEF);
        assert_eq!(header.sequence_number, 5);
        assert_eq!(buf, &[0x07, 0x43]);

        let mut out = Vec::new();
        header.encode(&mut out);
        assert_eq!(out, &data[..6]);
    }

    #[test]
    fn test_security_protected_header_rejects_plain() {
        let data = [0x07, 0, 0, 0, 0, 0];
        assert!(matches!(
            SecurityProtectedHeader::decode(&mut &data[..]),
            Err(NasError::ValueDoesntMatch(_))
        ));
    }

    #[test]
    fn test_protocol_discriminator_is_fatal_stub() {
        let mut buf = Vec::new();
        assert_eq!(
            encode_protocol_discriminator(ProtocolDiscriminator::EpsMobilityManagement, &mut buf),
            Err(NasError::Fatal("protocol discriminator"))
        );
        assert_eq!(
            decode_protocol_discriminator(0x0B),
            Err(NasError::ProtocolNotSupported(0x0B))
        );
    }

    #[test]
    fn test_peek_first_octet() {
        assert_eq!(
            peek_first_octet(&[0xC7, 0x00]).unwrap(),
            (ProtocolDiscriminator::EpsMobilityManagement, 0xC)
        );
        assert_eq!(peek_first_octet(&[]), Err(NasError::BufferNull));
    }
}
