//! NAS TLV codec primitives
//!
//! This module holds the pieces every IE and message codec is built from:
//! - [`NasError`], the error taxonomy shared by all codecs, with the legacy
//!   negative integer kinds available through [`NasError::code`]
//! - guards that validate lengths, IEIs and message types before any read
//! - bounds-checked fixed-width readers over any [`Buf`]
//! - LV / LV-E helpers that write the length octet after the content is built
//! - the [`NasEncode`] / [`NasDecode`] traits implemented by variable IEs and
//!   the [`InformationElement1`] trait implemented by half-octet IEs
//!
//! # IE formats (3GPP TS 24.007 Section 11.2)
//!
//! | Format | Layout                      |
//! |--------|-----------------------------|
//! | V      | value only, fixed length    |
//! | TV     | IEI + value                 |
//! | LV     | 1-octet length + value      |
//! | TLV    | IEI + 1-octet length + value|
//! | LV-E   | 2-octet length + value      |
//! | TLV-E  | IEI + 2-octet length + value|
//!
//! `NasDecode` reads the IE *without* its IEI; message codecs consume the IEI
//! before dispatching.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use lte_common::OctetString;
use thiserror::Error;

/// Codec error kinds.
///
/// Every decode or encode failure is returned through the call's own result;
/// no error state is kept between calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NasError {
    /// Empty PDU handed to a message entry point
    #[error("Buffer is empty")]
    BufferNull,

    /// Declared or required length exceeds the available bytes
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Protocol discriminator is not the one this codec handles
    #[error("Protocol discriminator not supported: 0x{0:X}")]
    ProtocolNotSupported(u8),

    /// Message type octet does not name the expected (or any known) message
    #[error("Wrong message type: 0x{0:02X}")]
    WrongMessageType(u8),

    /// Content too long for its length field
    #[error("Octet string too long for IEI: {len} bytes, maximum {max}")]
    OctetStringTooLongForIei {
        /// Content length
        len: usize,
        /// Largest length the field can express
        max: usize,
    },

    /// Decoded value violates a structural rule
    #[error("Value doesn't match: {0}")]
    ValueDoesntMatch(String),

    /// A mandatory IE is missing or truncated
    #[error("Mandatory field not present: expected at least {expected} bytes, got {actual}")]
    MandatoryFieldNotPresent {
        /// Bytes required by the mandatory IEs
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// IEI does not match the expected tag or any known optional IE
    #[error("Unexpected IEI 0x{actual:02X}")]
    UnexpectedIei {
        /// Tag required at this position, if one was fixed
        expected: Option<u8>,
        /// Tag found on the wire
        actual: u8,
    },

    /// Message authentication code check failed
    #[error("MAC mismatch")]
    MacMismatch,

    /// Codec path that must never be taken
    #[error("Fatal: {0} codec is not implemented")]
    Fatal(&'static str),

    /// Wire data announces more list elements than the codec accepts
    #[error("List {list} exceeds {max} elements")]
    ListTooLong {
        /// Name of the list
        list: &'static str,
        /// Largest accepted element count
        max: usize,
    },
}

impl NasError {
    /// Legacy negative error kind, as returned by C callers of the codec.
    pub fn code(&self) -> i32 {
        match self {
            NasError::BufferNull => -1,
            NasError::BufferTooShort { .. } | NasError::ListTooLong { .. } => -2,
            NasError::ProtocolNotSupported(_) => -3,
            NasError::WrongMessageType(_) => -4,
            NasError::OctetStringTooLongForIei { .. } => -5,
            NasError::ValueDoesntMatch(_) => -6,
            NasError::MandatoryFieldNotPresent { .. } => -7,
            NasError::UnexpectedIei { .. } => -8,
            NasError::MacMismatch => -9,
            NasError::Fatal(_) => -10,
        }
    }

    /// Shorthand for a [`NasError::ValueDoesntMatch`] with a formatted reason.
    pub fn value(reason: impl Into<String>) -> Self {
        NasError::ValueDoesntMatch(reason.into())
    }
}

/// Result type for codec operations
pub type NasResult<T> = Result<T, NasError>;

// ============================================================================
// Traits
// ============================================================================

/// Encode an IE in its V, LV or LV-E form (without IEI)
pub trait NasEncode {
    /// Append the encoded IE to `buf`
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> NasResult<()>;

    /// Number of octets `nas_encode` writes, including any length octets
    fn encoded_len(&self) -> usize;
}

/// Decode an IE in its V, LV or LV-E form (without IEI)
pub trait NasDecode: Sized {
    /// Read the IE from the front of `buf`
    fn nas_decode<B: Buf>(buf: &mut B) -> NasResult<Self>;
}

/// Half-octet (Type 1) IE carried in one nibble
pub trait InformationElement1: Sized {
    /// Decode from the low 4 bits of `value`
    fn decode(value: u8) -> NasResult<Self>;

    /// Encode to a value in the low 4 bits
    fn encode(&self) -> u8;
}

// ============================================================================
// Guards
// ============================================================================

/// Fail with `BufferNull` on an empty PDU.
pub fn check_not_empty(data: &[u8]) -> NasResult<()> {
    if data.is_empty() {
        return Err(NasError::BufferNull);
    }
    Ok(())
}

/// Fail with `BufferTooShort` unless `min` bytes remain.
#[inline]
pub fn check_length<B: Buf>(buf: &B, min: usize) -> NasResult<()> {
    if buf.remaining() < min {
        return Err(NasError::BufferTooShort {
            expected: min,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

/// Fail with `MandatoryFieldNotPresent` unless `min` bytes remain.
#[inline]
pub fn check_mandatory_length<B: Buf>(buf: &B, min: usize) -> NasResult<()> {
    if buf.remaining() < min {
        return Err(NasError::MandatoryFieldNotPresent {
            expected: min,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

/// Fail with `UnexpectedIei` if `actual` differs from `expected`.
#[inline]
pub fn check_iei(expected: u8, actual: u8) -> NasResult<()> {
    if expected != actual {
        return Err(NasError::UnexpectedIei {
            expected: Some(expected),
            actual,
        });
    }
    Ok(())
}

/// Fail with `BufferTooShort` if a read length exceeds what remains.
#[inline]
pub fn check_ielen(ielen: usize, remaining: usize) -> NasResult<()> {
    if ielen > remaining {
        return Err(NasError::BufferTooShort {
            expected: ielen,
            actual: remaining,
        });
    }
    Ok(())
}

/// Fail with `WrongMessageType` if `actual` differs from `expected`.
#[inline]
pub fn check_message_type(expected: u8, actual: u8) -> NasResult<()> {
    if expected != actual {
        return Err(NasError::WrongMessageType(actual));
    }
    Ok(())
}

/// Check an IE content length against its allowed range.
///
/// Too little content is `BufferTooShort`; too much is `ValueDoesntMatch`.
pub fn check_content_len(ie: &str, len: usize, min: usize, max: usize) -> NasResult<()> {
    if len < min {
        return Err(NasError::BufferTooShort {
            expected: min,
            actual: len,
        });
    }
    if len > max {
        return Err(NasError::value(format!(
            "{ie} length {len} exceeds maximum {max}"
        )));
    }
    Ok(())
}

/// Fail with `ListTooLong` once a list grows past `max` elements.
#[inline]
pub fn check_list_len(list: &'static str, len: usize, max: usize) -> NasResult<()> {
    if len > max {
        tracing::warn!(list, len, max, "list bound exceeded");
        return Err(NasError::ListTooLong { list, max });
    }
    Ok(())
}

/// Fail with `BufferTooShort` unless the destination can take `needed` bytes.
#[inline]
pub fn check_capacity<B: BufMut>(buf: &B, needed: usize) -> NasResult<()> {
    if buf.remaining_mut() < needed {
        return Err(NasError::BufferTooShort {
            expected: needed,
            actual: buf.remaining_mut(),
        });
    }
    Ok(())
}

// ============================================================================
// Fixed-width readers
// ============================================================================

/// Read one octet.
#[inline]
pub fn read_u8<B: Buf>(buf: &mut B) -> NasResult<u8> {
    check_length(buf, 1)?;
    Ok(buf.get_u8())
}

/// Read a big-endian u16.
#[inline]
pub fn read_u16<B: Buf>(buf: &mut B) -> NasResult<u16> {
    check_length(buf, 2)?;
    Ok(buf.get_u16())
}

/// Read a big-endian 24-bit value.
#[inline]
pub fn read_u24<B: Buf>(buf: &mut B) -> NasResult<u32> {
    check_length(buf, 3)?;
    Ok(get_u24(buf))
}

/// Read a big-endian u32.
#[inline]
pub fn read_u32<B: Buf>(buf: &mut B) -> NasResult<u32> {
    check_length(buf, 4)?;
    Ok(buf.get_u32())
}

/// Read exactly `N` octets.
pub fn read_array<B: Buf, const N: usize>(buf: &mut B) -> NasResult<[u8; N]> {
    check_length(buf, N)?;
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

/// Read `n` octets into an owned buffer.
pub fn read_bytes<B: Buf>(buf: &mut B, n: usize) -> NasResult<Bytes> {
    check_length(buf, n)?;
    Ok(buf.copy_to_bytes(n))
}

/// Unchecked 24-bit read; callers validate the length first.
#[inline]
pub fn get_u24<B: Buf>(buf: &mut B) -> u32 {
    let hi = buf.get_u8() as u32;
    let lo = buf.get_u16() as u32;
    (hi << 16) | lo
}

/// Write the low 24 bits of `value` big-endian.
#[inline]
pub fn put_u24<B: BufMut>(buf: &mut B, value: u32) {
    buf.put_u8((value >> 16) as u8);
    buf.put_u16(value as u16);
}

// ============================================================================
// Octet strings
// ============================================================================

/// Read `content_len` octets into a new owned octet string.
pub fn decode_bstring<B: Buf>(buf: &mut B, content_len: usize) -> NasResult<OctetString> {
    check_ielen(content_len, buf.remaining())?;
    let mut data = vec![0u8; content_len];
    buf.copy_to_slice(&mut data);
    Ok(OctetString::from_vec(data))
}

/// Copy an octet string verbatim, returning the number of bytes written.
///
/// An empty string writes nothing and succeeds.
pub fn encode_bstring<B: BufMut>(buf: &mut B, value: &OctetString) -> NasResult<usize> {
    check_capacity(buf, value.len())?;
    buf.put_slice(value.data());
    Ok(value.len())
}

// ============================================================================
// LV / LV-E framing
// ============================================================================

/// Read a 1-octet length and return the content it announces.
pub fn read_lv<B: Buf>(buf: &mut B) -> NasResult<Bytes> {
    let len = read_u8(buf)? as usize;
    read_bytes(buf, len)
}

/// Read a 2-octet length and return the content it announces.
pub fn read_lv_e<B: Buf>(buf: &mut B) -> NasResult<Bytes> {
    let len = read_u16(buf)? as usize;
    read_bytes(buf, len)
}

/// Write a 1-octet length followed by `content`.
pub fn write_lv<B: BufMut>(buf: &mut B, content: &[u8]) -> NasResult<()> {
    if content.len() > u8::MAX as usize {
        return Err(NasError::OctetStringTooLongForIei {
            len: content.len(),
            max: u8::MAX as usize,
        });
    }
    check_capacity(buf, content.len() + 1)?;
    buf.put_u8(content.len() as u8);
    buf.put_slice(content);
    Ok(())
}

/// Write a 2-octet length followed by `content`.
pub fn write_lv_e<B: BufMut>(buf: &mut B, content: &[u8]) -> NasResult<()> {
    if content.len() > u16::MAX as usize {
        return Err(NasError::OctetStringTooLongForIei {
            len: content.len(),
            max: u16::MAX as usize,
        });
    }
    check_capacity(buf, content.len() + 2)?;
    buf.put_u16(content.len() as u16);
    buf.put_slice(content);
    Ok(())
}

/// Build content with `f`, then write it behind a 1-octet length.
pub fn encode_lv_with<B, F>(buf: &mut B, f: F) -> NasResult<()>
where
    B: BufMut,
    F: FnOnce(&mut BytesMut) -> NasResult<()>,
{
    let mut content = BytesMut::new();
    f(&mut content)?;
    write_lv(buf, &content)
}

/// Build content with `f`, then write it behind a 2-octet length.
pub fn encode_lv_e_with<B, F>(buf: &mut B, f: F) -> NasResult<()>
where
    B: BufMut,
    F: FnOnce(&mut BytesMut) -> NasResult<()>,
{
    let mut content = BytesMut::new();
    f(&mut content)?;
    write_lv_e(buf, &content)
}

// ============================================================================
// Optional IE helpers
// ============================================================================

/// Look at the next octet without consuming it.
#[inline]
pub fn peek_u8<B: Buf>(buf: &B) -> Option<u8> {
    if buf.has_remaining() {
        buf.chunk().first().copied()
    } else {
        None
    }
}

/// Reduce a tag to its dispatch key.
///
/// Tags of 0x80 and above belong to half-octet IEs whose value sits in the
/// low nibble, so only the high nibble identifies them.
#[inline]
pub fn normalize_iei(iei: u8) -> u8 {
    if iei >= 0x80 {
        iei & 0xF0
    } else {
        iei
    }
}

/// Write a TLV / TLV-E / TV IE: the IEI followed by the IE's own encoding.
pub fn encode_with_iei<B: BufMut, T: NasEncode>(buf: &mut B, iei: u8, ie: &T) -> NasResult<()> {
    check_capacity(buf, 1)?;
    buf.put_u8(iei);
    ie.nas_encode(buf)
}

/// Read an IE that must start with `iei`, the mirror of [`encode_with_iei`].
///
/// Half-octet tags are compared by their high nibble.
pub fn decode_tagged<B: Buf, T: NasDecode>(buf: &mut B, iei: u8) -> NasResult<T> {
    let tag = read_u8(buf)?;
    check_iei(normalize_iei(iei), normalize_iei(tag))?;
    T::nas_decode(buf)
}

/// Write an optional IE if present.
pub fn encode_optional<B: BufMut, T: NasEncode>(
    buf: &mut B,
    iei: u8,
    ie: &Option<T>,
) -> NasResult<()> {
    match ie {
        Some(ie) => encode_with_iei(buf, iei, ie),
        None => Ok(()),
    }
}

/// Write an optional half-octet IE as `IEI nibble | value`.
pub fn encode_optional_ie1<B: BufMut, T: InformationElement1>(
    buf: &mut B,
    iei: u8,
    ie: &Option<T>,
) -> NasResult<()> {
    if let Some(ie) = ie {
        check_capacity(buf, 1)?;
        buf.put_u8((iei & 0xF0) | (ie.encode() & 0x0F));
    }
    Ok(())
}

/// Fail with `ValueDoesntMatch` if a content buffer was not fully consumed.
pub fn expect_consumed<B: Buf>(ie: &str, content: &B) -> NasResult<()> {
    if content.has_remaining() {
        return Err(NasError::value(format!(
            "{ie}: {} trailing octets",
            content.remaining()
        )));
    }
    Ok(())
}
