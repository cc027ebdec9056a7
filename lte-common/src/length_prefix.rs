//! RouterOS API word length prefix
//!
//! Each word on a RouterOS API channel is preceded by its length, packed in
//! one to five octets. The count of leading one bits in the first octet tells
//! how many further octets follow:
//!
//! ```text
//! 0xxxxxxx                             < 0x80
//! 10xxxxxx xxxxxxxx                    < 0x4000
//! 110xxxxx xxxxxxxx xxxxxxxx           < 0x20_0000
//! 1110xxxx xxxxxxxx xxxxxxxx xxxxxxxx  < 0x1000_0000
//! 11110000 xxxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx
//! ```

use crate::error::Error;

/// Decoded word length prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordLength {
    /// Number of content octets that follow the prefix
    pub content_length: u32,
    /// Number of octets the prefix itself occupies (1-5)
    pub length_size: usize,
}

/// Encodes `len` using the fewest prefix octets.
pub fn compute_length(len: u32) -> Vec<u8> {
    match len {
        0..=0x7F => vec![len as u8],
        0x80..=0x3FFF => ((len | 0x8000) as u16).to_be_bytes().to_vec(),
        0x4000..=0x1F_FFFF => (len | 0xC0_0000).to_be_bytes()[1..].to_vec(),
        0x20_0000..=0x0FFF_FFFF => (len | 0xE000_0000).to_be_bytes().to_vec(),
        _ => {
            let mut out = Vec::with_capacity(5);
            out.push(0xF0);
            out.extend_from_slice(&len.to_be_bytes());
            out
        }
    }
}

/// Reads a length prefix from the start of `buf`.
///
/// Fails if `buf` is shorter than the prefix announced by its first octet or
/// if the first octet is a control byte (`0xF1..=0xFF`).
pub fn read_length(buf: &[u8]) -> Result<WordLength, Error> {
    let first = *buf
        .first()
        .ok_or_else(|| Error::LengthPrefix("empty buffer".into()))?;

    let (length_size, mask) = match first {
        b if b & 0x80 == 0x00 => (1, 0x7F),
        b if b & 0xC0 == 0x80 => (2, 0x3F),
        b if b & 0xE0 == 0xC0 => (3, 0x1F),
        b if b & 0xF0 == 0xE0 => (4, 0x0F),
        0xF0 => (5, 0x00),
        b => return Err(Error::LengthPrefix(format!("control byte 0x{b:02X}"))),
    };

    if buf.len() < length_size {
        return Err(Error::LengthPrefix(format!(
            "need {length_size} octets, have {}",
            buf.len()
        )));
    }

    let content_length = buf[1..length_size]
        .iter()
        .fold(u32::from(first & mask), |acc, &b| (acc << 8) | u32::from(b));

    Ok(WordLength {
        content_length,
        length_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: [(u32, usize); 13] = [
        (0, 1),
        (1, 1),
        (2, 1),
        (0x7F, 1),
        (0x80, 2),
        (0x81, 2),
        (0x3FFF, 2),
        (0x4000, 3),
        (0x1F_FFFF, 3),
        (0x20_0000, 4),
        (0x0FFF_FFFF, 4),
        (0x1000_0000, 5),
        (0xFFFF_FFFF, 5),
    ];

    #[test]
    fn test_length_round_trip_at_boundaries() {
        for (len, size) in BOUNDARIES {
            let encoded = compute_length(len);
            assert_eq!(encoded.len(), size, "prefix size for 0x{len:X}");
            assert_eq!(
                read_length(&encoded).unwrap(),
                WordLength {
                    content_length: len,
                    length_size: size
                },
                "round trip for 0x{len:X}"
            );
        }
    }

    #[test]
    fn test_compute_length_literal_bytes() {
        assert_eq!(compute_length(0x80), vec![0x80, 0x80]);
        assert_eq!(compute_length(0x3FFF), vec![0xBF, 0xFF]);
        assert_eq!(compute_length(0x4000), vec![0xC0, 0x40, 0x00]);
        assert_eq!(compute_length(0x20_0000), vec![0xE0, 0x20, 0x00, 0x00]);
        assert_eq!(compute_length(0xFFFF_FFFF), vec![0xF0, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_read_length_ignores_trailing_content() {
        let wl = read_length(&[0x05, b'/', b'l', b'o', b'g', b'i']).unwrap();
        assert_eq!(wl.content_length, 5);
        assert_eq!(wl.length_size, 1);
    }

    #[test]
    fn test_read_length_rejects_truncated_and_control() {
        assert!(read_length(&[]).is_err());
        assert!(read_length(&[0xC0, 0x40]).is_err());
        assert!(read_length(&[0xF0, 0x00, 0x00]).is_err());
        assert!(read_length(&[0xF8]).is_err());
    }
}
