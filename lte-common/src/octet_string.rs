//! Owned octet string for opaque IE payloads
//!
//! PCO option contents, NAS message containers, classmark 3 and similar
//! fields are carried as an [`OctetString`] owned by the IE value that holds
//! them.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A variable-length sequence of octets.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OctetString {
    data: Vec<u8>,
}

impl OctetString {
    /// Creates a new empty `OctetString`.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an `OctetString` taking ownership of `data`.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Creates an `OctetString` by copying a byte slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Parses a hex string, ignoring whitespace.
    ///
    /// Returns `None` if the string is not valid hex.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let compact: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();
        hex::decode(compact).ok().map(Self::from_vec)
    }

    /// Creates an `OctetString` holding the bytes of an ASCII/UTF-8 string.
    pub fn from_ascii(text: &str) -> Self {
        Self::from_slice(text.as_bytes())
    }

    /// Appends raw bytes.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Returns the underlying bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the string and returns the bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Formats the contents as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

impl Deref for OctetString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[u8]> for OctetString {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl<const N: usize> From<[u8; N]> for OctetString {
    fn from(data: [u8; N]) -> Self {
        Self::from_slice(&data)
    }
}

impl fmt::Debug for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OctetString({})", self.to_hex())
    }
}

impl fmt::Display for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
