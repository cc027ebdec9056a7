//! Codec configuration
//!
//! [`CodecConfig`] is read from YAML by the process embedding the codec and
//! handed to the NAS facade. Every field has a default, so an empty document
//! is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Largest PDU a single NAS message may occupy on S1-AP.
pub const DEFAULT_MAX_PDU_LEN: usize = 65_535;

/// Configuration for the NAS codec facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reject PDUs longer than this many octets before decoding
    pub max_pdu_len: usize,
    /// Emit trace-level hex dumps of every decoded and encoded PDU
    pub log_payloads: bool,
    /// Decode the plain message inside integrity-protected (not ciphered) PDUs
    pub allow_integrity_protected: bool,
    /// Fail when octets remain after the message body
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_pdu_len: DEFAULT_MAX_PDU_LEN,
            log_payloads: false,
            allow_integrity_protected: true,
            reject_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    /// Parses a configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use lte_common::CodecConfig;
    ///
    /// let config = CodecConfig::from_yaml("max_pdu_len: 1500\nlog_payloads: true\n").unwrap();
    /// assert_eq!(config.max_pdu_len, 1500);
    /// assert!(config.allow_integrity_protected);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        // Header plus message type is the shortest EMM PDU.
        if self.max_pdu_len < 2 {
            return Err(Error::Config(format!(
                "max_pdu_len must be at least 2, got {}",
                self.max_pdu_len
            )));
        }
        Ok(())
    }
}
