//! Error types shared by the LTE NAS crates

use thiserror::Error;

/// Error type for configuration loading and non-codec failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Malformed RouterOS API word length prefix.
    #[error("Length prefix error: {0}")]
    LengthPrefix(String),

    /// A codec failure surfaced through a non-codec API.
    #[error("Codec error: {0}")]
    Codec(String),
}
