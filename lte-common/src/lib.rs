//! Common types and utilities for the LTE NAS codec
//!
//! This crate provides the pieces shared by the codec crate and the test
//! harness: PLMN and BCD digit helpers, the owned octet string used for opaque
//! IE payloads, logging setup, codec configuration and the RouterOS API
//! word length prefix used by captured management sessions.

pub mod config;
pub mod error;
pub mod length_prefix;
pub mod logging;
pub mod octet_string;
pub mod types;

pub use config::CodecConfig;
pub use error::Error;
pub use length_prefix::{compute_length, read_length, WordLength};
pub use logging::{
    format_hex_compact, format_hex_dump, init_logging, init_logging_with_filter,
    log_nas_message, Direction, LogLevel, NasLayer,
};
pub use octet_string::OctetString;
pub use types::{bcd_decode, bcd_encode, Plmn};
