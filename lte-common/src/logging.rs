//! Logging infrastructure for the NAS codec
//!
//! Configures `tracing` output and provides helpers for logging NAS PDUs
//! with hex payloads. Payload bytes only appear at trace level.

use std::fmt;
use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Trace level - includes payload hex dumps
    Trace,
    /// Debug level - one line per decoded or encoded message
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warn level - rejected peer input
    Warn,
    /// Error level
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("unknown log level: {s}")),
        }
    }
}

/// Initialize the tracing subscriber with the specified log level.
///
/// Call once at startup. `RUST_LOG` overrides the level when set.
///
/// # Example
///
/// ```no_run
/// use lte_common::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    init_logging_with_filter(&level.to_string());
}

/// Initialize logging with a custom filter string.
///
/// # Example
///
/// ```no_run
/// use lte_common::logging::init_logging_with_filter;
///
/// // Info everywhere, hex payloads for the codec crate
/// init_logging_with_filter("info,lte_nas=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // A subscriber may already be installed by the embedding process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .try_init();
}

/// Message direction relative to the codec's caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Received from the peer and decoded
    Rx,
    /// Encoded for transmission to the peer
    Tx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rx => write!(f, "RX"),
            Direction::Tx => write!(f, "TX"),
        }
    }
}

/// NAS sublayer a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NasLayer {
    /// EPS mobility management
    Emm,
    /// EPS session management
    Esm,
}

impl fmt::Display for NasLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NasLayer::Emm => write!(f, "EMM"),
            NasLayer::Esm => write!(f, "ESM"),
        }
    }
}

/// Log a NAS PDU at debug level, with the payload as hex at trace level.
///
/// The trace event carries the payload grouped in 4-octet words as its
/// `hex` field and a full offset/ASCII dump as its message.
///
/// # Example
///
/// ```
/// use lte_common::logging::{log_nas_message, Direction, NasLayer};
///
/// let pdu = [0x07, 0x43, 0x00, 0x00];
/// log_nas_message(NasLayer::Emm, Direction::Rx, "Attach Complete", &pdu);
/// ```
pub fn log_nas_message(layer: NasLayer, direction: Direction, msg_name: &str, data: &[u8]) {
    tracing::debug!(
        layer = %layer,
        direction = %direction,
        msg = msg_name,
        len = data.len(),
        "{} {} {}",
        direction,
        layer,
        msg_name
    );
    tracing::trace!(
        layer = %layer,
        hex = %format_hex_compact(data, 4),
        "{} payload\n{}",
        layer,
        format_hex_dump(data)
    );
}

/// Format bytes as offset, hex and ASCII columns, 16 bytes per line.
///
/// ```
/// use lte_common::logging::format_hex_dump;
///
/// let dump = format_hex_dump(&[0x07, 0x41, 0x72]);
/// assert!(dump.starts_with("00000000  07 41 72"));
/// ```
pub fn format_hex_dump(data: &[u8]) -> String {
    if data.is_empty() {
        return String::from("(empty)");
    }

    let mut lines = Vec::with_capacity(data.len().div_ceil(16));
    for (row, chunk) in data.chunks(16).enumerate() {
        let mut line = format!("{:08x}  ", row * 16);
        for i in 0..16 {
            if i == 8 {
                line.push(' ');
            }
            match chunk.get(i) {
                Some(byte) => line.push_str(&format!("{byte:02x} ")),
                None => line.push_str("   "),
            }
        }
        line.push_str(" |");
        line.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        line.push('|');
        lines.push(line);
    }
    lines.join("\n")
}

/// Format bytes as hex, optionally split into space-separated groups.
///
/// ```
/// use lte_common::logging::format_hex_compact;
///
/// assert_eq!(format_hex_compact(&[0x27, 0x80, 0x80, 0x21], 2), "2780 8021");
/// ```
pub fn format_hex_compact(data: &[u8], group_size: usize) -> String {
    if group_size == 0 {
        return hex::encode(data);
    }

    data.chunks(group_size)
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(" ")
}
