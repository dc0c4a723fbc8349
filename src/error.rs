//! # Error Types
//!
//! Custom error types for bitframe using `thiserror`.

use thiserror::Error;

/// Main error type for bitframe
#[derive(Debug, Error)]
pub enum FrameError {
    /// An address does not fit in the configured port width
    #[error("{field} address {value} does not fit in {width} bits")]
    AddressOutOfRange {
        field: &'static str,
        value: u64,
        width: u32,
    },

    /// The payload does not fit in the configured data width
    #[error("data value {value} does not fit in {width} bits")]
    DataOutOfRange { value: u64, width: u32 },

    /// A zero-valued header has no bit length to section
    #[error("cannot checksum a zero-valued header")]
    DegenerateHeader,

    /// Frame layout cannot be packed
    #[error("invalid frame layout: {0}")]
    InvalidLayout(String),

    /// Link timing cannot be derived
    #[error("invalid link timing: {0}")]
    InvalidTiming(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bitframe
pub type Result<T> = std::result::Result<T, FrameError>;
