//! Error types for AMXD containers

use thiserror::Error;

use crate::chunk::ChunkTag;

/// AMXD error types
#[derive(Debug, Error)]
pub enum AmxdError {
    /// A chunk the conversion depends on never appeared in the container.
    #[error("no {0} chunk found in .amxd file")]
    MissingChunk(ChunkTag),
    /// Encountered unexpected end of input while decoding a fixed-size field.
    #[error("Unexpected end of input")]
    UnexpectedEof,
    /// Device code is not exactly four ASCII bytes.
    #[error("Invalid device type code '{0}': expected 4 ASCII characters or a device name")]
    InvalidDeviceCode(String),
    /// Payload does not fit the 32-bit chunk length field.
    #[error("Payload too large: {0} bytes exceeds the 32-bit chunk length")]
    PayloadTooLarge(usize),
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AmxdError>;
