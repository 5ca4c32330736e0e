//! AMXD Format - Core primitives for `.amxd` device containers
//!
//! An `.amxd` file is a flat sequence of TLV chunks. This crate provides the
//! encoding/decoding utilities for that container with no I/O dependencies:
//!
//! - Chunk tags and constants
//! - Chunk header codec and a lazy chunk scanner
//! - Device descriptors carried by the `ampf` chunk
//! - Patcher JSON payload handling for the `ptch` chunk
//! - Container assembly and chunk dispatch
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod chunk;
pub mod constants;
pub mod container;
pub mod device;
pub mod error;
pub mod patcher;

// Re-export commonly used types
pub use chunk::{Chunk, ChunkHeader, ChunkScanner, ChunkTag, Truncation};
pub use container::{assemble, unwrap_container, Dispatched, PatcherExtractor, Unwrapped};
pub use device::{DeviceCode, DeviceType};
pub use error::{AmxdError, Result};
pub use patcher::PrettyStyle;
