//! AMXD I/O - File-level conversion APIs
//!
//! This crate wires the `amxd-format` codec to the filesystem:
//!
//! - `execute_unwrap`: container file -> pretty-printed patcher JSON
//! - `execute_wrap`: JSON file -> container file
//! - `inspect`: chunk listing for a container file
//!
//! Inputs are read fully into memory. File outputs go through a temporary
//! file that is renamed into place, so a failed conversion never leaves a
//! partially written destination.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod inspect;
pub mod output;

// Re-export commonly used types
pub use amxd_format::{AmxdError, DeviceCode, DeviceType, PrettyStyle, Result, Truncation};
pub use inspect::{inspect, inspect_bytes, ChunkInfo, Inspection};
pub use output::OutputSink;

use amxd_format::constants::CONTAINER_OVERHEAD;
use amxd_format::patcher::to_pretty_string;
use amxd_format::{assemble, ChunkScanner, Dispatched, PatcherExtractor};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Unwrap options
#[derive(Debug, Clone, Default)]
pub struct UnwrapOptions {
    /// Formatting of the extracted JSON
    pub style: PrettyStyle,
}

/// Wrap options
#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    /// Code written into the `ampf` chunk (default `aaaa`)
    pub device: DeviceCode,
}

/// Request to extract the patcher JSON from a container
#[derive(Debug, Clone)]
pub struct UnwrapRequest {
    /// Container file
    pub input: PathBuf,
    /// Destination for the pretty-printed JSON
    pub output: OutputSink,
    /// Unwrap options
    pub options: UnwrapOptions,
}

/// Outcome of a successful unwrap
#[derive(Debug, Clone)]
pub struct UnwrapSummary {
    /// Device type from the `ampf` chunk, if present
    pub device: Option<DeviceType>,
    /// Value of the `meta` chunk, if present
    pub meta: Option<u32>,
    /// Number of chunks scanned
    pub chunks_scanned: usize,
    /// Bytes of JSON written
    pub json_bytes: usize,
    /// Why scanning stopped early, if it did
    pub truncation: Option<Truncation>,
}

/// Request to build a container from a JSON file
#[derive(Debug, Clone)]
pub struct WrapRequest {
    /// JSON file
    pub input: PathBuf,
    /// Container file to create or replace
    pub output: PathBuf,
    /// Wrap options
    pub options: WrapOptions,
}

/// Outcome of a successful wrap
#[derive(Debug, Clone)]
pub struct WrapSummary {
    /// Device code written
    pub device: DeviceCode,
    /// Length of the zero-terminated patcher payload
    pub patcher_bytes: usize,
    /// Total container size
    pub container_bytes: usize,
}

/// Extract and pretty-print the patcher JSON of a container.
///
/// A `Device type: <label>` line is written to `diagnostics` for every
/// `ampf` chunk as it is scanned, so the note is visible even when the
/// conversion later fails.
pub fn execute_unwrap<D: Write + ?Sized>(
    request: UnwrapRequest,
    diagnostics: &mut D,
) -> Result<UnwrapSummary> {
    let bytes = fs::read(&request.input)?;
    debug!(input = %request.input.display(), bytes = bytes.len(), "read container");

    let mut scanner = ChunkScanner::new(&bytes);
    let mut extractor = PatcherExtractor::new();
    for chunk in scanner.by_ref() {
        if let Dispatched::Device(device) = extractor.accept(&chunk)? {
            writeln!(diagnostics, "Device type: {}", device)?;
        }
    }
    let unwrapped = extractor.finish(scanner.truncation())?;

    let json = to_pretty_string(&unwrapped.patcher, request.options.style)?;
    request.output.write_all(json.as_bytes())?;
    info!(chunks = unwrapped.chunk_count, json_bytes = json.len(), "unwrapped container");

    Ok(UnwrapSummary {
        device: unwrapped.device,
        meta: unwrapped.meta,
        chunks_scanned: unwrapped.chunk_count,
        json_bytes: json.len(),
        truncation: unwrapped.truncation,
    })
}

/// Validate a JSON file and write it into a new container.
///
/// Malformed JSON fails before the destination is opened.
pub fn execute_wrap(request: WrapRequest) -> Result<WrapSummary> {
    let json = fs::read(&request.input)?;
    debug!(input = %request.input.display(), bytes = json.len(), "read patcher JSON");

    let device = request.options.device;
    let container = assemble(&json, device)?;
    output::write_atomic(&request.output, &container)?;

    let patcher_bytes = container.len() - CONTAINER_OVERHEAD;
    info!(device = %device, patcher_bytes, "wrapped container");

    Ok(WrapSummary {
        device,
        patcher_bytes,
        container_bytes: container.len(),
    })
}
