//! Chunk listing for `amxd ls`

use std::fs;
use std::path::Path;

use amxd_format::constants::{TAG_AMPF, TAG_META, TAG_PTCH};
use amxd_format::patcher::strip_terminator;
use amxd_format::{Chunk, ChunkScanner, ChunkTag, DeviceType, Result, Truncation};
use serde::Serialize;

/// One scanned chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkInfo {
    /// 1-based position in the container
    pub index: usize,
    /// Offset of the chunk header
    pub offset: usize,
    /// Chunk tag
    pub tag: ChunkTag,
    /// Payload length in bytes
    pub length: usize,
    /// Short interpretation of known chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of listing a container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    /// Total container size in bytes
    pub size: usize,
    /// Chunks in file order
    pub chunks: Vec<ChunkInfo>,
    /// Why scanning stopped early, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,
}

/// List the chunks of the container at `path`
pub fn inspect(path: &Path) -> Result<Inspection> {
    let bytes = fs::read(path)?;
    Ok(inspect_bytes(&bytes))
}

/// List the chunks of an in-memory container. Never fails.
pub fn inspect_bytes(bytes: &[u8]) -> Inspection {
    let mut scanner = ChunkScanner::new(bytes);
    let chunks = scanner
        .by_ref()
        .enumerate()
        .map(|(idx, chunk)| ChunkInfo {
            index: idx + 1,
            offset: chunk.offset,
            tag: chunk.tag,
            length: chunk.len(),
            detail: describe(&chunk),
        })
        .collect();

    Inspection {
        size: bytes.len(),
        chunks,
        truncation: scanner.truncation(),
    }
}

fn describe(chunk: &Chunk<'_>) -> Option<String> {
    match chunk.tag {
        TAG_AMPF => Some(format!(
            "device: {}",
            DeviceType::from_code(chunk.payload)
        )),
        TAG_META => <[u8; 4]>::try_from(chunk.payload)
            .ok()
            .map(|raw| format!("value: {}", u32::from_le_bytes(raw))),
        TAG_PTCH => {
            let json = strip_terminator(chunk.payload);
            let terminated = json.len() != chunk.payload.len();
            Some(format!(
                "patcher JSON: {} bytes{}",
                json.len(),
                if terminated { ", zero-terminated" } else { "" }
            ))
        }
        _ => None,
    }
}
