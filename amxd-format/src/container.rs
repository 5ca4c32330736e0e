//! Container assembly and chunk dispatch

use bytes::BufMut;
use serde_json::Value;
use tracing::{debug, trace};

use crate::chunk::{Chunk, ChunkHeader, ChunkScanner, ChunkTag, Truncation};
use crate::constants::{
    CONTAINER_OVERHEAD, FIXED_PAYLOAD_LEN, META_VALUE, TAG_AMPF, TAG_META, TAG_PTCH,
};
use crate::device::{DeviceCode, DeviceType};
use crate::error::{AmxdError, Result};
use crate::patcher;

/// Assemble a container from patcher JSON and a device code.
///
/// The JSON is validated first, ignoring one trailing terminator byte, so
/// nothing is produced for malformed input. The output always holds exactly
/// `ampf`, `meta` and `ptch`, in that order.
pub fn assemble(json: &[u8], device: DeviceCode) -> Result<Vec<u8>> {
    patcher::parse(json)?;

    let payload = patcher::terminated(json);
    let ptch = ChunkHeader::for_payload(TAG_PTCH, &payload)?;

    let mut out = Vec::with_capacity(CONTAINER_OVERHEAD + payload.len());

    ChunkHeader {
        tag: TAG_AMPF,
        length: FIXED_PAYLOAD_LEN,
    }
    .encode_into(&mut out);
    out.put_slice(device.as_bytes());

    ChunkHeader {
        tag: TAG_META,
        length: FIXED_PAYLOAD_LEN,
    }
    .encode_into(&mut out);
    out.put_u32_le(META_VALUE);

    ptch.encode_into(&mut out);
    out.put_slice(&payload);

    debug!(
        device = %device,
        payload_len = payload.len(),
        container_len = out.len(),
        "assembled container"
    );
    Ok(out)
}

/// Outcome of routing one chunk
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// `ampf` chunk, mapped through the device enumeration
    Device(DeviceType),
    /// `meta` chunk; `None` when the payload is not four bytes
    Meta(Option<u32>),
    /// `ptch` chunk parsed; carries the payload length
    Patcher(usize),
    /// Chunk with an unrecognized tag
    Skipped(ChunkTag),
}

/// Everything an unwrap learned from a container
#[derive(Debug, Clone)]
pub struct Unwrapped {
    /// Device type from the last `ampf` chunk
    pub device: Option<DeviceType>,
    /// Value of the last well-formed `meta` chunk
    pub meta: Option<u32>,
    /// Parsed patcher document from the last `ptch` chunk
    pub patcher: Value,
    /// Number of chunks scanned
    pub chunk_count: usize,
    /// Why scanning stopped early, if it did
    pub truncation: Option<Truncation>,
}

/// Routes scanned chunks by tag and collects the patcher document.
///
/// Callers drive the loop so they can report each [`Dispatched`] as it
/// happens, before a later chunk fails the conversion.
#[derive(Debug, Default)]
pub struct PatcherExtractor {
    device: Option<DeviceType>,
    meta: Option<u32>,
    patcher: Option<Value>,
    chunk_count: usize,
}

impl PatcherExtractor {
    /// Create an empty extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one chunk; a `ptch` payload that is not valid JSON is an error
    pub fn accept(&mut self, chunk: &Chunk<'_>) -> Result<Dispatched> {
        self.chunk_count += 1;

        match chunk.tag {
            TAG_AMPF => {
                let device = DeviceType::from_code(chunk.payload);
                self.device = Some(device);
                Ok(Dispatched::Device(device))
            }
            TAG_META => {
                let value = <[u8; 4]>::try_from(chunk.payload)
                    .ok()
                    .map(u32::from_le_bytes);
                debug!(?value, "meta chunk");
                if value.is_some() {
                    self.meta = value;
                }
                Ok(Dispatched::Meta(value))
            }
            TAG_PTCH => {
                let value = patcher::parse(chunk.payload)?;
                self.patcher = Some(value);
                Ok(Dispatched::Patcher(chunk.len()))
            }
            other => {
                trace!(tag = %other, offset = chunk.offset, "skipping chunk");
                Ok(Dispatched::Skipped(other))
            }
        }
    }

    /// Finish the scan; fails when no `ptch` chunk was seen
    pub fn finish(self, truncation: Option<Truncation>) -> Result<Unwrapped> {
        let patcher = self.patcher.ok_or(AmxdError::MissingChunk(TAG_PTCH))?;
        Ok(Unwrapped {
            device: self.device,
            meta: self.meta,
            patcher,
            chunk_count: self.chunk_count,
            truncation,
        })
    }
}

/// Scan and dispatch a whole container buffer
pub fn unwrap_container(bytes: &[u8]) -> Result<Unwrapped> {
    let mut scanner = ChunkScanner::new(bytes);
    let mut extractor = PatcherExtractor::new();
    for chunk in scanner.by_ref() {
        extractor.accept(&chunk)?;
    }
    extractor.finish(scanner.truncation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::{to_pretty_string, PrettyStyle};

    fn expected_container(code: &[u8; 4], json: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"ampf");
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(code);
        bytes.extend_from_slice(b"meta");
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(b"ptch");
        bytes.extend_from_slice(&(json.len() as u32 + 1).to_le_bytes());
        bytes.extend_from_slice(json);
        bytes.push(0);
        bytes
    }

    #[test]
    fn test_assemble_concrete_layout() {
        let bytes = assemble(br#"{"a":1}"#, DeviceCode::default()).unwrap();
        assert_eq!(bytes, expected_container(b"aaaa", br#"{"a":1}"#));
        assert_eq!(&bytes[24..28], b"ptch");
        assert_eq!(&bytes[28..32], &8u32.to_le_bytes());
    }

    #[test]
    fn test_assemble_does_not_double_terminate() {
        let bare = assemble(br#"{"a":1}"#, DeviceCode::default()).unwrap();
        let terminated = assemble(b"{\"a\":1}\0", DeviceCode::default()).unwrap();
        assert_eq!(bare, terminated);
    }

    #[test]
    fn test_assemble_rejects_malformed_json() {
        assert!(matches!(
            assemble(b"{invalid}", DeviceCode::default()),
            Err(AmxdError::Json(_))
        ));
    }

    #[test]
    fn test_assemble_writes_unknown_code_through() {
        let bytes = assemble(b"[]", DeviceCode(*b"zzzz")).unwrap();
        assert_eq!(&bytes[8..12], b"zzzz");
        let unwrapped = unwrap_container(&bytes).unwrap();
        assert_eq!(unwrapped.device, Some(DeviceType::Unknown));
    }

    #[test]
    fn test_unwrap_concrete_scenario() {
        let bytes = expected_container(b"aaaa", br#"{"a":1}"#);
        let unwrapped = unwrap_container(&bytes).unwrap();
        assert_eq!(unwrapped.device, Some(DeviceType::AudioEffect));
        assert_eq!(unwrapped.meta, Some(1));
        assert_eq!(unwrapped.chunk_count, 3);
        assert!(unwrapped.truncation.is_none());
        assert_eq!(
            to_pretty_string(&unwrapped.patcher, PrettyStyle::Utf8).unwrap(),
            "{\n\t\"a\": 1\n}\n"
        );
    }

    #[test]
    fn test_unwrap_skips_unknown_chunks() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"xtra");
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(b"abc");
        bytes.extend(expected_container(b"mmmm", b"[1]"));

        let unwrapped = unwrap_container(&bytes).unwrap();
        assert_eq!(unwrapped.device, Some(DeviceType::MidiEffect));
        assert_eq!(unwrapped.chunk_count, 4);
    }

    #[test]
    fn test_unwrap_ptch_without_terminator() {
        let mut bytes = b"ptch".to_vec();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"{}");

        let unwrapped = unwrap_container(&bytes).unwrap();
        assert_eq!(unwrapped.device, None);
        assert_eq!(unwrapped.patcher, serde_json::json!({}));
    }

    #[test]
    fn test_unwrap_missing_ptch() {
        let mut bytes = b"ampf".to_vec();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(b"iiii");

        let err = unwrap_container(&bytes).unwrap_err();
        assert!(matches!(err, AmxdError::MissingChunk(tag) if tag == TAG_PTCH));
        assert_eq!(err.to_string(), "no ptch chunk found in .amxd file");
    }

    #[test]
    fn test_unwrap_truncated_ptch_is_missing() {
        let mut bytes = expected_container(b"aaaa", br#"{"a":1}"#);
        bytes.truncate(bytes.len() - 3);

        assert!(matches!(
            unwrap_container(&bytes),
            Err(AmxdError::MissingChunk(_))
        ));
    }

    #[test]
    fn test_unwrap_keeps_patcher_seen_before_truncation() {
        let mut bytes = expected_container(b"aaaa", b"[]");
        bytes.extend_from_slice(b"tail\x10\x00");

        let unwrapped = unwrap_container(&bytes).unwrap();
        assert_eq!(unwrapped.patcher, serde_json::json!([]));
        assert_eq!(
            unwrapped.truncation,
            Some(Truncation::Header {
                offset: 35,
                available: 6
            })
        );
    }

    #[test]
    fn test_unwrap_malformed_patcher_fails() {
        let mut bytes = b"ptch".to_vec();
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(b"{invalid}\0");

        assert!(matches!(unwrap_container(&bytes), Err(AmxdError::Json(_))));
    }

    #[test]
    fn test_extractor_reports_each_chunk() {
        let bytes = expected_container(b"iiii", b"{}");
        let mut extractor = PatcherExtractor::new();
        let dispatched: Vec<_> = ChunkScanner::new(&bytes)
            .map(|chunk| extractor.accept(&chunk).unwrap())
            .collect();

        assert_eq!(
            dispatched,
            vec![
                Dispatched::Device(DeviceType::Instrument),
                Dispatched::Meta(Some(1)),
                Dispatched::Patcher(3),
            ]
        );
    }

    #[test]
    fn test_meta_with_odd_length_is_not_recorded() {
        let mut bytes = b"meta".to_vec();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"\x01\x00");
        bytes.extend(expected_container(b"aaaa", b"{}")[12..].to_vec());

        let mut scanner = ChunkScanner::new(&bytes);
        let mut extractor = PatcherExtractor::new();
        let first = scanner.next().unwrap();
        assert_eq!(extractor.accept(&first).unwrap(), Dispatched::Meta(None));
    }
}
