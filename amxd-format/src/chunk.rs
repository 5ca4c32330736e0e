//! TLV chunk structures and the chunk scanner

use std::fmt;
use std::iter::FusedIterator;

use bytes::{Buf, BufMut};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::constants::CHUNK_HEADER_LEN;
use crate::error::{AmxdError, Result};

/// Four-byte chunk identifier.
///
/// Tags are kept as raw bytes and never decoded, so a container carrying
/// non-ASCII tag bytes still scans. Display escapes anything that is not
/// printable ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{}", std::ascii::escape_default(byte))?;
        }
        Ok(())
    }
}

impl Serialize for ChunkTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Chunk header: tag followed by the little-endian payload length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Chunk tag
    pub tag: ChunkTag,
    /// Payload length in bytes
    pub length: u32,
}

impl ChunkHeader {
    /// Build a header for a payload, rejecting payloads beyond `u32::MAX` bytes
    pub fn for_payload(tag: ChunkTag, payload: &[u8]) -> Result<Self> {
        let length =
            u32::try_from(payload.len()).map_err(|_| AmxdError::PayloadTooLarge(payload.len()))?;
        Ok(Self { tag, length })
    }

    /// Append the encoded header to `out`
    pub fn encode_into<B: BufMut>(&self, out: &mut B) {
        out.put_slice(&self.tag.0);
        out.put_u32_le(self.length);
    }

    /// Encode header to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(CHUNK_HEADER_LEN);
        self.encode_into(&mut result);
        result
    }

    /// Decode header from the first eight bytes of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < CHUNK_HEADER_LEN {
            return Err(AmxdError::UnexpectedEof);
        }

        let mut buf = &bytes[..CHUNK_HEADER_LEN];
        let mut tag = [0u8; 4];
        buf.copy_to_slice(&mut tag);
        let length = buf.get_u32_le();

        Ok(Self {
            tag: ChunkTag(tag),
            length,
        })
    }
}

/// A chunk borrowed from a container buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Offset of the chunk header within the container
    pub offset: usize,
    /// Chunk tag
    pub tag: ChunkTag,
    /// Payload bytes (exactly the declared length)
    pub payload: &'a [u8],
}

impl Chunk<'_> {
    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Offset one past the end of the payload
    pub fn end(&self) -> usize {
        self.offset + CHUNK_HEADER_LEN + self.payload.len()
    }
}

/// Where and why a scan stopped before consuming the whole buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Truncation {
    /// Fewer than eight bytes remained for a chunk header
    Header {
        /// Offset of the partial header
        offset: usize,
        /// Bytes left in the buffer
        available: usize,
    },
    /// A header declared more payload than the buffer holds
    Payload {
        /// Offset of the chunk header
        offset: usize,
        /// Tag of the truncated chunk
        tag: ChunkTag,
        /// Declared payload length
        declared: u32,
        /// Payload bytes actually present
        available: usize,
    },
}

impl Truncation {
    /// Offset at which scanning stopped
    pub fn offset(&self) -> usize {
        match self {
            Truncation::Header { offset, .. } | Truncation::Payload { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::Header { offset, available } => write!(
                f,
                "partial chunk header at offset {} ({} of {} bytes)",
                offset, available, CHUNK_HEADER_LEN
            ),
            Truncation::Payload {
                offset,
                tag,
                declared,
                available,
            } => write!(
                f,
                "chunk '{}' at offset {} declares {} bytes but only {} remain",
                tag, offset, declared, available
            ),
        }
    }
}

/// Lazy scanner over the chunks of a container buffer.
///
/// The scanner never fails: a partial header or a payload running past the
/// end of the buffer ends the iteration, and the reason is kept in
/// [`ChunkScanner::truncation`].
#[derive(Debug, Clone)]
pub struct ChunkScanner<'a> {
    bytes: &'a [u8],
    cursor: usize,
    truncation: Option<Truncation>,
    finished: bool,
}

impl<'a> ChunkScanner<'a> {
    /// Scan `bytes` from the start
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            cursor: 0,
            truncation: None,
            finished: false,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Why the scan stopped early, if it did
    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    fn stop(&mut self, truncation: Truncation) {
        debug!(%truncation, "chunk scan stopped early");
        self.truncation = Some(truncation);
        self.finished = true;
    }
}

impl<'a> Iterator for ChunkScanner<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let remaining = &self.bytes[self.cursor..];
        if remaining.is_empty() {
            self.finished = true;
            return None;
        }

        let header = match ChunkHeader::decode(remaining) {
            Ok(header) => header,
            Err(_) => {
                self.stop(Truncation::Header {
                    offset: self.cursor,
                    available: remaining.len(),
                });
                return None;
            }
        };

        let available = remaining.len() - CHUNK_HEADER_LEN;
        let declared = header.length as usize;
        if declared > available {
            self.stop(Truncation::Payload {
                offset: self.cursor,
                tag: header.tag,
                declared: header.length,
                available,
            });
            return None;
        }

        let start = self.cursor + CHUNK_HEADER_LEN;
        let chunk = Chunk {
            offset: self.cursor,
            tag: header.tag,
            payload: &self.bytes[start..start + declared],
        };
        self.cursor = chunk.end();
        trace!(tag = %chunk.tag, offset = chunk.offset, len = chunk.len(), "scanned chunk");

        Some(chunk)
    }
}

impl FusedIterator for ChunkScanner<'_> {}
