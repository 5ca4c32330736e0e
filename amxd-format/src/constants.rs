//! Constants and chunk tags for the AMXD container

use crate::chunk::ChunkTag;

/// Device descriptor chunk: "ampf"
pub const TAG_AMPF: ChunkTag = ChunkTag(*b"ampf");

/// Metadata chunk: "meta"
pub const TAG_META: ChunkTag = ChunkTag(*b"meta");

/// Patcher JSON chunk: "ptch"
pub const TAG_PTCH: ChunkTag = ChunkTag(*b"ptch");

/// Chunk header size: 4-byte tag + 4-byte little-endian length
pub const CHUNK_HEADER_LEN: usize = 8;

/// Payload length of the `ampf` and `meta` chunks
pub const FIXED_PAYLOAD_LEN: u32 = 4;

/// Value stored in the `meta` chunk of every observed container
pub const META_VALUE: u32 = 1;

/// Terminator appended to the patcher JSON payload
pub const PATCHER_TERMINATOR: u8 = 0;

/// Device code for audio effects
pub const DEVICE_AUDIO_EFFECT: [u8; 4] = *b"aaaa";

/// Device code for MIDI effects
pub const DEVICE_MIDI_EFFECT: [u8; 4] = *b"mmmm";

/// Device code for instruments
pub const DEVICE_INSTRUMENT: [u8; 4] = *b"iiii";

/// Bytes an assembled container adds around the patcher payload:
/// three chunk headers plus the `ampf` and `meta` payloads
pub const CONTAINER_OVERHEAD: usize = 3 * CHUNK_HEADER_LEN + 2 * FIXED_PAYLOAD_LEN as usize;
