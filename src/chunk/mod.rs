//! Chunk types.
//!
//! - [`ChunkType`] - 4-byte type tag
//! - [`ChunkWindow`] - an indexed chunk, read lazily from its source

mod kind;
mod record;

pub use kind::ChunkType;
pub use record::{CHECKSUM_FIELD_SIZE, ChunkWindow, LENGTH_FIELD_SIZE, RECORD_OVERHEAD};
