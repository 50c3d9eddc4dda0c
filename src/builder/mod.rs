//! Synthesis of new chunks.
//!
//! - [`ChunkBuilder`] - Serializes a type tag and payload into a full record
//! - [`BuiltChunk`] - The resulting record, owned in memory
//!
//! # Record format
//!
//! ```text
//! +------------------+
//! | length (4 bytes) |  u32 big-endian, payload byte count
//! +------------------+
//! | type (4 bytes)   |  e.g. "tEXt"
//! +------------------+
//! | payload          |  length bytes
//! +------------------+
//! | crc32 (4 bytes)  |  u32 big-endian
//! +------------------+
//! ```
//!
//! What the CRC covers is set by [`ChecksumScope`].

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::Crc32;
use crate::chunk::{CHECKSUM_FIELD_SIZE, ChunkType, LENGTH_FIELD_SIZE, RECORD_OVERHEAD};
use crate::config::{ChecksumScope, ContainerConfig};
use crate::error::{ContainerError, Result};

/// Builds well-formed chunk records.
///
/// # Example
///
/// ```
/// use chunkweave::{ChunkBuilder, ContainerConfig};
///
/// let builder = ChunkBuilder::new(ContainerConfig::png());
/// let chunk = builder.build_text_chunk(b"hello")?;
///
/// assert_eq!(chunk.len(), 5 + 12);
/// assert_eq!(&chunk.as_bytes()[..8], b"\0\0\0\x05tEXt");
/// assert_eq!(chunk.recompute_checksum(), chunk.checksum());
/// # Ok::<(), chunkweave::ContainerError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ChunkBuilder {
    text_type: ChunkType,
    scope: ChecksumScope,
}

impl ChunkBuilder {
    /// Creates a builder for the given container profile.
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            text_type: config.text_type(),
            scope: config.checksum_scope(),
        }
    }

    /// Builds a record of the configured textual type carrying `text`.
    pub fn build_text_chunk(&self, text: &[u8]) -> Result<BuiltChunk> {
        self.build(self.text_type, text)
    }

    /// Builds a record of any type.
    ///
    /// # Errors
    ///
    /// [`ContainerError::PayloadTooLarge`] if the payload length does not fit
    /// in the 32-bit length field.
    pub fn build(&self, chunk_type: ChunkType, payload: &[u8]) -> Result<BuiltChunk> {
        let len = u32::try_from(payload.len())
            .map_err(|_| ContainerError::PayloadTooLarge { len: payload.len() })?;

        let checksum = checksum_of(self.scope, chunk_type, payload);

        let mut record = BytesMut::with_capacity(payload.len() + RECORD_OVERHEAD as usize);
        record.put_u32(len);
        record.put_slice(chunk_type.as_bytes());
        record.put_slice(payload);
        record.put_u32(checksum);

        Ok(BuiltChunk {
            record: record.freeze(),
            scope: self.scope,
        })
    }

    /// Returns the checksum scope in use.
    pub fn checksum_scope(&self) -> ChecksumScope {
        self.scope
    }
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

/// This function defines what a chunk checksum covers.
fn checksum_of(scope: ChecksumScope, chunk_type: ChunkType, payload: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(chunk_type.as_bytes());
    if scope.covers_payload() {
        crc.update(payload);
    }
    crc.finalize()
}

/// A synthesized chunk record held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct BuiltChunk {
    record: Bytes,
    scope: ChecksumScope,
}

impl BuiltChunk {
    const TYPE_START: usize = LENGTH_FIELD_SIZE as usize;
    const PAYLOAD_START: usize = Self::TYPE_START + ChunkType::SIZE;

    fn checksum_start(&self) -> usize {
        self.record.len() - CHECKSUM_FIELD_SIZE as usize
    }

    /// The full record: length, type, payload and checksum.
    pub fn as_bytes(&self) -> &Bytes {
        &self.record
    }

    /// Consumes the chunk and returns the record bytes.
    pub fn into_bytes(self) -> Bytes {
        self.record
    }

    /// Size of the full record.
    pub fn len(&self) -> usize {
        self.record.len()
    }

    /// Returns true if the record holds no bytes. A record built by
    /// [`ChunkBuilder`] carries at least 12 bytes of framing, so this never
    /// holds for one.
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// The type tag.
    pub fn chunk_type(&self) -> ChunkType {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.record[Self::TYPE_START..Self::PAYLOAD_START]);
        ChunkType::new(tag)
    }

    /// The payload bytes (zero-copy slice of the record).
    pub fn payload(&self) -> Bytes {
        self.record.slice(Self::PAYLOAD_START..self.checksum_start())
    }

    /// The embedded checksum.
    pub fn checksum(&self) -> u32 {
        let tail = &self.record[self.checksum_start()..];
        u32::from_be_bytes([tail[0], tail[1], tail[2], tail[3]])
    }

    /// Rederives the checksum from this record's own type and payload bytes,
    /// under the scope the record was built with.
    pub fn recompute_checksum(&self) -> u32 {
        checksum_of(self.scope, self.chunk_type(), &self.payload())
    }

    /// The scope the embedded checksum was computed under.
    pub fn checksum_scope(&self) -> ChecksumScope {
        self.scope
    }
}

impl AsRef<[u8]> for BuiltChunk {
    fn as_ref(&self) -> &[u8] {
        &self.record
    }
}

impl fmt::Debug for BuiltChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltChunk")
            .field("chunk_type", &self.chunk_type())
            .field("payload_len", &self.payload().len())
            .field("checksum", &format_args!("{:#010x}", self.checksum()))
            .finish()
    }
}

impl fmt::Display for BuiltChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunk '{}' ({} bytes)",
            self.chunk_type(),
            self.payload().len()
        )
    }
}
