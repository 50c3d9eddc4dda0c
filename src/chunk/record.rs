//! The ChunkWindow type - one indexed chunk in a shared source.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use super::ChunkType;
use crate::checksum::Crc32;
use crate::error::Result;
use crate::source::ByteSource;
use crate::window::ByteWindow;

/// Size of the big-endian length field.
pub const LENGTH_FIELD_SIZE: u64 = 4;

/// Size of the big-endian checksum field.
pub const CHECKSUM_FIELD_SIZE: u64 = 4;

/// Bytes a record occupies besides its payload: length, type and checksum.
pub const RECORD_OVERHEAD: u64 = LENGTH_FIELD_SIZE + ChunkType::SIZE as u64 + CHECKSUM_FIELD_SIZE;

/// A chunk located by the indexer.
///
/// Holds only the chunk's position and header; the payload stays in the
/// source until one of the window accessors is read. Every accessor hands out
/// a new [`ByteWindow`] with its own cursor.
///
/// ```text
/// offset
/// |<- 4 ->|<- 4 ->|<-- payload_len -->|<- 4 ->|
/// | length| type  |      payload      |  crc  |
///         |<------------- body() ------------>|
/// |<------------------- raw() --------------->|
/// ```
pub struct ChunkWindow<S: ?Sized> {
    source: Arc<S>,
    offset: u64,
    payload_len: u32,
    chunk_type: ChunkType,
    is_text: bool,
}

impl<S: ByteSource + ?Sized> ChunkWindow<S> {
    /// Creates a chunk view. The caller guarantees the record lies inside the
    /// source.
    pub(crate) fn new(
        source: Arc<S>,
        offset: u64,
        payload_len: u32,
        chunk_type: ChunkType,
        is_text: bool,
    ) -> Self {
        Self {
            source,
            offset,
            payload_len,
            chunk_type,
            is_text,
        }
    }

    fn window(&self, start: u64, len: u64) -> ByteWindow<S> {
        ByteWindow::from_validated(Arc::clone(&self.source), start, len)
    }

    /// The full on-disk record: length, type, payload and checksum.
    pub fn raw(&self) -> ByteWindow<S> {
        self.window(self.offset, self.raw_len())
    }

    /// Type, payload and checksum; the length prefix is excluded.
    pub fn body(&self) -> ByteWindow<S> {
        self.window(
            self.offset + LENGTH_FIELD_SIZE,
            self.raw_len() - LENGTH_FIELD_SIZE,
        )
    }

    /// The payload bytes only.
    pub fn payload(&self) -> ByteWindow<S> {
        self.window(self.payload_offset(), self.payload_len as u64)
    }

    /// Reads the payload of a textual chunk.
    ///
    /// Returns `None` for every other chunk type.
    pub fn text(&self) -> Result<Option<Bytes>> {
        if !self.is_text {
            return Ok(None);
        }
        self.payload().to_bytes().map(Some)
    }

    /// Reads the checksum field as stored. It is not verified.
    pub fn stored_checksum(&self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.source
            .read_exact_at(self.payload_offset() + self.payload_len as u64, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Computes the CRC-32 over type and payload, streaming the payload.
    pub fn compute_checksum(&self) -> Result<u32> {
        let mut crc = Crc32::new();
        crc.update(self.chunk_type.as_bytes());
        let mut payload = self.payload();
        std::io::copy(&mut payload, &mut crc)?;
        Ok(crc.finalize())
    }

    /// Returns the shared source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S: ?Sized> ChunkWindow<S> {
    /// Offset of the length field in the source.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset of the first payload byte in the source.
    pub fn payload_offset(&self) -> u64 {
        self.offset + LENGTH_FIELD_SIZE + ChunkType::SIZE as u64
    }

    /// Offset one past the checksum field; where the next chunk starts.
    pub fn end(&self) -> u64 {
        self.offset + self.raw_len()
    }

    /// Declared payload length.
    pub fn payload_len(&self) -> u32 {
        self.payload_len
    }

    /// Size of the full record, `payload_len + 12`.
    pub fn raw_len(&self) -> u64 {
        self.payload_len as u64 + RECORD_OVERHEAD
    }

    /// The chunk's type tag.
    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    /// Returns true if this chunk carries the configured textual type.
    pub fn is_text(&self) -> bool {
        self.is_text
    }

    /// One-line summary, e.g. `chunk 'IHDR' (13 bytes)`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<S: ?Sized> Clone for ChunkWindow<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            offset: self.offset,
            payload_len: self.payload_len,
            chunk_type: self.chunk_type,
            is_text: self.is_text,
        }
    }
}

impl<S: ?Sized> fmt::Debug for ChunkWindow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkWindow")
            .field("offset", &self.offset)
            .field("payload_len", &self.payload_len)
            .field("chunk_type", &self.chunk_type)
            .finish()
    }
}

impl<S: ?Sized> fmt::Display for ChunkWindow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk '{}' ({} bytes)", self.chunk_type, self.payload_len)
    }
}
