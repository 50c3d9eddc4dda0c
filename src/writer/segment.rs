//! Items a container writer can emit.

use std::fmt;
use std::io;

use crate::builder::BuiltChunk;
use crate::chunk::{ChunkType, ChunkWindow};
use crate::error::{ContainerError, Result};
use crate::index::ChunkSequence;
use crate::source::ByteSource;

/// A chunk whose full record (length, type, payload, checksum) can be
/// streamed out verbatim.
pub trait RawChunk {
    /// Size of the full record in bytes.
    fn raw_len(&self) -> u64;

    /// The record's type tag.
    fn chunk_type(&self) -> ChunkType;

    /// Copies record bytes starting at `pos` into `buf`.
    ///
    /// Returns the number of bytes copied; 0 once `pos` reaches
    /// [`raw_len`](Self::raw_len).
    fn read_raw(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize>;
}

impl<S: ByteSource + ?Sized> RawChunk for ChunkWindow<S> {
    fn raw_len(&self) -> u64 {
        ChunkWindow::raw_len(self)
    }

    fn chunk_type(&self) -> ChunkType {
        ChunkWindow::chunk_type(self)
    }

    fn read_raw(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = ChunkWindow::raw_len(self).saturating_sub(pos);
        let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        if want == 0 {
            return Ok(0);
        }
        loop {
            match self.source().read_at(self.offset() + pos, &mut buf[..want]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                result => return result,
            }
        }
    }
}

impl RawChunk for BuiltChunk {
    fn raw_len(&self) -> u64 {
        self.len() as u64
    }

    fn chunk_type(&self) -> ChunkType {
        BuiltChunk::chunk_type(self)
    }

    fn read_raw(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        let record = self.as_bytes();
        let start = usize::try_from(pos).unwrap_or(usize::MAX).min(record.len());
        let n = buf.len().min(record.len() - start);
        buf[..n].copy_from_slice(&record[start..start + n]);
        Ok(n)
    }
}

impl<T: RawChunk + ?Sized> RawChunk for &T {
    fn raw_len(&self) -> u64 {
        (**self).raw_len()
    }

    fn chunk_type(&self) -> ChunkType {
        (**self).chunk_type()
    }

    fn read_raw(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_raw(pos, buf)
    }
}

/// One entry of a splice plan.
pub enum Segment<'a, S: ?Sized> {
    /// A chunk copied from the source unchanged.
    Original(&'a ChunkWindow<S>),
    /// A chunk synthesized in memory.
    Synthetic(&'a BuiltChunk),
}

impl<S: ?Sized> Clone for Segment<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Segment<'_, S> {}

impl<S: ?Sized> fmt::Debug for Segment<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Original(chunk) => f.debug_tuple("Original").field(chunk).finish(),
            Segment::Synthetic(chunk) => f.debug_tuple("Synthetic").field(chunk).finish(),
        }
    }
}

impl<S: ?Sized> Segment<'_, S> {
    /// Returns true for a synthesized chunk.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Segment::Synthetic(_))
    }
}

impl<S: ByteSource + ?Sized> RawChunk for Segment<'_, S> {
    fn raw_len(&self) -> u64 {
        match self {
            Segment::Original(chunk) => RawChunk::raw_len(*chunk),
            Segment::Synthetic(chunk) => RawChunk::raw_len(*chunk),
        }
    }

    fn chunk_type(&self) -> ChunkType {
        match self {
            Segment::Original(chunk) => RawChunk::chunk_type(*chunk),
            Segment::Synthetic(chunk) => RawChunk::chunk_type(*chunk),
        }
    }

    fn read_raw(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Segment::Original(chunk) => chunk.read_raw(pos, buf),
            Segment::Synthetic(chunk) => chunk.read_raw(pos, buf),
        }
    }
}

/// Plans a write that places `synthetic` directly after the chunk at `index`.
///
/// The sequence is not modified; the returned plan borrows from it.
///
/// # Errors
///
/// [`ContainerError::OutOfRange`] if `index` is not a chunk of `sequence`.
pub fn splice_after<'a, S: ?Sized>(
    sequence: &'a ChunkSequence<S>,
    index: usize,
    synthetic: &'a BuiltChunk,
) -> Result<Vec<Segment<'a, S>>> {
    if index >= sequence.len() {
        return Err(ContainerError::OutOfRange {
            start: index as u64,
            len: 1,
            source_len: sequence.len() as u64,
        });
    }

    let chunks = sequence.as_slice();
    let mut plan = Vec::with_capacity(chunks.len() + 1);
    plan.extend(chunks[..=index].iter().map(Segment::Original));
    plan.push(Segment::Synthetic(synthetic));
    plan.extend(chunks[index + 1..].iter().map(Segment::Original));
    Ok(plan)
}

/// The plan used by injection: after the header, or alone when the sequence
/// is empty.
pub(crate) fn injection_plan<'a, S: ?Sized>(
    sequence: &'a ChunkSequence<S>,
    synthetic: &'a BuiltChunk,
) -> Vec<Segment<'a, S>> {
    // index 0 is only out of range for an empty sequence
    splice_after(sequence, 0, synthetic).unwrap_or_else(|_| vec![Segment::Synthetic(synthetic)])
}
