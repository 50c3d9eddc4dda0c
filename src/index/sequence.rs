//! The ordered result of a scan.

use std::fmt;
use std::ops::Index;
use std::slice;

use bytes::Bytes;

use crate::chunk::{ChunkType, ChunkWindow};
use crate::error::Result;
use crate::source::ByteSource;

/// Every chunk of one source, in stream order, plus the signature it was
/// validated against.
///
/// Immutable once built. Splicing never edits the list; it only decides the
/// order in which chunks are written (see [`crate::splice_after`]).
pub struct ChunkSequence<S: ?Sized> {
    signature: Bytes,
    chunks: Vec<ChunkWindow<S>>,
    trailing: u64,
}

impl<S: ?Sized> ChunkSequence<S> {
    pub(crate) fn new(signature: Bytes, chunks: Vec<ChunkWindow<S>>, trailing: u64) -> Self {
        Self {
            signature,
            chunks,
            trailing,
        }
    }

    /// The signature the source started with.
    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if the source held no chunks after its signature.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns the chunk at `index`.
    pub fn get(&self, index: usize) -> Option<&ChunkWindow<S>> {
        self.chunks.get(index)
    }

    /// The first chunk; by convention the format's mandatory header.
    pub fn header(&self) -> Option<&ChunkWindow<S>> {
        self.chunks.first()
    }

    /// Iterates over the chunks in stream order.
    pub fn iter(&self) -> slice::Iter<'_, ChunkWindow<S>> {
        self.chunks.iter()
    }

    /// Returns the chunks as a slice.
    pub fn as_slice(&self) -> &[ChunkWindow<S>] {
        &self.chunks
    }

    /// Iterates over the chunks carrying `chunk_type`.
    pub fn of_type(&self, chunk_type: ChunkType) -> impl Iterator<Item = &ChunkWindow<S>> {
        self.chunks
            .iter()
            .filter(move |c| c.chunk_type() == chunk_type)
    }

    /// Bytes after the last chunk that were too few to form a length field.
    /// They are not part of any chunk and are not re-emitted on write.
    pub fn trailing_bytes(&self) -> u64 {
        self.trailing
    }

    /// Size of signature plus every chunk record, i.e. what a write of this
    /// sequence emits.
    pub fn container_len(&self) -> u64 {
        self.signature.len() as u64 + self.chunks.iter().map(|c| c.raw_len()).sum::<u64>()
    }

    /// Consumes the sequence and returns the chunk list.
    pub fn into_vec(self) -> Vec<ChunkWindow<S>> {
        self.chunks
    }
}

impl<S: ByteSource + ?Sized> ChunkSequence<S> {
    /// Reads the payload of every textual chunk, in stream order.
    pub fn texts(&self) -> Result<Vec<Bytes>> {
        let mut out = Vec::new();
        for chunk in &self.chunks {
            if let Some(text) = chunk.text()? {
                out.push(text);
            }
        }
        Ok(out)
    }
}

impl<S: ?Sized> Index<usize> for ChunkSequence<S> {
    type Output = ChunkWindow<S>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.chunks[index]
    }
}

impl<'a, S: ?Sized> IntoIterator for &'a ChunkSequence<S> {
    type Item = &'a ChunkWindow<S>;
    type IntoIter = slice::Iter<'a, ChunkWindow<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

impl<S: ?Sized> Clone for ChunkSequence<S> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            chunks: self.chunks.clone(),
            trailing: self.trailing,
        }
    }
}

impl<S: ?Sized> fmt::Debug for ChunkSequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkSequence")
            .field("signature", &self.signature)
            .field("chunks", &self.chunks)
            .field("trailing", &self.trailing)
            .finish()
    }
}
