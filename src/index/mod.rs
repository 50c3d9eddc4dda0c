//! Chunk indexing over a signature-prefixed source.
//!
//! - [`ChunkIndexer`] - Validates the signature and collects every chunk
//! - [`ChunkScan`] - Lazy iterator yielding one [`ChunkWindow`] per chunk
//! - [`ChunkSequence`] - The ordered result of a full scan
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chunkweave::{ChunkBuilder, ChunkIndexer, ContainerConfig, PNG_SIGNATURE};
//!
//! let builder = ChunkBuilder::default();
//! let mut png = PNG_SIGNATURE.to_vec();
//! png.extend_from_slice(builder.build_text_chunk(b"hi")?.as_bytes());
//!
//! let sequence = ChunkIndexer::new(ContainerConfig::png()).scan(Arc::new(png))?;
//! assert_eq!(sequence.len(), 1);
//! assert_eq!(sequence[0].describe(), "chunk 'tEXt' (2 bytes)");
//! # Ok::<(), chunkweave::ContainerError>(())
//! ```

mod sequence;

pub use sequence::ChunkSequence;

use std::sync::Arc;

use bytes::Bytes;

use crate::chunk::{CHECKSUM_FIELD_SIZE, ChunkType, ChunkWindow, LENGTH_FIELD_SIZE};
use crate::config::ContainerConfig;
use crate::error::{ContainerError, Result};
use crate::source::ByteSource;

/// Initial capacity reserved for the chunk list; the count is unknown up front.
const INITIAL_CHUNK_CAPACITY: usize = 16;

/// Indexes chunk containers of one profile.
///
/// `ChunkIndexer` holds a [`ContainerConfig`] and scans sources against it.
/// The indexer itself keeps no per-scan state and can be reused.
#[derive(Debug, Clone, Default)]
pub struct ChunkIndexer {
    config: ContainerConfig,
}

impl ChunkIndexer {
    /// Creates an indexer for the given profile.
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    /// Scans `source` once and returns every chunk in stream order.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::InvalidSignature`] if the source does not start
    ///   with the configured signature
    /// - [`ContainerError::TruncatedChunk`] if a chunk runs past the end
    /// - [`ContainerError::Io`] if the source fails
    pub fn scan<S: ByteSource + ?Sized>(&self, source: Arc<S>) -> Result<ChunkSequence<S>> {
        let mut scan = self.chunks(source);
        let mut chunks = Vec::with_capacity(INITIAL_CHUNK_CAPACITY);
        for chunk in scan.by_ref() {
            chunks.push(chunk?);
        }

        tracing::debug!(
            chunks = chunks.len(),
            trailing = scan.trailing_bytes(),
            "scan complete"
        );
        Ok(ChunkSequence::new(
            self.config.signature().clone(),
            chunks,
            scan.trailing_bytes(),
        ))
    }

    /// Returns a lazy iterator over the chunks of `source`.
    ///
    /// The signature is checked on the first call to `next`. The iterator is
    /// fused: after it yields an error or reaches the end it only returns
    /// `None`.
    pub fn chunks<S: ByteSource + ?Sized>(&self, source: Arc<S>) -> ChunkScan<S> {
        ChunkScan {
            source,
            signature: self.config.signature().clone(),
            text_type: self.config.text_type(),
            state: ScanState::AwaitingSignature,
            trailing: 0,
        }
    }

    /// Returns the configuration used by this indexer.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }
}

/// Progress of a [`ChunkScan`].
///
/// `AwaitingSignature → ScanningChunks → Done`, or `Failed` from either of
/// the first two. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing read yet.
    AwaitingSignature,
    /// Signature matched; the next length field is at `offset`.
    ScanningChunks {
        /// Offset of the next length field.
        offset: u64,
    },
    /// The source ended cleanly.
    Done,
    /// An error was yielded.
    Failed,
}

/// Outcome of reading a length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LengthField {
    /// A full length field was present.
    Present(u32),
    /// Fewer than four bytes remain: the chunk list is over.
    EndOfStream { trailing: u64 },
}

/// An iterator that yields chunks from a shared source.
///
/// Reads only length fields and type tags; payloads are never touched.
pub struct ChunkScan<S: ?Sized> {
    source: Arc<S>,
    signature: Bytes,
    text_type: ChunkType,
    state: ScanState,
    trailing: u64,
}

impl<S: ByteSource + ?Sized> ChunkScan<S> {
    /// Returns the current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Bytes left after the last chunk that were too few to form a length
    /// field. Only meaningful once the scan is `Done`.
    pub fn trailing_bytes(&self) -> u64 {
        self.trailing
    }

    fn check_signature(&self) -> Result<()> {
        let sig_len = self.signature.len();
        let have = self.source.len().min(sig_len as u64) as usize;

        let mut actual = vec![0u8; have];
        self.source.read_exact_at(0, &mut actual)?;

        if have < sig_len || actual[..] != self.signature[..] {
            return Err(ContainerError::InvalidSignature {
                expected: self.signature.to_vec(),
                actual,
            });
        }
        Ok(())
    }

    fn read_length(&self, offset: u64) -> Result<LengthField> {
        let available = self.source.len().saturating_sub(offset);
        if available < LENGTH_FIELD_SIZE {
            return Ok(LengthField::EndOfStream {
                trailing: available,
            });
        }

        let mut buf = [0u8; 4];
        self.source.read_exact_at(offset, &mut buf)?;
        Ok(LengthField::Present(u32::from_be_bytes(buf)))
    }

    fn next_chunk(&mut self, offset: u64) -> Result<Option<ChunkWindow<S>>> {
        let len = match self.read_length(offset)? {
            LengthField::Present(len) => len,
            LengthField::EndOfStream { trailing } => {
                self.trailing = trailing;
                if trailing > 0 {
                    tracing::warn!(
                        offset,
                        trailing,
                        "ignoring bytes too short for a length field"
                    );
                }
                return Ok(None);
            }
        };

        // type + payload + checksum must all follow the length field
        let available = self.source.len() - offset - LENGTH_FIELD_SIZE;
        let needed = ChunkType::SIZE as u64 + len as u64 + CHECKSUM_FIELD_SIZE;
        if needed > available {
            return Err(ContainerError::TruncatedChunk {
                offset,
                declared: len,
                available,
            });
        }

        let mut tag = [0u8; 4];
        self.source.read_exact_at(offset + LENGTH_FIELD_SIZE, &mut tag)?;
        let chunk_type = ChunkType::new(tag);

        tracing::debug!(offset, chunk_type = %chunk_type, len, "indexed chunk");

        Ok(Some(ChunkWindow::new(
            Arc::clone(&self.source),
            offset,
            len,
            chunk_type,
            chunk_type == self.text_type,
        )))
    }
}

impl<S: ByteSource + ?Sized> Iterator for ChunkScan<S> {
    type Item = Result<ChunkWindow<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                ScanState::AwaitingSignature => {
                    if let Err(e) = self.check_signature() {
                        self.state = ScanState::Failed;
                        return Some(Err(e));
                    }
                    self.state = ScanState::ScanningChunks {
                        offset: self.signature.len() as u64,
                    };
                }
                ScanState::ScanningChunks { offset } => {
                    return match self.next_chunk(offset) {
                        Ok(Some(chunk)) => {
                            self.state = ScanState::ScanningChunks {
                                offset: chunk.end(),
                            };
                            Some(Ok(chunk))
                        }
                        Ok(None) => {
                            self.state = ScanState::Done;
                            None
                        }
                        Err(e) => {
                            self.state = ScanState::Failed;
                            Some(Err(e))
                        }
                    };
                }
                ScanState::Done | ScanState::Failed => return None,
            }
        }
    }
}

impl<S: ByteSource + ?Sized> std::iter::FusedIterator for ChunkScan<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ChunkBuilder;
    use crate::config::PNG_SIGNATURE;

    fn container(records: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
        let builder = ChunkBuilder::default();
        let mut out = PNG_SIGNATURE.to_vec();
        for (ty, payload) in records {
            let chunk = builder.build(ChunkType::new(**ty), payload).unwrap();
            out.extend_from_slice(chunk.as_bytes());
        }
        out
    }

    #[test]
    fn test_scan_offsets() {
        let data = container(&[(b"IHDR", &[1u8; 13]), (b"IDAT", b"abc"), (b"IEND", b"")]);
        let seq = ChunkIndexer::default().scan(Arc::new(data)).unwrap();

        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0].offset(), 8);
        assert_eq!(seq[0].raw_len(), 25);
        assert_eq!(seq[1].offset(), 33);
        assert_eq!(seq[1].chunk_type(), ChunkType::IDAT);
        assert_eq!(seq[2].offset(), 48);
        assert_eq!(seq[2].raw_len(), 12);
        assert_eq!(seq.trailing_bytes(), 0);
    }

    #[test]
    fn test_signature_only() {
        let seq = ChunkIndexer::default()
            .scan(Arc::new(PNG_SIGNATURE.to_vec()))
            .unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_invalid_signature() {
        let mut data = container(&[(b"IEND", b"")]);
        data[1] = b'J';
        let err = ChunkIndexer::default().scan(Arc::new(data)).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidSignature { .. }));
    }

    #[test]
    fn test_source_shorter_than_signature() {
        let err = ChunkIndexer::default()
            .scan(Arc::new(PNG_SIGNATURE[..5].to_vec()))
            .unwrap_err();
        match err {
            ContainerError::InvalidSignature { actual, .. } => assert_eq!(actual.len(), 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = container(&[(b"IHDR", &[0u8; 13])]);
        data.truncate(data.len() - 6);
        let err = ChunkIndexer::default().scan(Arc::new(data)).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::TruncatedChunk {
                offset: 8,
                declared: 13,
                available: 15
            }
        ));
    }

    #[test]
    fn test_missing_checksum_is_truncated() {
        let mut data = container(&[(b"IEND", b"")]);
        data.truncate(data.len() - 1);
        let err = ChunkIndexer::default().scan(Arc::new(data)).unwrap_err();
        assert!(matches!(err, ContainerError::TruncatedChunk { declared: 0, .. }));
    }

    #[test]
    fn test_trailing_bytes_end_scan() {
        let mut data = container(&[(b"IEND", b"")]);
        data.extend_from_slice(&[0, 0, 1]);
        let seq = ChunkIndexer::default().scan(Arc::new(data)).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.trailing_bytes(), 3);
    }

    #[test]
    fn test_iterator_state_machine() {
        let data = container(&[(b"IEND", b"")]);
        let mut scan = ChunkIndexer::default().chunks(Arc::new(data));
        assert_eq!(scan.state(), ScanState::AwaitingSignature);

        let first = scan.next().unwrap().unwrap();
        assert_eq!(first.chunk_type(), ChunkType::IEND);
        assert_eq!(scan.state(), ScanState::ScanningChunks { offset: 20 });

        assert!(scan.next().is_none());
        assert_eq!(scan.state(), ScanState::Done);
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_iterator_fused_after_error() {
        let mut scan = ChunkIndexer::default().chunks(Arc::new(b"nope".to_vec()));
        assert!(scan.next().unwrap().is_err());
        assert_eq!(scan.state(), ScanState::Failed);
        assert!(scan.next().is_none());
    }

    #[test]
    fn test_text_flag_follows_config() {
        let data = container(&[(b"tEXt", b"a"), (b"zTXt", b"b")]);
        let seq = ChunkIndexer::default().scan(Arc::new(data.clone())).unwrap();
        assert!(seq[0].is_text());
        assert!(!seq[1].is_text());

        let config = ContainerConfig::png().with_text_type(ChunkType::new(*b"zTXt"));
        let seq = ChunkIndexer::new(config).scan(Arc::new(data)).unwrap();
        assert!(!seq[0].is_text());
        assert!(seq[1].is_text());
    }
}
