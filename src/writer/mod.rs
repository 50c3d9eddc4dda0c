//! Emitting containers.
//!
//! - [`ContainerWriter`] - Writes a signature and chunk records to a sink
//! - [`RawChunk`] - A chunk that can stream its full record
//! - [`Segment`] / [`splice_after`] - Write plans that place a synthetic chunk
//! - [`write_container`] / [`inject`] - One-call helpers
//!
//! Original chunks are streamed from their source through a fixed copy
//! buffer, so payloads are never held in memory whole.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chunkweave::{ChunkBuilder, ChunkIndexer, ChunkType, PNG_SIGNATURE, inject};
//!
//! let builder = ChunkBuilder::default();
//! let mut png = PNG_SIGNATURE.to_vec();
//! png.extend_from_slice(builder.build(ChunkType::IHDR, &[0; 13])?.as_bytes());
//! png.extend_from_slice(builder.build(ChunkType::IEND, b"")?.as_bytes());
//!
//! let sequence = ChunkIndexer::default().scan(Arc::new(png))?;
//! let comment = builder.build_text_chunk(b"Comment\0hello")?;
//!
//! let mut out = Vec::new();
//! let written = inject(&mut out, &sequence, &comment)?;
//! assert_eq!(written, out.len() as u64);
//! # Ok::<(), chunkweave::ContainerError>(())
//! ```

#[cfg(feature = "async-io")]
mod async_write;
mod segment;

#[cfg(feature = "async-io")]
pub use async_write::{inject_async, write_container_async};
pub use segment::{RawChunk, Segment, splice_after};

use std::io::{self, Write};

use crate::builder::BuiltChunk;
use crate::error::{ContainerError, Result};
use crate::index::ChunkSequence;
use crate::source::ByteSource;

/// Size of the buffer chunk records are copied through.
const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Writes a container to a sink, one record at a time.
///
/// The writer does not check ordering or duplicates; it emits exactly what
/// it is given.
#[derive(Debug)]
pub struct ContainerWriter<W> {
    sink: W,
    written: u64,
    buffer: Vec<u8>,
}

impl<W: Write> ContainerWriter<W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            written: 0,
            buffer: vec![0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Writes the container signature.
    pub fn write_signature(&mut self, signature: &[u8]) -> Result<()> {
        write_fully(&mut self.sink, signature, signature.len() as u64, 0)?;
        self.written += signature.len() as u64;
        Ok(())
    }

    /// Writes one full chunk record verbatim.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::IncompleteWrite`] if the sink stops accepting bytes
    /// - [`ContainerError::Io`] if the source or sink fails
    pub fn write_chunk<C: RawChunk + ?Sized>(&mut self, chunk: &C) -> Result<()> {
        let expected = chunk.raw_len();
        let mut pos = 0u64;

        while pos < expected {
            let n = chunk.read_raw(pos, &mut self.buffer)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "source ended inside chunk",
                )
                .into());
            }
            write_fully(&mut self.sink, &self.buffer[..n], expected, pos)?;
            pos += n as u64;
        }

        self.written += expected;
        tracing::debug!(chunk_type = %chunk.chunk_type(), len = expected, "wrote chunk");
        Ok(())
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Returns a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consumes the writer and returns the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Writes `data` in full, retrying on interruption.
///
/// `expected` and `already` describe the record `data` belongs to, so a
/// stalled sink is reported against the whole record.
fn write_fully<W: Write + ?Sized>(
    sink: &mut W,
    mut data: &[u8],
    expected: u64,
    already: u64,
) -> Result<()> {
    let mut written = already;
    while !data.is_empty() {
        match sink.write(data) {
            Ok(0) => return Err(ContainerError::IncompleteWrite { expected, written }),
            Ok(n) => {
                data = &data[n..];
                written += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Writes `signature` followed by each chunk, in order, then flushes.
///
/// Returns the number of bytes written.
pub fn write_container<W, I>(sink: W, signature: &[u8], chunks: I) -> Result<u64>
where
    W: Write,
    I: IntoIterator,
    I::Item: RawChunk,
{
    let mut writer = ContainerWriter::new(sink);
    writer.write_signature(signature)?;

    let mut count = 0usize;
    for chunk in chunks {
        writer.write_chunk(&chunk)?;
        count += 1;
    }
    writer.flush()?;

    tracing::debug!(chunks = count, bytes = writer.bytes_written(), "container written");
    Ok(writer.bytes_written())
}

/// Writes `sequence` with `synthetic` placed directly after its first chunk.
///
/// For an empty sequence the output is the signature followed by
/// `synthetic` alone.
pub fn inject<W, S>(sink: W, sequence: &ChunkSequence<S>, synthetic: &BuiltChunk) -> Result<u64>
where
    W: Write,
    S: ByteSource + ?Sized,
{
    let plan = segment::injection_plan(sequence, synthetic);
    write_container(sink, sequence.signature(), plan)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::builder::ChunkBuilder;
    use crate::chunk::ChunkType;
    use crate::config::PNG_SIGNATURE;
    use crate::index::ChunkIndexer;

    /// Accepts `limit` bytes, then reports a zero-length write.
    struct StallingSink {
        data: Vec<u8>,
        limit: usize,
    }

    impl Write for StallingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit - self.data.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts one byte per call and is interrupted every other call.
    struct TricklingSink {
        data: Vec<u8>,
        interrupt: bool,
    }

    impl Write for TricklingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            self.data.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A source that fails one read with `Interrupted` once armed.
    struct FlakySource {
        data: Vec<u8>,
        armed: AtomicBool,
    }

    impl ByteSource for FlakySource {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
            if self.armed.swap(false, Ordering::SeqCst) {
                return Err(io::ErrorKind::Interrupted.into());
            }
            self.data.read_at(offset, buf)
        }

        fn len(&self) -> u64 {
            self.data.len() as u64
        }
    }

    fn png(records: &[(ChunkType, &[u8])]) -> Vec<u8> {
        let builder = ChunkBuilder::default();
        let mut out = PNG_SIGNATURE.to_vec();
        for (ty, payload) in records {
            out.extend_from_slice(builder.build(*ty, payload).unwrap().as_bytes());
        }
        out
    }

    #[test]
    fn test_write_container_round_trip() {
        let data = png(&[
            (ChunkType::IHDR, &[7u8; 13]),
            (ChunkType::IDAT, &[1u8; 20_000]),
            (ChunkType::IEND, b""),
        ]);
        let seq = ChunkIndexer::default().scan(Arc::new(data.clone())).unwrap();

        let mut out = Vec::new();
        let n = write_container(&mut out, seq.signature(), &seq).unwrap();
        assert_eq!(out, data);
        assert_eq!(n, data.len() as u64);
    }

    #[test]
    fn test_inject_after_header() {
        let header = ChunkBuilder::default().build(ChunkType::IHDR, &[0u8; 13]).unwrap();
        let trailer = ChunkBuilder::default().build(ChunkType::IEND, b"").unwrap();
        let text = ChunkBuilder::default().build_text_chunk(b"hello").unwrap();
        let data = png(&[(ChunkType::IHDR, &[0u8; 13]), (ChunkType::IEND, b"")]);
        let seq = ChunkIndexer::default().scan(Arc::new(data)).unwrap();

        let mut out = Vec::new();
        inject(&mut out, &seq, &text).unwrap();

        let mut expected = PNG_SIGNATURE.to_vec();
        expected.extend_from_slice(header.as_bytes());
        expected.extend_from_slice(text.as_bytes());
        expected.extend_from_slice(trailer.as_bytes());
        assert_eq!(out, expected);
    }

    #[test]
    fn test_inject_into_empty_sequence() {
        let seq = ChunkIndexer::default()
            .scan(Arc::new(PNG_SIGNATURE.to_vec()))
            .unwrap();
        let text = ChunkBuilder::default().build_text_chunk(b"x").unwrap();

        let mut out = Vec::new();
        inject(&mut out, &seq, &text).unwrap();
        assert_eq!(&out[..8], &PNG_SIGNATURE);
        assert_eq!(&out[8..], &text.as_bytes()[..]);
    }

    #[test]
    fn test_stalled_sink_is_incomplete_write() {
        let data = png(&[(ChunkType::IHDR, &[0u8; 13])]);
        let seq = ChunkIndexer::default().scan(Arc::new(data)).unwrap();
        let sink = StallingSink {
            data: Vec::new(),
            limit: 8 + 10,
        };

        let err = write_container(sink, seq.signature(), &seq).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::IncompleteWrite {
                expected: 25,
                written: 10
            }
        ));
    }

    #[test]
    fn test_interrupted_writes_are_retried() {
        let data = png(&[(ChunkType::IEND, b"")]);
        let seq = ChunkIndexer::default().scan(Arc::new(data.clone())).unwrap();
        let mut sink = TricklingSink {
            data: Vec::new(),
            interrupt: false,
        };

        write_container(&mut sink, seq.signature(), &seq).unwrap();
        assert_eq!(sink.data, data);
    }

    #[test]
    fn test_writer_counts_bytes() {
        let text = ChunkBuilder::default().build_text_chunk(b"abc").unwrap();
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_signature(&PNG_SIGNATURE).unwrap();
        writer.write_chunk(&text).unwrap();

        assert_eq!(writer.bytes_written(), 8 + 15);
        assert_eq!(writer.get_ref().len(), 23);
        assert_eq!(writer.into_inner().len(), 23);
    }

    #[test]
    fn test_interrupted_source_read_is_retried() {
        let data = png(&[(ChunkType::IHDR, &[5u8; 13]), (ChunkType::IEND, b"")]);
        let source = Arc::new(FlakySource {
            data: data.clone(),
            armed: AtomicBool::new(false),
        });
        let seq = ChunkIndexer::default().scan(Arc::clone(&source)).unwrap();
        let text = ChunkBuilder::default().build_text_chunk(b"retry").unwrap();

        let plain = ChunkIndexer::default().scan(Arc::new(data)).unwrap();
        let mut expected = Vec::new();
        inject(&mut expected, &plain, &text).unwrap();

        source.armed.store(true, Ordering::SeqCst);
        let mut out = Vec::new();
        inject(&mut out, &seq, &text).unwrap();

        assert_eq!(out, expected);
        assert!(!source.armed.load(Ordering::SeqCst));
    }
}
