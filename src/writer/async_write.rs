//! Async container writing over `futures-io`.
//!
//! Works with any runtime whose writers implement
//! `futures_io::AsyncWrite` (tokio through `tokio-util`'s compat layer,
//! async-std, smol). Records from the source are read with positioned reads
//! on the calling task; only the sink is async.

use std::io;

use futures_io::AsyncWrite;
use futures_util::io::AsyncWriteExt;

use super::segment::{self, RawChunk};
use super::COPY_BUFFER_SIZE;
use crate::builder::BuiltChunk;
use crate::error::{ContainerError, Result};
use crate::index::ChunkSequence;
use crate::source::ByteSource;

/// Async version of [`write_container`](crate::write_container).
///
/// Same output and error mapping. The sink is flushed before returning.
pub async fn write_container_async<W, I>(mut sink: W, signature: &[u8], chunks: I) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    I: IntoIterator,
    I::Item: RawChunk,
{
    write_fully(&mut sink, signature, signature.len() as u64, 0).await?;
    let mut written = signature.len() as u64;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut count = 0usize;
    for chunk in chunks {
        let expected = chunk.raw_len();
        let mut pos = 0u64;
        while pos < expected {
            let n = chunk.read_raw(pos, &mut buffer)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "source ended inside chunk",
                )
                .into());
            }
            write_fully(&mut sink, &buffer[..n], expected, pos).await?;
            pos += n as u64;
        }
        written += expected;
        count += 1;
        tracing::debug!(chunk_type = %chunk.chunk_type(), len = expected, "wrote chunk");
    }
    sink.flush().await?;

    tracing::debug!(chunks = count, bytes = written, "container written");
    Ok(written)
}

/// Async version of [`inject`](crate::inject).
pub async fn inject_async<W, S>(
    sink: W,
    sequence: &ChunkSequence<S>,
    synthetic: &BuiltChunk,
) -> Result<u64>
where
    W: AsyncWrite + Unpin,
    S: ByteSource + ?Sized,
{
    let plan = segment::injection_plan(sequence, synthetic);
    write_container_async(sink, sequence.signature(), plan).await
}

async fn write_fully<W: AsyncWrite + Unpin>(
    sink: &mut W,
    mut data: &[u8],
    expected: u64,
    already: u64,
) -> Result<()> {
    let mut written = already;
    while !data.is_empty() {
        match sink.write(data).await {
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
