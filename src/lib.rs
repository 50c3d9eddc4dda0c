//! chunkweave
//!
//! Index, build and splice chunks in PNG-style containers.
//!
//! A container is a fixed signature followed by records of the form
//! `length (u32 BE) | type (4 bytes) | payload | crc32 (u32 BE)`.
//! `chunkweave` locates every record without copying payloads, builds new
//! records with correct framing, and writes containers back out with new
//! records spliced in.
//!
//! The crate intentionally:
//! - does NOT decode payloads (no pixels, no decompression)
//! - does NOT verify checksums of chunks it reads
//! - does NOT enforce chunk ordering rules
//! - does NOT modify sources in place
//!
//! It only does one thing: **signature + records → windows → records + signature**
//!
//! # Inspect
//!
//! ```no_run
//! use std::sync::Arc;
//! use chunkweave::{ChunkIndexer, ContainerError, FileSource};
//!
//! fn main() -> Result<(), ContainerError> {
//!     let source = Arc::new(FileSource::open("image.png")?);
//!     let sequence = ChunkIndexer::default().scan(source)?;
//!
//!     for chunk in &sequence {
//!         println!("{chunk}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Inject
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//! use std::sync::Arc;
//! use chunkweave::{ChunkBuilder, ChunkIndexer, ContainerError, FileSource, inject};
//!
//! fn main() -> Result<(), ContainerError> {
//!     let sequence = ChunkIndexer::default().scan(Arc::new(FileSource::open("in.png")?))?;
//!     let comment = ChunkBuilder::default().build_text_chunk(b"Comment\0hello")?;
//!
//!     let out = BufWriter::new(File::create("out.png")?);
//!     inject(out, &sequence, &comment)?;
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use chunkweave::{BuiltChunk, ChunkSequence, FileSource, inject_async};
//! use futures_io::AsyncWrite;
//!
//! async fn demo<W: AsyncWrite + Unpin>(
//!     sink: W,
//!     sequence: &ChunkSequence<FileSource>,
//!     comment: &BuiltChunk,
//! ) -> Result<u64, chunkweave::ContainerError> {
//!     inject_async(sink, sequence, comment).await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod chunk;
mod config;
mod error;
mod index;
mod source;
mod window;
mod writer;

mod checksum; // crc32fast-backed

//
// Public surface
//

pub use builder::{BuiltChunk, ChunkBuilder};
pub use checksum::Crc32;
pub use chunk::{CHECKSUM_FIELD_SIZE, ChunkType, ChunkWindow, LENGTH_FIELD_SIZE, RECORD_OVERHEAD};
pub use config::{ChecksumScope, ContainerConfig, PNG_SIGNATURE};
pub use error::{ContainerError, Result};
pub use index::{ChunkIndexer, ChunkScan, ChunkSequence, ScanState};
pub use source::{ByteSource, FileSource};
pub use window::ByteWindow;
pub use writer::{ContainerWriter, RawChunk, Segment, inject, splice_after, write_container};

#[cfg(feature = "async-io")]
pub use writer::{inject_async, write_container_async};
