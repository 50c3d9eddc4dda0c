//! Chunk listing example.
//!
//! Prints every chunk of a container with its offset, size and checksum.
//! Textual chunks also show their payload.
//!
//! Run with:
//!     cargo run --example inspect -- /path/to/image.png
//!
//! Set `RUST_LOG=chunkweave=debug` to see the scan as it happens.

use std::env;
use std::sync::Arc;

use chunkweave::{ChunkIndexer, FileSource};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args().nth(1).ok_or("usage: inspect <file>")?;
    println!("Inspecting: {}\n", path);

    let source = Arc::new(FileSource::open(&path)?);
    let sequence = ChunkIndexer::default().scan(source)?;

    for (i, chunk) in sequence.iter().enumerate() {
        let stored = chunk.stored_checksum()?;
        let verified = if chunk.compute_checksum()? == stored {
            "ok"
        } else {
            "MISMATCH"
        };
        println!(
            "{:>3}: offset={:>10}  {:<28} crc={:08x} ({})",
            i,
            chunk.offset(),
            chunk.describe(),
            stored,
            verified
        );

        if let Some(text) = chunk.text()? {
            println!("     text: {}", String::from_utf8_lossy(&text));
        }
    }

    println!(
        "\nTotal: {} chunks, {} bytes",
        sequence.len(),
        sequence.container_len()
    );
    if sequence.trailing_bytes() > 0 {
        println!("Ignored {} trailing bytes", sequence.trailing_bytes());
    }

    Ok(())
}
