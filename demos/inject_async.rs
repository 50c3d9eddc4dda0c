//! Async text injection example.
//!
//! Same as `inject_text`, but writes through a tokio file using the
//! `futures-io` compat layer.
//!
//! Run with:
//!     cargo run --example inject_async --features async-io -- in.png out.png "hello"

use std::env;
use std::sync::Arc;

use chunkweave::{ChunkBuilder, ChunkIndexer, FileSource, inject_async};
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [input, output, text] = args.as_slice() else {
        return Err("usage: inject_async <in> <out> <text>".into());
    };

    // Positioned reads are blocking; index off the async worker
    let path = input.clone();
    let sequence = tokio::task::spawn_blocking(move || {
        ChunkIndexer::default().scan(Arc::new(FileSource::open(path)?))
    })
    .await??;

    let mut payload = b"Comment\0".to_vec();
    payload.extend_from_slice(text.as_bytes());
    let chunk = ChunkBuilder::default().build_text_chunk(&payload)?;

    let file = tokio::fs::File::create(output).await?;
    let written = inject_async(file.compat_write(), &sequence, &chunk).await?;

    println!("Wrote {} bytes to {}", written, output);
    Ok(())
}
