//! Text injection example.
//!
//! Copies a container, adding one textual chunk directly after its header.
//!
//! Run with:
//!     cargo run --example inject_text -- in.png out.png "Comment" "hello"

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use chunkweave::{ChunkBuilder, ChunkIndexer, ContainerConfig, FileSource, inject};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [input, output, keyword, text] = args.as_slice() else {
        return Err("usage: inject_text <in> <out> <keyword> <text>".into());
    };

    let config = ContainerConfig::png();
    let sequence = ChunkIndexer::new(config.clone()).scan(Arc::new(FileSource::open(input)?))?;

    // tEXt payload: keyword, NUL separator, text
    let mut payload = keyword.as_bytes().to_vec();
    payload.push(0);
    payload.extend_from_slice(text.as_bytes());
    let chunk = ChunkBuilder::new(config).build_text_chunk(&payload)?;

    let sink = BufWriter::new(File::create(output)?);
    let written = inject(sink, &sequence, &chunk)?;

    println!("Wrote {} bytes to {}", written, output);
    println!("Added {} after {} original chunks", chunk, sequence.len());
    Ok(())
}
