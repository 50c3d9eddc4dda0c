#![no_main]

use std::sync::Arc;

use chunkweave::{ChunkBuilder, ChunkIndexer, PNG_SIGNATURE, inject};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (body, text) = input;

    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(&body);
    let Ok(seq) = ChunkIndexer::default().scan(Arc::new(data)) else {
        return;
    };

    let synthetic = ChunkBuilder::default().build_text_chunk(&text).unwrap();
    let mut out = Vec::new();
    let written = inject(&mut out, &seq, &synthetic).unwrap();
    assert_eq!(written, out.len() as u64);
    assert_eq!(written, seq.container_len() + synthetic.len() as u64);

    // Verify: output rescans with the synthetic chunk in second place (or first if alone)
    let rescanned = ChunkIndexer::default().scan(Arc::new(out)).unwrap();
    assert_eq!(rescanned.len(), seq.len() + 1);
    let position = usize::from(!seq.is_empty());
    assert_eq!(rescanned[position].payload().to_bytes().unwrap(), text);
    assert_eq!(rescanned[position].stored_checksum().unwrap(), synthetic.checksum());
});
