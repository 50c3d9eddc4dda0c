#![no_main]

use std::sync::Arc;

use chunkweave::{ChunkIndexer, ContainerConfig, PNG_SIGNATURE, write_container};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    // Raw input, and the same input behind a valid signature so the chunk walk is reached
    let mut framed = PNG_SIGNATURE.to_vec();
    framed.extend_from_slice(&data);

    let short_sig = ContainerConfig::new(&b"\x89"[..]).unwrap();
    let indexers = [ChunkIndexer::default(), ChunkIndexer::new(short_sig)];

    for input in [data.clone(), framed] {
        for indexer in &indexers {
            let Ok(seq) = indexer.scan(Arc::new(input.clone())) else {
                continue;
            };

            // Verify: chunks are contiguous and stay inside the input
            let mut expected = seq.signature().len() as u64;
            for chunk in &seq {
                assert_eq!(chunk.offset(), expected);
                expected = chunk.end();
            }
            assert_eq!(expected + seq.trailing_bytes(), input.len() as u64);
            assert!(seq.trailing_bytes() < 4);

            // Verify: writing back reproduces the input minus trailing bytes
            let mut out = Vec::new();
            write_container(&mut out, seq.signature(), &seq).unwrap();
            assert_eq!(&out[..], &input[..expected as usize]);
        }
    }
});
