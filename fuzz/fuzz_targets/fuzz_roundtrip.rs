#![no_main]

use libfuzzer_sys::fuzz_target;
use qfs::{compress, decompress, decompress_truncated, Encoder};

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 {
        return;
    }

    // Size-gated compression
    if let Some(compressed) = compress(data) {
        assert!(compressed.len() < data.len(), "block not smaller than input");
        let decompressed = decompress(&compressed, data.len()).expect("gated decode failed");
        assert_eq!(data, &decompressed[..], "Gated roundtrip failed");
    }

    // Unbounded compression always produces a block
    let mut dst = vec![0u8; 9 + data.len() * 2 + 16];
    let n = Encoder::new()
        .compress_into(data, &mut dst)
        .expect("compress_into failed");
    let decompressed = decompress(&dst[..n], data.len()).expect("decode failed");
    assert_eq!(data, &decompressed[..], "Roundtrip failed");

    // Every prefix is recoverable in truncating mode
    let half = data.len() / 2;
    let prefix = decompress_truncated(&dst[..n], half).expect("truncated decode failed");
    assert_eq!(&data[..half], &prefix[..], "Truncated roundtrip failed");
});
