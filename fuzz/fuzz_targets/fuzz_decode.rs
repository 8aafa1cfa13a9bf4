#![no_main]

use libfuzzer_sys::fuzz_target;
use qfs::{decompress, decompress_block, decompress_truncated};

fuzz_target!(|data: &[u8]| {
    // Try to decode arbitrary data - should never panic
    // Either succeeds or returns an error
    let _ = decompress_block(data);

    if data.len() >= 2 {
        let size = u16::from_le_bytes([data[0], data[1]]) as usize;
        let _ = decompress(&data[2..], size);
        let _ = decompress_truncated(&data[2..], size);
    }
});
