// Copyright 2024 Karpeles Lab Inc.
// Property-based tests using proptest

use proptest::prelude::*;
use qfs::{compress, decompress, decompress_truncated, Encoder, HEADER_SIZE, MIN_INPUT_SIZE};

fn compress_unbounded(data: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; HEADER_SIZE + data.len() * 2 + 16];
    let n = Encoder::new()
        .compress_into(data, &mut dst)
        .expect("compress_into failed");
    dst.truncate(n);
    dst
}

proptest! {
    #[test]
    fn prop_roundtrip(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        let block = compress_unbounded(&data);
        let decompressed = decompress(&block, data.len()).expect("decode failed");
        prop_assert_eq!(&data, &decompressed);

        if let Some(compressed) = compress(&data) {
            prop_assert!(compressed.len() < data.len());
            prop_assert_eq!(compressed, block);
        }
    }

    #[test]
    fn prop_short_inputs_not_compressed(data in prop::collection::vec(any::<u8>(), 0..MIN_INPUT_SIZE)) {
        prop_assert_eq!(compress(&data), None);
    }

    #[test]
    fn prop_compression_improves(data in prop::collection::vec(any::<u8>(), 100..1000)) {
        let repeated = data.repeat(10);
        let compressed = compress(&repeated).expect("repeated data should compress");

        prop_assert!(compressed.len() < repeated.len() / 2);
        prop_assert_eq!(decompress(&compressed, repeated.len()).unwrap(), repeated);
    }

    #[test]
    fn prop_all_same_byte(byte: u8, size in 15usize..10000) {
        let data = vec![byte; size];
        let compressed = compress(&data).expect("runs should compress");
        let decompressed = decompress(&compressed, size).expect("decode failed");
        prop_assert_eq!(data, decompressed);

        if size > 100 {
            prop_assert!(compressed.len() < size / 5);
        }
    }

    #[test]
    fn prop_truncated_prefix(data in prop::collection::vec(0u8..4, 0..5000), cut in any::<prop::sample::Index>()) {
        let block = compress_unbounded(&data);
        let size = cut.index(data.len() + 1);

        let prefix = decompress_truncated(&block, size).expect("truncated decode failed");
        prop_assert_eq!(&prefix[..], &data[..size]);
    }

    #[test]
    fn prop_padded_roundtrip(data in prop::collection::vec(0u8..8, 0..2000), extra in 0usize..64) {
        let plain = compress_unbounded(&data);
        let mut dst = vec![0u8; plain.len() + extra];

        let n = Encoder::new().pad(true).compress_into(&data, &mut dst).expect("pad failed");
        prop_assert_eq!(n, dst.len());
        prop_assert_eq!(&dst[HEADER_SIZE..plain.len()], &plain[HEADER_SIZE..]);
        prop_assert_eq!(decompress(&dst, data.len()).unwrap(), data);
    }

    #[test]
    fn prop_decode_never_panics(data: Vec<u8>, size in 0usize..4096) {
        prop_assume!(data.len() <= 10_000);

        let _ = decompress(&data, size);
        let _ = decompress_truncated(&data, size);
    }

    #[test]
    fn prop_decode_tokens_never_panic(tokens in prop::collection::vec(any::<u8>(), 1..512), size in 0usize..4096) {
        // Valid header, arbitrary tokens
        let mut src = ((HEADER_SIZE + tokens.len()) as u32).to_le_bytes().to_vec();
        src.extend_from_slice(&[0x10, 0xFB]);
        src.extend_from_slice(&(size as u32).to_be_bytes()[1..]);
        src.extend_from_slice(&tokens);

        let _ = decompress(&src, size);
        let _ = decompress_truncated(&src, size);
    }
}
