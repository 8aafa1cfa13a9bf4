// Copyright 2024 Karpeles Lab Inc.
// Example of basic QFS compression/decompression

use qfs::{compress, decompress, decompress_truncated, decompressed_len, Encoder};

fn main() {
    let original_data = b"Hello, World! This is a test of QFS compression. \
                          QFS is the RefPack scheme used for resources stored \
                          in DBPF archives. QFS blocks carry their own header.";

    println!("Original data: {} bytes", original_data.len());

    match compress(original_data) {
        Some(compressed) => {
            println!("Compressed: {} bytes", compressed.len());
            println!(
                "Ratio: {:.2}%\n",
                (compressed.len() as f64 / original_data.len() as f64) * 100.0
            );

            match decompress(&compressed, original_data.len()) {
                Ok(decompressed) if decompressed == original_data => {
                    println!("✓ Data matches original!")
                }
                Ok(_) => println!("✗ Data mismatch!"),
                Err(e) => eprintln!("Decompression error: {}", e),
            }

            // Only the first few bytes
            if let Ok(prefix) = decompress_truncated(&compressed, 13) {
                println!("Prefix: {:?}", String::from_utf8_lossy(&prefix));
            }
        }
        None => println!("Not worth compressing, store as is"),
    }

    // Archives often reserve a fixed slot for each entry
    println!("\n--- Padded Block ---");
    let repeated_data = vec![b'A'; 10000];
    let mut slot = vec![0u8; 256];
    match Encoder::new().pad(true).compress_into(&repeated_data, &mut slot) {
        Ok(n) => {
            println!("Original: {} bytes", repeated_data.len());
            println!("Block: {} bytes", n);
            println!("Header says: {:?} bytes", decompressed_len(&slot));
        }
        Err(e) => eprintln!("Compression error: {}", e),
    }
}
