// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # QFS Compression
//!
//! This library implements RefPack, also known as QFS: the LZ77-style
//! compression used for resources inside DBPF game archives. Blocks carry a
//! 9-byte header with the `0xFB10` magic, so they interoperate with the
//! tools of that ecosystem.
//!
//! QFS provides:
//! - A hash-chain compressor with lazy matching (zlib level 9 tuning)
//! - A bounds-checked decompressor with an optional truncating mode
//! - Padding to a fixed block size
//! - Parallel batch compression with the `concurrent` feature
//!
//! Compression is only worth it when the block is smaller than the input,
//! so [`compress`] returns `None` for data that should be stored as is.
//!
//! ## Example
//!
//! ```rust
//! use qfs::{compress, decompress};
//!
//! let data = b"Hello, World! Hello, World! Hello, World! Hello, World!";
//! let compressed = compress(data).expect("data should shrink");
//! let decompressed = decompress(&compressed, data.len()).expect("decompression failed");
//! assert_eq!(data, &decompressed[..]);
//! ```

mod constants;
mod decode;
mod encode;
mod error;
mod header;
mod index;
mod matcher;
mod output;

#[cfg(feature = "concurrent")]
mod concurrent;

pub use constants::{HEADER_SIZE, MAX_UNCOMPRESSED_SIZE, MIN_INPUT_SIZE};
pub use decode::{decompress, decompress_block, decompress_truncated, Decoder};
pub use encode::{compress, try_compress, Encoder};
pub use error::{Error, Result};
pub use header::{decompressed_len, is_compressed, Header};

#[cfg(feature = "concurrent")]
pub use concurrent::{compress_all, decompress_all};
