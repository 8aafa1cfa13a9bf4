// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Size of the block header
pub const HEADER_SIZE: usize = 9;

/// Compression id stored in the header (little-endian on the wire)
pub const MAGIC: u16 = 0xFB10;

/// The uncompressed size field is 24 bits wide
pub const MAX_UNCOMPRESSED_SIZE: usize = 1 << 24;

/// Inputs shorter than this are never worth compressing
pub const MIN_INPUT_SIZE: usize = 14;

/// Shortest encodable back-reference
pub const MIN_MATCH: usize = 3;

/// Longest encodable back-reference
pub const MAX_MATCH: usize = 1028;

/// Sliding window size, also the largest back-reference distance
pub const WINDOW_SIZE: usize = 1 << 17;
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Hash table geometry for the 3-byte rolling hash
pub const HASH_BITS: u32 = 16;
pub const HASH_SIZE: usize = 1 << HASH_BITS;
pub const HASH_MASK: u32 = (1 << HASH_BITS) - 1;
pub const HASH_SHIFT: u32 = 6;

/// Match search tuning (zlib level 9 parameters)
pub const GOOD_LENGTH: usize = 32;
pub const MAX_LAZY: usize = 258;
pub const NICE_LENGTH: usize = 258;
pub const MAX_CHAIN: usize = 4096;

/// First control byte of each token shape. Anything below
/// `CTRL_MEDIUM` is a short (2-byte) copy.
pub const CTRL_MEDIUM: u8 = 0x80;
pub const CTRL_LONG: u8 = 0xC0;
pub const CTRL_LITERAL: u8 = 0xE0;
pub const CTRL_STOP: u8 = 0xFC;

/// Longest literal run a single literal-only control byte can carry
pub const MAX_LITERAL_RUN: usize = 112;

/// Copy token limits. Offsets are exclusive bounds on the stored
/// (distance - 1) field, counts are inclusive.
pub const SHORT_MAX_OFFSET: usize = 1 << 10;
pub const SHORT_MAX_COUNT: usize = 10;
pub const MEDIUM_MAX_OFFSET: usize = 1 << 14;
pub const MEDIUM_MIN_COUNT: usize = 4;
pub const MEDIUM_MAX_COUNT: usize = 67;
pub const LONG_MIN_COUNT: usize = 5;
