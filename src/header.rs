// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The 9-byte block header
//!
//! ```text
//! offset 0..4  compressed size, including the header (u32 little-endian)
//! offset 4..6  compression id 0xFB10 (u16 little-endian, i.e. 10 FB)
//! offset 6..9  uncompressed size (u24 big-endian)
//! ```

use crate::constants::*;
use crate::error::{Error, Result};

/// A parsed block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Total block size in bytes, header included
    pub compressed_size: u32,
    /// Size of the data once decompressed, always below 16 MiB
    pub uncompressed_size: u32,
}

impl Header {
    /// Build a header, checking that the uncompressed size fits 24 bits.
    pub fn new(compressed_size: usize, uncompressed_size: usize) -> Result<Self> {
        if uncompressed_size >= MAX_UNCOMPRESSED_SIZE {
            return Err(Error::InputTooLarge(uncompressed_size));
        }
        let compressed_size =
            u32::try_from(compressed_size).map_err(|_| Error::OutputOverflow)?;

        Ok(Header {
            compressed_size,
            uncompressed_size: uncompressed_size as u32,
        })
    }

    /// Parse the header at the beginning of `src`.
    ///
    /// Only the magic is checked here, see [`Header::validate`] for the sizes.
    pub fn parse(src: &[u8]) -> Result<Self> {
        let Some(raw) = src.get(..HEADER_SIZE) else {
            return Err(Error::CorruptHeader("block shorter than header"));
        };

        if u16::from_le_bytes([raw[4], raw[5]]) != MAGIC {
            return Err(Error::CorruptHeader("bad magic"));
        }

        Ok(Header {
            compressed_size: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            uncompressed_size: u32::from_be_bytes([0, raw[6], raw[7], raw[8]]),
        })
    }

    /// Serialize into the first 9 bytes of `dst`.
    pub fn write(&self, dst: &mut [u8]) {
        dst[..HEADER_SIZE].copy_from_slice(&self.to_bytes());
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let c = self.compressed_size.to_le_bytes();
        let m = MAGIC.to_le_bytes();
        let u = self.uncompressed_size.to_be_bytes();
        [c[0], c[1], c[2], c[3], m[0], m[1], u[1], u[2], u[3]]
    }

    /// Check the declared sizes against what the caller knows.
    ///
    /// In strict mode both sizes must match exactly. A truncating reader
    /// may hold only a prefix of the block and want only a prefix of the
    /// data, so the header sizes need only be at least as large.
    pub fn validate(&self, compressed_len: usize, uncompressed_len: usize, truncate: bool) -> Result<()> {
        let c = self.compressed_size as usize;
        let u = self.uncompressed_size as usize;

        if truncate {
            if c < compressed_len {
                return Err(Error::CorruptHeader("compressed size smaller than block"));
            }
            if u < uncompressed_len {
                return Err(Error::CorruptHeader("uncompressed size smaller than requested"));
            }
        } else {
            if c != compressed_len {
                return Err(Error::CorruptHeader("compressed size mismatch"));
            }
            if u != uncompressed_len {
                return Err(Error::CorruptHeader("uncompressed size mismatch"));
            }
        }

        Ok(())
    }
}

/// Returns true if `src` starts with a header carrying the QFS magic.
pub fn is_compressed(src: &[u8]) -> bool {
    Header::parse(src).is_ok()
}

/// Returns the uncompressed size recorded in the block header.
pub fn decompressed_len(src: &[u8]) -> Result<usize> {
    Header::parse(src).map(|h| h.uncompressed_size as usize)
}
