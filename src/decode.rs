// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use log::debug;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::header::{decompressed_len, Header};

/// Decoder for QFS blocks
///
/// A strict decoder (the default) requires the header sizes to match the
/// block and the requested size exactly, and only 0xFC padding after the
/// last token. A truncating decoder produces just the first
/// `uncompressed_size` bytes and ignores whatever follows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    truncate: bool,
}

impl Decoder {
    /// Create a new strict decoder
    pub fn new() -> Self {
        Decoder { truncate: false }
    }

    /// Stop once the requested size is produced
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Decompress `src` into a new buffer of `uncompressed_size` bytes.
    pub fn decompress(&self, src: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
        self.check_header(src, uncompressed_size)?;

        let mut dst = vec![0u8; uncompressed_size];
        decode_tokens(&mut dst, &src[HEADER_SIZE..], self.truncate)?;

        Ok(dst)
    }

    /// Decompress `src` into `dst`; the length of `dst` is the requested size.
    pub fn decompress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        self.check_header(src, dst.len())?;
        decode_tokens(dst, &src[HEADER_SIZE..], self.truncate)
    }

    fn check_header(&self, src: &[u8], uncompressed_size: usize) -> Result<()> {
        // At least one token must follow the header
        if src.len() <= HEADER_SIZE {
            debug!("qfs: block of {} bytes has no tokens", src.len());
            return Err(Error::CorruptHeader("block shorter than header"));
        }

        let header = Header::parse(src)?;
        header
            .validate(src.len(), uncompressed_size, self.truncate)
            .inspect_err(|e| debug!("qfs: rejecting block: {}", e))
    }
}

/// Decompress a block that must produce exactly `uncompressed_size` bytes.
pub fn decompress(src: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
    Decoder::new().decompress(src, uncompressed_size)
}

/// Decompress the first `uncompressed_size` bytes of a block.
///
/// `src` may be a prefix of the block and the header may declare more data
/// than requested.
pub fn decompress_truncated(src: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
    Decoder::new().truncate(true).decompress(src, uncompressed_size)
}

/// Decompress a whole block using the uncompressed size from its header.
pub fn decompress_block(src: &[u8]) -> Result<Vec<u8>> {
    decompress(src, decompressed_len(src)?)
}

/// A decoded control token: `lit` bytes from the stream, then `copy` bytes
/// from `offset` back in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Command {
    lit: usize,
    copy: usize,
    offset: usize,
}

/// Decode the control bytes at the start of `src`.
/// Returns (command, bytes_consumed)
fn read_command(src: &[u8]) -> Result<(Command, usize)> {
    let b0 = src[0] as usize;
    let byte = |i: usize| {
        src.get(i)
            .map(|&b| b as usize)
            .ok_or(Error::TruncatedStream)
    };

    match src[0] {
        // 0oocccpp oooooooo
        0x00..=0x7F => {
            let b1 = byte(1)?;
            let cmd = Command {
                lit: b0 & 0x03,
                copy: ((b0 & 0x1C) >> 2) + 3,
                offset: ((b0 & 0x60) << 3) + b1 + 1,
            };
            Ok((cmd, 2))
        }
        // 10cccccc ppoooooo oooooooo
        0x80..=0xBF => {
            let (b1, b2) = (byte(1)?, byte(2)?);
            let cmd = Command {
                lit: b1 >> 6,
                copy: (b0 & 0x3F) + 4,
                offset: ((b1 & 0x3F) << 8) + b2 + 1,
            };
            Ok((cmd, 3))
        }
        // 110occpp oooooooo oooooooo cccccccc
        0xC0..=0xDF => {
            let (b1, b2, b3) = (byte(1)?, byte(2)?, byte(3)?);
            let cmd = Command {
                lit: b0 & 0x03,
                copy: ((b0 & 0x0C) << 6) + b3 + 5,
                offset: ((b0 & 0x10) << 12) + (b1 << 8) + b2 + 1,
            };
            Ok((cmd, 4))
        }
        // 111ppppp
        0xE0..=0xFB => {
            let cmd = Command {
                lit: (b0 - 0xDF) * 4,
                copy: 0,
                offset: 0,
            };
            Ok((cmd, 1))
        }
        // 111111pp
        0xFC..=0xFF => {
            let cmd = Command {
                lit: b0 - CTRL_STOP as usize,
                copy: 0,
                offset: 0,
            };
            Ok((cmd, 1))
        }
    }
}

/// Run the token stream `src` (header removed) into `dst`.
fn decode_tokens(dst: &mut [u8], src: &[u8], truncate: bool) -> Result<()> {
    let mut d = 0; // destination index
    let mut s = 0; // source index

    loop {
        let (cmd, n) = read_command(&src[s..])?;
        s += n;

        let Command {
            mut lit,
            mut copy,
            offset,
        } = cmd;

        if lit > src.len() - s || lit + copy > dst.len() - d {
            if !truncate {
                return Err(if lit > src.len() - s {
                    Error::TruncatedStream
                } else {
                    Error::OutputOverflow
                });
            }
            lit = lit.min(dst.len() - d);
            copy = copy.min(dst.len() - d - lit);
            if lit > src.len() - s {
                return Err(Error::TruncatedStream);
            }
        }

        dst[d..d + lit].copy_from_slice(&src[s..s + lit]);
        d += lit;
        s += lit;

        if copy > 0 {
            if offset > d {
                debug!("qfs: back-reference {} before start of output at {}", offset, d);
                return Err(Error::CorruptBackReference {
                    offset,
                    produced: d,
                });
            }
            copy_within(dst, d, offset, copy);
            d += copy;
        }

        if s >= src.len() || d >= dst.len() {
            break;
        }
    }

    if !truncate && src[s..].iter().any(|&b| b != CTRL_STOP) {
        debug!("qfs: {} bytes of trailing garbage", src.len() - s);
        return Err(Error::TrailingGarbage);
    }

    if d != dst.len() {
        return Err(Error::TruncatedStream);
    }

    Ok(())
}

/// Copy data within the same buffer, handling overlapping regions correctly.
/// Overlapping copies repeat the pattern, so offset 1 is a run of one byte.
#[inline]
fn copy_within(dst: &mut [u8], d: usize, offset: usize, length: usize) {
    let src_start = d - offset;

    if offset == 1 {
        let b = dst[src_start];
        dst[d..d + length].fill(b);
    } else if offset >= length {
        dst.copy_within(src_start..src_start + length, d);
    } else {
        // Overlapping copy - must be done byte by byte to get the repeating pattern
        for i in 0..length {
            dst[d + i] = dst[src_start + i];
        }
    }
}
