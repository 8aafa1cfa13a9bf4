// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Token encoder
//!
//! Token layouts (`p` literal count, `c` copy count, `o` offset - 1):
//!
//! ```text
//! short   0oocccpp oooooooo                       c 3..=10   o < 1024
//! medium  10cccccc ppoooooo oooooooo              c 4..=67   o < 16384
//! long    110occpp oooooooo oooooooo cccccccc     c 5..=1028 o < 131072
//! literal 111ppppp                                (p + 1) * 4 bytes, 4..=112
//! stop    111111pp                                p bytes, 0..=3
//! ```
//!
//! Every copy token also carries up to 3 literal bytes that precede the copy.

use crate::constants::*;
use crate::error::{Error, Result};

/// Build the control bytes of a copy token. Returns the bytes and how many
/// of them are used.
///
/// The match must be encodable: callers drop 3-byte matches farther than
/// 1024 bytes and 4-byte matches farther than 16384 bytes.
pub(crate) fn copy_token(offset: usize, count: usize, lit: usize) -> ([u8; 4], usize) {
    debug_assert!(lit <= 3);
    debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&count));

    if offset < SHORT_MAX_OFFSET && count <= SHORT_MAX_COUNT {
        let b0 = ((offset >> 3) & 0x60) | ((count - 3) << 2) | lit;
        ([b0 as u8, offset as u8, 0, 0], 2)
    } else if offset < MEDIUM_MAX_OFFSET && (MEDIUM_MIN_COUNT..=MEDIUM_MAX_COUNT).contains(&count) {
        let b0 = CTRL_MEDIUM as usize + (count - MEDIUM_MIN_COUNT);
        let b1 = (lit << 6) | (offset >> 8);
        ([b0 as u8, b1 as u8, offset as u8, 0], 3)
    } else {
        debug_assert!(offset < WINDOW_SIZE && count >= LONG_MIN_COUNT);
        let c = count - LONG_MIN_COUNT;
        let b0 = CTRL_LONG as usize + ((offset >> 12) & 0x10) + ((c >> 6) & 0x0C) + lit;
        ([b0 as u8, (offset >> 8) as u8, offset as u8, c as u8], 4)
    }
}

/// Serializes literal runs and matches into a fixed-capacity destination.
///
/// Tokens start after the header; the header itself is written by the caller
/// once the final size is known.
pub(crate) struct TokenWriter<'a> {
    src: &'a [u8],
    dst: &'a mut [u8],
    /// Write position in `dst`
    d: usize,
    /// Source bytes accounted for so far
    emitted: usize,
}

impl<'a> TokenWriter<'a> {
    pub(crate) fn new(src: &'a [u8], dst: &'a mut [u8]) -> Self {
        TokenWriter {
            src,
            dst,
            d: HEADER_SIZE,
            emitted: 0,
        }
    }

    #[inline]
    fn reserve(&self, n: usize) -> Result<()> {
        if self.d + n > self.dst.len() {
            return Err(Error::OutputOverflow);
        }
        Ok(())
    }

    fn put_literals(&mut self, n: usize) {
        let (d, s) = (self.d, self.emitted);
        self.dst[d..d + n].copy_from_slice(&self.src[s..s + n]);
        self.d += n;
        self.emitted += n;
    }

    /// Emit the literals up to `to`, then a copy of `count` bytes from
    /// `from` to `to`. A `count` of 0 emits the final stop token instead.
    pub(crate) fn emit(&mut self, from: usize, to: usize, count: usize) -> Result<()> {
        debug_assert!(count == 0 || self.src[from..from + count] == self.src[to..to + count]);

        let mut lit = to - self.emitted;

        while lit >= 4 {
            let run = (lit & !3).min(MAX_LITERAL_RUN);
            self.reserve(1 + run)?;
            self.dst[self.d] = CTRL_LITERAL + (run / 4 - 1) as u8;
            self.d += 1;
            self.put_literals(run);
            lit -= run;
        }

        let (token, n) = if count == 0 {
            ([CTRL_STOP + lit as u8, 0, 0, 0], 1)
        } else {
            copy_token(to - from - 1, count, lit)
        };

        self.reserve(n + lit)?;
        self.dst[self.d..self.d + n].copy_from_slice(&token[..n]);
        self.d += n;
        self.put_literals(lit);
        self.emitted += count;

        Ok(())
    }

    /// Flush the remaining literals with the stop token and return the block
    /// length. With `pad`, the rest of the destination is filled with stop
    /// bytes and the whole destination becomes the block.
    pub(crate) fn finish(mut self, pad: bool) -> Result<usize> {
        let end = self.src.len();
        self.emit(end, end, 0)?;

        if pad {
            self.dst[self.d..].fill(CTRL_STOP);
            self.d = self.dst.len();
        }

        Ok(self.d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &[u8], capacity: usize, pad: bool) -> Result<Vec<u8>> {
        let mut dst = vec![0u8; capacity];
        let n = TokenWriter::new(src, &mut dst).finish(pad)?;
        Ok(dst[HEADER_SIZE..n].to_vec())
    }

    #[test]
    fn test_short_token_boundary() {
        let (t, n) = copy_token(1023, 10, 0);
        assert_eq!(n, 2);
        assert_eq!(&t[..2], &[0x7C, 0xFF]);

        // one more byte of length or offset no longer fits
        assert_ne!(copy_token(1023, 11, 0).1, 2);
        assert_ne!(copy_token(1024, 10, 0).1, 2);
        assert_eq!(copy_token(1024, 10, 0).1, 3);
    }

    #[test]
    fn test_short_token_fields() {
        // offset 0x2AB, count 5, 2 literals
        let (t, n) = copy_token(0x2AB, 5, 2);
        assert_eq!(n, 2);
        assert_eq!(t[0], 0x40 | (2 << 2) | 2);
        assert_eq!(t[1], 0xAB);
    }

    #[test]
    fn test_medium_token_fields() {
        let (t, n) = copy_token(0x3FFF, 67, 3);
        assert_eq!(n, 3);
        assert_eq!(&t[..3], &[0xBF, 0xFF, 0xFF]);

        let (t, n) = copy_token(0, 11, 1);
        assert_eq!(n, 3);
        assert_eq!(&t[..3], &[0x87, 0x40, 0x00]);
    }

    #[test]
    fn test_long_token_fields() {
        let (t, n) = copy_token(0x1FFFF, MAX_MATCH, 3);
        assert_eq!(n, 4);
        assert_eq!(&t[..4], &[0xDF, 0xFF, 0xFF, 0xFF]);

        let (t, n) = copy_token(16384, 5, 0);
        assert_eq!(n, 4);
        assert_eq!(&t[..4], &[0xC0, 0x40, 0x00, 0x00]);

        let (_, n) = copy_token(100, 68, 0);
        assert_eq!(n, 4);
    }

    #[test]
    fn test_literal_runs() {
        let src: Vec<u8> = (0..7).collect();
        assert_eq!(
            tokens(&src, 64, false).unwrap(),
            vec![0xE0, 0, 1, 2, 3, 0xFF, 4, 5, 6]
        );

        let src = vec![9u8; 117];
        let out = tokens(&src, 256, false).unwrap();
        assert_eq!(out[0], 0xFB);
        assert_eq!(out[113], 0xE0);
        assert_eq!(out[118], 0xFD);
        assert_eq!(out.len(), 120);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokens(&[], 16, false).unwrap(), vec![0xFC]);
    }

    #[test]
    fn test_overflow() {
        let src = vec![1u8; 8];
        // 9 header + 1 + 8 + 1 = 19 bytes needed
        assert!(tokens(&src, 19, false).is_ok());
        assert_eq!(tokens(&src, 18, false), Err(Error::OutputOverflow));
        assert_eq!(tokens(&src, 4, false), Err(Error::OutputOverflow));
    }

    #[test]
    fn test_padding() {
        let src = b"ab";
        let out = tokens(src, 20, true).unwrap();
        assert_eq!(out.len(), 11);
        assert_eq!(&out[..3], &[0xFE, b'a', b'b']);
        assert!(out[3..].iter().all(|&b| b == CTRL_STOP));
    }

    #[test]
    fn test_copy_with_literals() {
        let src = b"xyabcabcabc";
        let mut dst = vec![0u8; 32];
        let mut w = TokenWriter::new(src, &mut dst);
        // copy 6 bytes from distance 3 to position 5
        w.emit(2, 5, 6).unwrap();
        let n = w.finish(false).unwrap();
        // 4 literals in their own token, the fifth folded into the copy
        assert_eq!(
            &dst[HEADER_SIZE..n],
            &[0xE0, b'x', b'y', b'a', b'b', (6 - 3) << 2 | 1, 2, b'c', 0xFC]
        );
    }
}
