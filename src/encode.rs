// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use log::{debug, trace};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::index::MatchIndex;
use crate::matcher::longest_match;
use crate::output::TokenWriter;

/// Encoder for QFS compression
///
/// # Example
///
/// ```
/// use qfs::Encoder;
///
/// let data = b"abcabcabcabcabcabcabcabcabcabc".repeat(4);
/// let mut dst = vec![0u8; data.len() - 1];
/// let n = Encoder::new().pad(true).compress_into(&data, &mut dst).unwrap();
/// assert_eq!(n, dst.len());
/// assert_eq!(qfs::decompress(&dst, data.len()).unwrap(), data);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    pad: bool,
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Encoder { pad: false }
    }

    /// Fill the unused tail of the destination with 0xFC stop bytes and
    /// make the whole destination the block.
    pub fn pad(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    /// Compress `src` into a new block strictly smaller than `src`.
    ///
    /// Inputs below 14 bytes, and inputs that do not shrink, return
    /// [`Error::NotBeneficial`].
    pub fn compress(&self, src: &[u8]) -> Result<Vec<u8>> {
        if src.len() >= MAX_UNCOMPRESSED_SIZE {
            debug!("qfs: not compressing {} bytes, too large", src.len());
            return Err(Error::InputTooLarge(src.len()));
        }
        if src.len() < MIN_INPUT_SIZE {
            debug!("qfs: not compressing {} bytes, too small", src.len());
            return Err(Error::NotBeneficial);
        }

        // The block must come out smaller than the input
        let mut dst = vec![0u8; src.len() - 1];

        match self.compress_into(src, &mut dst) {
            Ok(n) => {
                dst.truncate(n);
                Ok(dst)
            }
            Err(Error::OutputOverflow) => {
                debug!("qfs: {} bytes do not compress", src.len());
                Err(Error::NotBeneficial)
            }
            Err(e) => Err(e),
        }
    }

    /// Compress `src` into `dst` and return the block length.
    ///
    /// Fails with [`Error::OutputOverflow`] if the block does not fit. No
    /// minimum input size applies here.
    pub fn compress_into(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        if src.len() >= MAX_UNCOMPRESSED_SIZE {
            return Err(Error::InputTooLarge(src.len()));
        }
        if dst.len() < HEADER_SIZE {
            return Err(Error::OutputOverflow);
        }

        let mut out = TokenWriter::new(src, dst);
        compress_block(src, &mut out)?;
        let n = out.finish(self.pad)?;

        Header::new(n, src.len())?.write(dst);
        trace!("qfs: compressed {} -> {} bytes", src.len(), n);

        Ok(n)
    }
}

/// Compress `src`, or return `None` if it is not worth it.
///
/// `None` means the input is shorter than 14 bytes, at least 16 MiB, or
/// would not shrink; store it uncompressed.
pub fn compress(src: &[u8]) -> Option<Vec<u8>> {
    try_compress(src).ok()
}

/// Like [`compress`], but reports why compression was declined.
pub fn try_compress(src: &[u8]) -> Result<Vec<u8>> {
    Encoder::new().compress(src)
}

/// Lazy-matching parse over the whole input (zlib's `deflate_slow`).
///
/// A match found at `pos` is held back for one position; if `pos + 1` has a
/// strictly longer match the held one is dropped and its first byte becomes
/// a literal.
fn compress_block(src: &[u8], out: &mut TokenWriter<'_>) -> Result<()> {
    let mut index = MatchIndex::new();
    index.prime(src);

    let mut pos = 0;
    let mut match_start = 0;
    let mut match_length = MIN_MATCH - 1;

    while pos < src.len() {
        let prev_length = match_length;
        let prev_start = match_start;
        match_length = MIN_MATCH - 1;

        let head = if src.len() - pos >= MIN_MATCH {
            index.observe(src, pos);
            index.insert(pos)
        } else {
            None
        };

        if let Some(head) = head {
            if prev_length < MAX_LAZY && pos - head <= WINDOW_SIZE {
                // Matches no token can express are dropped
                if let Some(m) = longest_match(&index, src, head, pos, prev_length)
                    .filter(|m| m.encodable_at(pos))
                {
                    match_length = m.length;
                    match_start = m.start;
                }
            }
        }

        if prev_length >= MIN_MATCH && match_length <= prev_length {
            out.emit(prev_start, pos - 1, prev_length)?;

            // pos - 1 and pos are already indexed
            let end = pos - 1 + prev_length;
            for p in pos + 1..end {
                if p + MIN_MATCH <= src.len() {
                    index.observe(src, p);
                    index.insert(p);
                }
            }

            pos = end;
            match_length = MIN_MATCH - 1;
        } else {
            pos += 1;
        }
    }

    Ok(())
}
