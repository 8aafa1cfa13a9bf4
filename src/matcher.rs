// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Longest-match search over the hash chains (zlib's `longest_match`).

use crate::constants::*;
use crate::index::MatchIndex;

/// A back-reference candidate: `length` bytes at `pos` repeat those at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Match {
    pub start: usize,
    pub length: usize,
}

impl Match {
    /// Whether some copy token can carry this match when used at `pos`.
    ///
    /// Short copies reach 1024 bytes back, medium copies 16384 bytes and
    /// need 4 bytes, long copies need 5.
    pub(crate) fn encodable_at(&self, pos: usize) -> bool {
        let distance = pos - self.start;
        !((self.length <= 3 && distance > SHORT_MAX_OFFSET)
            || (self.length <= 4 && distance > MEDIUM_MAX_OFFSET))
    }
}

/// Walk the chain starting at `chain_head` and return the longest match for
/// `pos` that beats `prev_length`, or `None` if nothing does.
///
/// `prev_length` must be at least `MIN_MATCH - 1` and the caller must have
/// checked that `chain_head` is within the window of `pos`.
pub(crate) fn longest_match(
    index: &MatchIndex,
    src: &[u8],
    chain_head: usize,
    pos: usize,
    prev_length: usize,
) -> Option<Match> {
    let remaining = src.len() - pos;

    // Never read past the end of the input
    if prev_length >= remaining {
        return None;
    }

    let mut chain_length = if prev_length >= GOOD_LENGTH {
        MAX_CHAIN >> 2
    } else {
        MAX_CHAIN
    };
    let limit = if pos > WINDOW_SIZE {
        pos - WINDOW_SIZE + 1
    } else {
        0
    };
    let max_match = remaining.min(MAX_MATCH);
    let nice_match = remaining.min(NICE_LENGTH);

    let scan = &src[pos..];
    let mut best_len = prev_length;
    let mut best_start = None;
    let mut cur = chain_head;

    loop {
        debug_assert!(cur < pos);
        let candidate = &src[cur..];

        // Cheap rejection: a longer match must agree at best_len and the
        // first two bytes. The third byte is implied by the hash.
        if candidate[best_len] == scan[best_len]
            && candidate[best_len - 1] == scan[best_len - 1]
            && candidate[0] == scan[0]
            && candidate[1] == scan[1]
        {
            let len = MIN_MATCH
                + scan[MIN_MATCH..max_match]
                    .iter()
                    .zip(&candidate[MIN_MATCH..max_match])
                    .take_while(|(a, b)| a == b)
                    .count();

            if len > best_len {
                best_start = Some(cur);
                best_len = len;
                if len >= nice_match {
                    break;
                }
            }
        }

        chain_length -= 1;
        match index.chain_next(cur, limit) {
            Some(next) if chain_length > 0 => cur = next,
            _ => break,
        }
    }

    best_start.map(|start| Match {
        start,
        length: best_len,
    })
}
