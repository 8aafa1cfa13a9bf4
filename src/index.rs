// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Hash-chain index over 3-byte prefixes.
//!
//! `head` maps a prefix hash to the most recent position that had it, and
//! `prev` links each position to the previous one with the same hash. `prev`
//! is a ring of `WINDOW_SIZE` slots addressed by `pos & WINDOW_MASK`, so only
//! the last 128 KiB of positions can be reached; callers bound the walk with
//! a limit so that reused slots are never followed.

use crate::constants::*;

/// Marker for an empty slot
const NIL: u32 = u32::MAX;

#[inline]
fn slot(v: u32) -> Option<usize> {
    (v != NIL).then_some(v as usize)
}

pub(crate) struct MatchIndex {
    hash: u32,
    head: Vec<u32>,
    prev: Vec<u32>,
}

impl MatchIndex {
    pub(crate) fn new() -> Self {
        MatchIndex {
            hash: 0,
            head: vec![NIL; HASH_SIZE],
            prev: vec![NIL; WINDOW_SIZE],
        }
    }

    /// Seed the rolling hash with the first two bytes of the input.
    pub(crate) fn prime(&mut self, src: &[u8]) {
        for &b in src.iter().take(MIN_MATCH - 1) {
            self.update(b);
        }
    }

    #[inline]
    fn update(&mut self, b: u8) {
        self.hash = ((self.hash << HASH_SHIFT) ^ b as u32) & HASH_MASK;
    }

    /// Fold the last byte of the 3-byte window starting at `pos` into the
    /// hash. Must be called once per position, in increasing order, before
    /// that position is inserted.
    #[inline]
    pub(crate) fn observe(&mut self, src: &[u8], pos: usize) {
        self.update(src[pos + MIN_MATCH - 1]);
    }

    /// Record `pos` as the newest position for the current hash and return
    /// the previous head, which starts the candidate chain for `pos`.
    #[inline]
    pub(crate) fn insert(&mut self, pos: usize) -> Option<usize> {
        let bucket = self.hash as usize;
        let previous = self.head[bucket];
        self.prev[pos & WINDOW_MASK] = previous;
        self.head[bucket] = pos as u32;
        slot(previous)
    }

    /// Next older position in the chain of `pos`, or `None` once the chain
    /// ends or falls below `limit`.
    #[inline]
    pub(crate) fn chain_next(&self, pos: usize, limit: usize) -> Option<usize> {
        slot(self.prev[pos & WINDOW_MASK]).filter(|&p| p >= limit)
    }
}
