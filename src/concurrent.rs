// Copyright 2024 Karpeles Lab Inc.
// Concurrent batch compression using Rayon

use rayon::prelude::*;

use crate::decode::decompress;
use crate::encode::compress;
use crate::error::Result;

/// Compress many independent buffers in parallel.
///
/// Each buffer becomes its own block, exactly as [`compress`] would produce
/// it; `None` marks buffers that should be stored uncompressed. Results are
/// in input order.
///
/// # Example
///
/// ```ignore
/// let entries = vec![vec![b'a'; 4096], b"tiny".to_vec()];
/// let blocks = qfs::compress_all(&entries);
/// assert!(blocks[0].is_some());
/// assert!(blocks[1].is_none());
/// ```
pub fn compress_all<T>(buffers: &[T]) -> Vec<Option<Vec<u8>>>
where
    T: AsRef<[u8]> + Sync,
{
    buffers
        .par_iter()
        .map(|buf| compress(buf.as_ref()))
        .collect()
}

/// Decompress many independent blocks in parallel.
///
/// Each entry pairs a block with its expected uncompressed size; every
/// block is decoded strictly, as by [`decompress`].
pub fn decompress_all<T>(blocks: &[(T, usize)]) -> Vec<Result<Vec<u8>>>
where
    T: AsRef<[u8]> + Sync,
{
    blocks
        .par_iter()
        .map(|(block, size)| decompress(block.as_ref(), *size))
        .collect()
}
