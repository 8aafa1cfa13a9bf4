// Copyright 2024 Karpeles Lab Inc.
// Based on the RefPack/QFS compression format
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Result type for QFS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for QFS compression/decompression
///
/// Every decode error is terminal: no partial output is returned, except
/// through an explicit truncating [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input does not fit the 24-bit uncompressed size field
    #[error("qfs: input of {0} bytes is too large (limit is 16 MiB - 1)")]
    InputTooLarge(usize),

    /// Compression would not make the data smaller.
    ///
    /// This is a normal outcome, not a failure: store the data uncompressed.
    #[error("qfs: compression is not beneficial")]
    NotBeneficial,

    /// The destination buffer ran out of space
    #[error("qfs: output buffer overflow")]
    OutputOverflow,

    /// Bad magic or a header size that disagrees with the caller
    #[error("qfs: corrupt header: {0}")]
    CorruptHeader(&'static str),

    /// A back-reference points before the start of the output
    #[error("qfs: corrupt back-reference: offset {offset} with only {produced} bytes produced")]
    CorruptBackReference { offset: usize, produced: usize },

    /// The compressed stream ended early or did not fill the declared size
    #[error("qfs: truncated stream")]
    TruncatedStream,

    /// Bytes after the last token are not 0xFC padding
    #[error("qfs: trailing garbage after last token")]
    TrailingGarbage,
}
