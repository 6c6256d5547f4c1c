//! # Elias-Fano Coding for Monotone Sequences
//!
//! *Near-optimal space for sorted integers, with cheap skipping.*
//!
//! ## Intuition First
//!
//! A posting list is a sorted run of document identifiers. Storing each one
//! as a full machine word wastes most of its bits: once the numbers are
//! sorted, almost all of their information is in the small gaps between
//! them, not in their absolute magnitudes.
//!
//! Elias-Fano coding exploits this by cutting every value in two. The low
//! bits are essentially random, so they are stored verbatim in a dense
//! fixed-width array. The high bits grow slowly along the sequence, so they
//! are stored as a single marker bit each in a sparse bit stream whose
//! *position* carries the information. Reading a value back is two cheap
//! lookups, and skipping ahead to "first value ≥ t" never decompresses
//! anything.
//!
//! ## The Problem
//!
//! Decode-oriented codecs force a trade-off on search engines:
//! - **Raw arrays**: $O(1)$ access and skipping, but $64n$ bits.
//! - **Gap + variable-byte/bit coding**: near-entropy space, but skipping
//!   requires sequential decompression.
//!
//! Elias-Fano sits at $n \lceil \log_2(U/n) \rceil + 2n$ bits, within two
//! bits per element of the information-theoretic minimum, while keeping both
//! traversal directions and targeted skips efficient.
//!
//! ## Historical Context
//!
//! ```text
//! 1971  Fano    Partitioned bit storage for associative memories
//! 1974  Elias   Efficient storage and retrieval of static files
//! 2012  Vigna   Quasi-succinct indices: Elias-Fano for inverted indexes
//! 2014  Ottaviano-Venturini  Partitioned Elias-Fano posting lists
//! ```
//!
//! Vigna's observation was that the fifty-year-old representation is almost
//! exactly what a modern inverted index needs: document identifier lists are
//! monotone, read many orders of magnitude more often than they are built,
//! and are traversed by intersection algorithms that live on "advance to the
//! first posting ≥ t".
//!
//! ## Mathematical Formulation
//!
//! For $n$ values in $[0, U]$, split each value at $L = \max(0, \lfloor
//! \log_2(U/n) \rfloor)$ bits:
//! - lower stream: $n$ fields of exactly $L$ bits.
//! - upper stream: $n + (U \gg L) + 1$ bits; the marker for the value at
//!   index $i$ is the set bit at position $(v_i \gg L) + i$.
//!
//! The index offset makes marker positions strictly increasing even across
//! duplicate values, so the rank of a marker recovers its index and the
//! zeros before it recover its high part.
//!
//! ## Complexity Analysis
//!
//! - **Space**: $n \lceil \log_2(U/n) \rceil + 2n + o(n)$ bits.
//! - **Time**: a full sweep in either direction is linear in the stream
//!   length because the cursor retains its scan position between calls; a
//!   monotone sweep of targeted skips is linear in aggregate for the same
//!   reason.
//!
//! ## What Could Go Wrong
//!
//! 1. **Unsorted input**: the marker-position arithmetic silently corrupts
//!    if values decrease, so the encoder rejects non-monotone appends.
//! 2. **Trusting persisted bytes**: a stream whose dimensions disagree with
//!    its declared parameters would send the decoder off the end of an
//!    array; reconstruction validates everything up front so decoding can
//!    stay check-free.
//! 3. **Cursor discipline**: targeted skips never rewind. Callers must feed
//!    `advance_to_value` non-decreasing targets (and `back_to_value`
//!    non-increasing ones) or the answers are unspecified.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **`EliasFanoEncoder`**: streaming builder over a declared count/bound.
//! - **`EliasFanoSequence`**: the immutable two-stream artifact, also
//!   reconstructible from raw words or persisted bytes.
//! - **`EliasFanoDecoder`**: a borrowing cursor with forward/backward
//!   traversal and targeted skips.
//!
//! ## References
//!
//! - Elias, P. (1974). "Efficient storage and retrieval by content and
//!   address of static files."
//! - Vigna, S. (2012). "Quasi-succinct indices."
//! - Ottaviano, G., & Venturini, R. (2014). "Partitioned Elias-Fano
//!   indexes."

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bits;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod sequence;

pub use decoder::EliasFanoDecoder;
pub use encoder::EliasFanoEncoder;
pub use error::Error;
pub use sequence::EliasFanoSequence;
