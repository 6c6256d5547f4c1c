//! Error types for the Elias-Fano codec.

use thiserror::Error;

/// Error variants for encoding and for reconstructing persisted sequences.
///
/// Decoders never produce errors: running off either end of a sequence is a
/// normal outcome reported as `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// More values were appended than declared at construction.
    #[error("sequence already holds all {0} declared values")]
    Exhausted(usize),

    /// An appended value was smaller than its predecessor.
    #[error("value {value} decreases below previously encoded {previous}")]
    NotMonotonic {
        /// The offending value.
        value: u64,
        /// The value most recently encoded before it.
        previous: u64,
    },

    /// An appended value exceeded the declared upper bound.
    #[error("value {value} exceeds upper bound {upper_bound}")]
    OutOfRange {
        /// The offending value.
        value: u64,
        /// The bound declared at construction.
        upper_bound: u64,
    },

    /// An encoder was sealed before all declared values were appended.
    #[error("only {encoded} of {expected} declared values were encoded")]
    Incomplete {
        /// Number of values appended so far.
        encoded: usize,
        /// Number of values declared at construction.
        expected: usize,
    },

    /// Externally supplied bit streams do not match the declared dimensions.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
