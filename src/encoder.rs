//! Streaming Elias-Fano encoder.
//!
//! The encoder is told up front how many values it will receive and the
//! largest value it may receive. From those two numbers it derives the low
//! field width `L = max(0, floor(log2(upper_bound / num_values)))` and
//! allocates both streams at their exact final size; `encode_next` then only
//! ever ORs bits into place.
//!
//! Each value splits into `high = value >> L` and `low = value & ((1 << L) - 1)`.
//! The low part goes into the next `L`-wide slot of the lower stream. The
//! high part is recorded as a single marker bit at position `high + index` of
//! the upper stream: the marker positions are strictly increasing, the rank
//! of a marker recovers its index, and the zeros before it recover its high
//! part. Duplicate values land in the same high bucket but at distinct
//! positions because the index term keeps advancing.

use std::hash::{Hash, Hasher};

use crate::bits;
use crate::error::{Error, Result};
use crate::sequence::{num_low_bits_for, upper_len_bits, EliasFanoSequence};

/// Builder for an [`EliasFanoSequence`], fed one value at a time in
/// non-decreasing order.
///
/// Any `encode_next` error is fatal to the builder: there is no rollback,
/// discard it and start over.
#[derive(Debug, Clone)]
pub struct EliasFanoEncoder {
    num_values: usize,
    upper_bound: u64,
    num_low_bits: u32,
    low_mask: u64,
    upper_bits: Vec<u64>,
    lower_bits: Vec<u64>,
    num_encoded: usize,
    last_encoded: u64,
}

impl EliasFanoEncoder {
    /// Create an encoder for exactly `num_values` values, none larger than
    /// `upper_bound`.
    ///
    /// An empty sequence ignores `upper_bound` entirely, so `num_values == 0`
    /// covers the degenerate case of a sequence over an empty value domain.
    pub fn new(num_values: usize, upper_bound: u64) -> Self {
        let num_low_bits = num_low_bits_for(num_values, upper_bound);
        let low_mask = if num_low_bits == 0 {
            0
        } else {
            (1u64 << num_low_bits) - 1
        };
        let upper_bits = vec![
            0u64;
            bits::words_for(upper_len_bits(num_values, upper_bound, num_low_bits))
        ];
        let lower_bits = vec![
            0u64;
            bits::words_for(num_values as u64 * u64::from(num_low_bits))
        ];
        Self {
            num_values,
            upper_bound,
            num_low_bits,
            low_mask,
            upper_bits,
            lower_bits,
            num_encoded: 0,
            last_encoded: 0,
        }
    }

    /// Append the next value.
    pub fn encode_next(&mut self, value: u64) -> Result<()> {
        if self.num_encoded >= self.num_values {
            return Err(Error::Exhausted(self.num_values));
        }
        if value < self.last_encoded {
            return Err(Error::NotMonotonic {
                value,
                previous: self.last_encoded,
            });
        }
        if value > self.upper_bound {
            return Err(Error::OutOfRange {
                value,
                upper_bound: self.upper_bound,
            });
        }

        let high = value >> self.num_low_bits;
        bits::set_bit(&mut self.upper_bits, high + self.num_encoded as u64);
        if self.num_low_bits > 0 {
            bits::write_field(
                &mut self.lower_bits,
                self.num_encoded as u64 * u64::from(self.num_low_bits),
                self.num_low_bits,
                value & self.low_mask,
            );
        }

        self.last_encoded = value;
        self.num_encoded += 1;
        Ok(())
    }

    /// Number of values declared at construction.
    pub fn num_values(&self) -> usize {
        self.num_values
    }

    /// Number of values appended so far.
    pub fn num_encoded(&self) -> usize {
        self.num_encoded
    }

    /// The declared upper bound.
    pub fn upper_bound(&self) -> u64 {
        self.upper_bound
    }

    /// Width of each packed low field.
    pub fn num_low_bits(&self) -> u32 {
        self.num_low_bits
    }

    /// The raw upper stream, for persistence and comparison.
    pub fn upper_bits(&self) -> &[u64] {
        &self.upper_bits
    }

    /// The raw lower stream, for persistence and comparison.
    pub fn lower_bits(&self) -> &[u64] {
        &self.lower_bits
    }

    /// Seal the builder into an immutable [`EliasFanoSequence`].
    ///
    /// Fails with [`Error::Incomplete`] unless all declared values have been
    /// appended; a decoder must never see a partially built stream.
    pub fn into_sequence(self) -> Result<EliasFanoSequence> {
        if self.num_encoded < self.num_values {
            return Err(Error::Incomplete {
                encoded: self.num_encoded,
                expected: self.num_values,
            });
        }
        Ok(EliasFanoSequence::from_encoder(
            self.num_values,
            self.upper_bound,
            self.num_low_bits,
            self.upper_bits,
            self.lower_bits,
        ))
    }
}

// Equality is defined over the declared parameters and the raw streams;
// cursor bookkeeping is derived from those and excluded.
impl PartialEq for EliasFanoEncoder {
    fn eq(&self, other: &Self) -> bool {
        self.num_values == other.num_values
            && self.upper_bound == other.upper_bound
            && self.upper_bits == other.upper_bits
            && self.lower_bits == other.lower_bits
    }
}

impl Eq for EliasFanoEncoder {}

impl Hash for EliasFanoEncoder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num_values.hash(state);
        self.upper_bound.hash(state);
        self.upper_bits.hash(state);
        self.lower_bits.hash(state);
    }
}
