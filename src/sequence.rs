//! The immutable Elias-Fano artifact: two packed bit streams plus the
//! parameters that describe them.
//!
//! A sequence is produced once, by [`EliasFanoEncoder`](crate::EliasFanoEncoder)
//! or by reconstruction from persisted words/bytes, and never mutated. Any
//! number of [`EliasFanoDecoder`](crate::EliasFanoDecoder)s may borrow it
//! concurrently; each decoder owns its own cursor.

use crate::bits;
use crate::decoder::EliasFanoDecoder;
use crate::error::{Error, Result};

/// Derived low-field width: `max(0, floor(log2(upper_bound / num_values)))`,
/// clamped to 0 when the ratio is below 1. Always in `0..=63`.
pub(crate) fn num_low_bits_for(num_values: usize, upper_bound: u64) -> u32 {
    if num_values == 0 || upper_bound == 0 {
        return 0;
    }
    let ratio = upper_bound / num_values as u64;
    if ratio == 0 {
        0
    } else {
        63 - ratio.leading_zeros()
    }
}

/// Logical length of the upper stream in bits:
/// `num_values + (upper_bound >> num_low_bits) + 1`, or 0 for an empty
/// sequence.
pub(crate) fn upper_len_bits(num_values: usize, upper_bound: u64, num_low_bits: u32) -> u64 {
    if num_values == 0 {
        0
    } else {
        num_values as u64 + (upper_bound >> num_low_bits) + 1
    }
}

/// An encoded monotone sequence.
///
/// Equality and hashing cover the declared parameters and both raw streams,
/// so two sequences compare equal exactly when they encode the same values
/// under the same bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EliasFanoSequence {
    num_values: usize,
    upper_bound: u64,
    num_low_bits: u32,
    upper_bits: Vec<u64>,
    lower_bits: Vec<u64>,
}

impl EliasFanoSequence {
    /// Trusted constructor used by the encoder once all values are in.
    pub(crate) fn from_encoder(
        num_values: usize,
        upper_bound: u64,
        num_low_bits: u32,
        upper_bits: Vec<u64>,
        lower_bits: Vec<u64>,
    ) -> Self {
        Self {
            num_values,
            upper_bound,
            num_low_bits,
            upper_bits,
            lower_bits,
        }
    }

    /// Reconstruct a sequence from raw parts, e.g. words loaded from an index
    /// segment.
    ///
    /// The declared dimensions are validated here, up front: both stream
    /// lengths must match `num_values`/`upper_bound` exactly, the upper
    /// stream must hold one marker bit per value, and no bit may sit at or
    /// past the logical stream end. A sequence that passes this check decodes
    /// without any further integrity checks.
    pub fn from_parts(
        num_values: usize,
        upper_bound: u64,
        upper_bits: Vec<u64>,
        lower_bits: Vec<u64>,
    ) -> Result<Self> {
        let num_low_bits = num_low_bits_for(num_values, upper_bound);
        let len_bits = upper_len_bits(num_values, upper_bound, num_low_bits);

        let expected_upper = bits::words_for(len_bits);
        if upper_bits.len() != expected_upper {
            return Err(Error::InvalidEncoding(format!(
                "upper stream holds {} words, dimensions require {expected_upper}",
                upper_bits.len()
            )));
        }
        let expected_lower = bits::words_for(num_values as u64 * u64::from(num_low_bits));
        if lower_bits.len() != expected_lower {
            return Err(Error::InvalidEncoding(format!(
                "lower stream holds {} words, dimensions require {expected_lower}",
                lower_bits.len()
            )));
        }

        let ones: u64 = upper_bits.iter().map(|w| u64::from(w.count_ones())).sum();
        if ones != num_values as u64 {
            return Err(Error::InvalidEncoding(format!(
                "upper stream holds {ones} marker bits for {num_values} values"
            )));
        }
        if !upper_bits.is_empty() {
            let last_set = bits::prev_set_bit(&upper_bits, upper_bits.len() as i64 * 64 - 1);
            if let Some(pos) = last_set {
                if pos >= len_bits {
                    return Err(Error::InvalidEncoding(format!(
                        "marker bit at position {pos} past logical stream end {len_bits}"
                    )));
                }
            }
        }

        Ok(Self {
            num_values,
            upper_bound,
            num_low_bits,
            upper_bits,
            lower_bits,
        })
    }

    /// Create a fresh decoder positioned before the sequence.
    pub fn decoder(&self) -> EliasFanoDecoder<'_> {
        EliasFanoDecoder::new(self)
    }

    /// Number of encoded values.
    pub fn len(&self) -> usize {
        self.num_values
    }

    /// Return true if the sequence holds no values.
    pub fn is_empty(&self) -> bool {
        self.num_values == 0
    }

    /// The upper bound declared at construction.
    pub fn upper_bound(&self) -> u64 {
        self.upper_bound
    }

    /// Width of each packed low field.
    pub fn num_low_bits(&self) -> u32 {
        self.num_low_bits
    }

    /// The upper stream: one marker bit per value at position
    /// `(value >> num_low_bits) + index`.
    pub fn upper_bits(&self) -> &[u64] {
        &self.upper_bits
    }

    /// The lower stream: `num_low_bits`-wide fields in insertion order.
    pub fn lower_bits(&self) -> &[u64] {
        &self.lower_bits
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.upper_bits.capacity() * 8 + self.lower_bits.capacity() * 8
    }

    pub(crate) fn upper_len_bits(&self) -> u64 {
        upper_len_bits(self.num_values, self.upper_bound, self.num_low_bits)
    }

    pub(crate) fn low_mask(&self) -> u64 {
        if self.num_low_bits == 0 {
            0
        } else {
            (1u64 << self.num_low_bits) - 1
        }
    }

    /// Low field of the value at `index`.
    pub(crate) fn low_value(&self, index: u64) -> u64 {
        if self.num_low_bits == 0 {
            0
        } else {
            bits::read_field(
                &self.lower_bits,
                index * u64::from(self.num_low_bits),
                self.num_low_bits,
            )
        }
    }

    /// Serialize to a stable binary encoding (little-endian).
    ///
    /// Format (versioned):
    /// - magic: 8 bytes (`EFBITSQ1`)
    /// - num_values: u64
    /// - upper_bound: u64
    /// - upper_len: u64, then `upper_len` u64 words
    /// - lower_len: u64, then `lower_len` u64 words
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"EFBITSQ1");

        out.extend_from_slice(&(self.num_values as u64).to_le_bytes());
        out.extend_from_slice(&self.upper_bound.to_le_bytes());

        out.extend_from_slice(&(self.upper_bits.len() as u64).to_le_bytes());
        for &w in &self.upper_bits {
            out.extend_from_slice(&w.to_le_bytes());
        }

        out.extend_from_slice(&(self.lower_bits.len() as u64).to_le_bytes());
        for &w in &self.lower_bits {
            out.extend_from_slice(&w.to_le_bytes());
        }

        out
    }

    /// Deserialize a sequence from `to_bytes()` output.
    ///
    /// Funnels through [`EliasFanoSequence::from_parts`], so malformed input
    /// is rejected here rather than surfacing mid-decode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        const MAGIC: &[u8; 8] = b"EFBITSQ1";
        let mut off = 0usize;

        let mut take = |n: usize| -> Result<&[u8]> {
            if off + n > bytes.len() {
                return Err(Error::InvalidEncoding(
                    "unexpected end of input".to_string(),
                ));
            }
            let slice = &bytes[off..off + n];
            off += n;
            Ok(slice)
        };

        let magic = take(8)?;
        if magic != MAGIC {
            return Err(Error::InvalidEncoding(
                "bad magic for EliasFanoSequence".to_string(),
            ));
        }

        let num_values = u64::from_le_bytes(take(8)?.try_into().unwrap()) as usize;
        let upper_bound = u64::from_le_bytes(take(8)?.try_into().unwrap());

        let upper_len = u64::from_le_bytes(take(8)?.try_into().unwrap()) as usize;
        // Bound allocation against total input to prevent allocation bombs.
        if upper_len.saturating_mul(8) > bytes.len() {
            return Err(Error::InvalidEncoding(format!(
                "upper stream length ({upper_len} words) too large for input ({} bytes)",
                bytes.len()
            )));
        }
        let mut upper_bits = Vec::with_capacity(upper_len);
        for _ in 0..upper_len {
            let w = u64::from_le_bytes(take(8)?.try_into().unwrap());
            upper_bits.push(w);
        }

        let lower_len = u64::from_le_bytes(take(8)?.try_into().unwrap()) as usize;
        if lower_len.saturating_mul(8) > bytes.len() {
            return Err(Error::InvalidEncoding(format!(
                "lower stream length ({lower_len} words) too large for input ({} bytes)",
                bytes.len()
            )));
        }
        let mut lower_bits = Vec::with_capacity(lower_len);
        for _ in 0..lower_len {
            let w = u64::from_le_bytes(take(8)?.try_into().unwrap());
            lower_bits.push(w);
        }

        if off != bytes.len() {
            return Err(Error::InvalidEncoding(
                "trailing bytes after EliasFanoSequence".to_string(),
            ));
        }

        Self::from_parts(num_values, upper_bound, upper_bits, lower_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EliasFanoEncoder;

    fn encode(values: &[u64]) -> EliasFanoSequence {
        let upper_bound = values.last().copied().unwrap_or(0);
        let mut enc = EliasFanoEncoder::new(values.len(), upper_bound);
        for &v in values {
            enc.encode_next(v).unwrap();
        }
        enc.into_sequence().unwrap()
    }

    #[test]
    fn from_parts_accepts_encoder_output() {
        let seq = encode(&[5, 8, 8, 15, 32]);
        let rebuilt = EliasFanoSequence::from_parts(
            seq.len(),
            seq.upper_bound(),
            seq.upper_bits().to_vec(),
            seq.lower_bits().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, seq);
    }

    #[test]
    fn from_parts_rejects_wrong_upper_length() {
        let seq = encode(&[5, 8, 8, 15, 32]);
        let mut upper = seq.upper_bits().to_vec();
        upper.push(0);
        let err = EliasFanoSequence::from_parts(
            seq.len(),
            seq.upper_bound(),
            upper,
            seq.lower_bits().to_vec(),
        );
        assert!(matches!(err, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn from_parts_rejects_wrong_lower_length() {
        let seq = encode(&[5, 8, 8, 15, 32]);
        let err = EliasFanoSequence::from_parts(
            seq.len(),
            seq.upper_bound(),
            seq.upper_bits().to_vec(),
            Vec::new(),
        );
        assert!(matches!(err, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn from_parts_rejects_wrong_marker_count() {
        let seq = encode(&[5, 8, 8, 15, 32]);
        let mut upper = seq.upper_bits().to_vec();
        upper[0] &= upper[0] - 1; // drop the lowest marker bit
        let err = EliasFanoSequence::from_parts(
            seq.len(),
            seq.upper_bound(),
            upper,
            seq.lower_bits().to_vec(),
        );
        assert!(matches!(err, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn from_parts_rejects_marker_past_logical_end() {
        // One value in a 3-bit upper stream stored in one word: move the
        // marker past bit 2 while keeping the popcount right.
        let seq = encode(&[63]);
        assert_eq!(seq.upper_bits(), &[0x2]);
        let err = EliasFanoSequence::from_parts(
            seq.len(),
            seq.upper_bound(),
            vec![1u64 << 40],
            seq.lower_bits().to_vec(),
        );
        assert!(matches!(err, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn empty_sequence_has_empty_streams() {
        let seq = encode(&[]);
        assert!(seq.is_empty());
        assert!(seq.upper_bits().is_empty());
        assert!(seq.lower_bits().is_empty());
        let rebuilt = EliasFanoSequence::from_parts(0, 0, Vec::new(), Vec::new()).unwrap();
        assert_eq!(rebuilt, seq);
    }

    #[test]
    fn bytes_roundtrip() {
        for values in [vec![], vec![0], vec![5, 8, 8, 15, 32], vec![0, u64::MAX >> 1]] {
            let seq = encode(&values);
            let bytes = seq.to_bytes();
            let back = EliasFanoSequence::from_bytes(&bytes).unwrap();
            assert_eq!(back, seq);
        }
    }

    #[test]
    fn from_bytes_rejects_bad_magic() {
        let mut bytes = encode(&[1, 2, 3]).to_bytes();
        bytes[0] = b'X';
        assert!(EliasFanoSequence::from_bytes(&bytes).is_err());
    }

    #[test]
    fn from_bytes_rejects_truncation_and_trailing() {
        let bytes = encode(&[1, 2, 3]).to_bytes();
        assert!(EliasFanoSequence::from_bytes(&bytes[..bytes.len() - 1]).is_err());
        let mut extended = bytes.clone();
        extended.push(0);
        assert!(EliasFanoSequence::from_bytes(&extended).is_err());
    }

    #[test]
    fn derived_low_width_matches_formula() {
        assert_eq!(num_low_bits_for(0, 100), 0);
        assert_eq!(num_low_bits_for(10, 0), 0);
        assert_eq!(num_low_bits_for(10, 5), 0); // ratio < 1 clamps to 0
        assert_eq!(num_low_bits_for(1, 63), 5);
        assert_eq!(num_low_bits_for(2, (1u64 << 63) - 1), 61);
        assert_eq!(num_low_bits_for(1, u64::MAX), 63);
    }
}
