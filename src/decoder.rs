//! Cursor-based decoder over an [`EliasFanoSequence`].
//!
//! The cursor walks the upper stream one marker bit at a time and never
//! rescans ground it has already covered: `(index, set_bit_for_index)` move
//! together, so a full forward or backward sweep touches each stream word a
//! bounded number of times. The targeted skips additionally jump whole words
//! of markers that provably sit below (or above) the target bucket,
//! popcounting them to keep the index in sync.
//!
//! Traversal never fails. Both ends of the sequence are ordinary resting
//! states: `index == -1` before the first value, `index == len` after the
//! last, and every traversal call reports exhaustion as `None`.

use crate::bits;
use crate::sequence::EliasFanoSequence;

/// Read-only cursor over an encoded sequence.
///
/// Decoders are cheap to create and hold only private state, so concurrent
/// readers simply take one decoder each.
///
/// # Cursor discipline
///
/// [`advance_to_value`](Self::advance_to_value) only moves forward and
/// [`back_to_value`](Self::back_to_value) only moves backward. Successive
/// targets must therefore be non-decreasing for the former and
/// non-increasing for the latter; out-of-order targets yield unspecified
/// (but memory-safe) positions.
#[derive(Debug, Clone)]
pub struct EliasFanoDecoder<'a> {
    seq: &'a EliasFanoSequence,
    /// Cursor in `-1 ..= seq.len()`; the two extremes are resting states.
    index: i64,
    /// Upper-stream position of the marker for `index`; `-1` before the
    /// sequence, one past the last stream bit after it.
    set_bit_for_index: i64,
}

impl<'a> EliasFanoDecoder<'a> {
    pub(crate) fn new(seq: &'a EliasFanoSequence) -> Self {
        Self {
            seq,
            index: -1,
            set_bit_for_index: -1,
        }
    }

    /// Reset the cursor to before the first value. Idempotent.
    pub fn to_before_sequence(&mut self) {
        self.index = -1;
        self.set_bit_for_index = -1;
    }

    /// Reset the cursor to after the last value. Idempotent.
    pub fn to_after_sequence(&mut self) {
        self.index = self.seq.len() as i64;
        self.set_bit_for_index = self.seq.upper_len_bits() as i64;
    }

    /// Current cursor position; meaningful only immediately after a call
    /// that returned `Some(_)`.
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Decode the value after the cursor, or `None` if the sequence is
    /// exhausted (leaving the cursor after the sequence).
    pub fn next_value(&mut self) -> Option<u64> {
        if self.index + 1 >= self.seq.len() as i64 {
            self.to_after_sequence();
            return None;
        }
        let pos = match bits::next_set_bit(
            self.seq.upper_bits(),
            (self.set_bit_for_index + 1) as u64,
            self.seq.upper_len_bits(),
        ) {
            Some(pos) => pos,
            None => {
                self.to_after_sequence();
                return None;
            }
        };
        self.index += 1;
        self.set_bit_for_index = pos as i64;
        Some(self.value_at(pos, self.index as u64))
    }

    /// Decode the value before the cursor, or `None` if the sequence is
    /// exhausted (leaving the cursor before the sequence).
    pub fn previous_value(&mut self) -> Option<u64> {
        if self.index <= 0 {
            self.to_before_sequence();
            return None;
        }
        let pos = match bits::prev_set_bit(self.seq.upper_bits(), self.set_bit_for_index - 1) {
            Some(pos) => pos,
            None => {
                self.to_before_sequence();
                return None;
            }
        };
        self.index -= 1;
        self.set_bit_for_index = pos as i64;
        Some(self.value_at(pos, self.index as u64))
    }

    /// Advance to the first value at an index past the cursor that is
    /// `>= target`, or `None` (cursor after the sequence) if no such value
    /// exists. Forward-only; see the cursor discipline above.
    pub fn advance_to_value(&mut self, target: u64) -> Option<u64> {
        let num_values = self.seq.len() as i64;
        if self.index + 1 >= num_values {
            self.to_after_sequence();
            return None;
        }
        let upper = self.seq.upper_bits();
        let len_bits = self.seq.upper_len_bits();
        let low_bits = self.seq.num_low_bits();
        let target_high = target >> low_bits;
        let target_low = target & self.seq.low_mask();

        let mut index = self.index;
        let mut from = self.set_bit_for_index + 1;

        // The marker for index i sits at (value_i >> low_bits) + i, so no
        // marker before position target_high + index + 1 can reach the
        // target bucket. Skip whole words up to that point, popcounting the
        // markers they hold to keep the index in sync.
        while (from as u64) < len_bits {
            let word_idx = (from / 64) as usize;
            let word_end = (word_idx as u64 + 1) * 64;
            if word_end > target_high.saturating_add((index + 1) as u64) {
                break;
            }
            let word = upper[word_idx] & (!0u64 << (from % 64));
            index += i64::from(word.count_ones());
            if index + 1 >= num_values {
                self.to_after_sequence();
                return None;
            }
            from = word_end as i64;
        }

        // Refine marker by marker.
        loop {
            let pos = match bits::next_set_bit(upper, from as u64, len_bits) {
                Some(pos) => pos,
                None => {
                    self.to_after_sequence();
                    return None;
                }
            };
            index += 1;
            let high = pos - index as u64;
            if high >= target_high {
                let low = self.seq.low_value(index as u64);
                if high > target_high || low >= target_low {
                    self.index = index;
                    self.set_bit_for_index = pos as i64;
                    return Some((high << low_bits) | low);
                }
            }
            from = pos as i64 + 1;
        }
    }

    /// Move back to the last value at an index before the cursor that is
    /// `<= target`, or `None` (cursor before the sequence) if no such value
    /// exists. Backward-only mirror of
    /// [`advance_to_value`](Self::advance_to_value).
    pub fn back_to_value(&mut self, target: u64) -> Option<u64> {
        if self.index <= 0 {
            self.to_before_sequence();
            return None;
        }
        let upper = self.seq.upper_bits();
        let low_bits = self.seq.num_low_bits();
        let target_high = target >> low_bits;
        let target_low = target & self.seq.low_mask();

        let mut index = self.index;
        let mut from = self.set_bit_for_index - 1;

        // Mirror image of the forward skip: a marker above position
        // target_high + index - 1 belongs to a bucket above the target.
        while from >= 0 {
            let word_idx = (from / 64) as usize;
            let word_start = word_idx as u64 * 64;
            if word_start <= target_high.saturating_add((index - 1) as u64) {
                break;
            }
            let clear_above = 63 - (from % 64) as u32;
            let word = (upper[word_idx] << clear_above) >> clear_above;
            index -= i64::from(word.count_ones());
            if index <= 0 {
                self.to_before_sequence();
                return None;
            }
            from = word_start as i64 - 1;
        }

        loop {
            let pos = match bits::prev_set_bit(upper, from) {
                Some(pos) => pos,
                None => {
                    self.to_before_sequence();
                    return None;
                }
            };
            index -= 1;
            let high = pos - index as u64;
            if high <= target_high {
                let low = self.seq.low_value(index as u64);
                if high < target_high || low <= target_low {
                    self.index = index;
                    self.set_bit_for_index = pos as i64;
                    return Some((high << low_bits) | low);
                }
            }
            from = pos as i64 - 1;
        }
    }

    fn value_at(&self, pos: u64, index: u64) -> u64 {
        let high = pos - index;
        (high << self.seq.num_low_bits()) | self.seq.low_value(index)
    }
}
