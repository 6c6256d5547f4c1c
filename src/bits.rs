//! Word-level bit packing and scanning helpers shared by both streams.
//!
//! A stream is a plain `&[u64]` packed least-significant-bit first: bit `p`
//! lives at bit `p % 64` of word `p / 64`. Fixed-width fields are laid out
//! back to back with no padding; since field widths never exceed 63 bits, a
//! field straddles at most one word boundary.

/// Number of words needed to hold `bits` bits.
pub(crate) fn words_for(bits: u64) -> usize {
    bits.div_ceil(64) as usize
}

/// Set the bit at absolute position `pos`.
pub(crate) fn set_bit(words: &mut [u64], pos: u64) {
    words[(pos / 64) as usize] |= 1u64 << (pos % 64);
}

/// Write a `width`-bit field at bit offset `offset`.
///
/// `value` must already be masked to `width` bits and the target bits must
/// still be zero; `width` must be in `1..=63`.
pub(crate) fn write_field(words: &mut [u64], offset: u64, width: u32, value: u64) {
    debug_assert!((1..=63).contains(&width));
    debug_assert_eq!(value >> width, 0);
    let word = (offset / 64) as usize;
    let shift = (offset % 64) as u32;
    words[word] |= value << shift;
    if shift + width > 64 {
        words[word + 1] |= value >> (64 - shift);
    }
}

/// Read a `width`-bit field at bit offset `offset`; `width` in `1..=63`.
pub(crate) fn read_field(words: &[u64], offset: u64, width: u32) -> u64 {
    debug_assert!((1..=63).contains(&width));
    let word = (offset / 64) as usize;
    let shift = (offset % 64) as u32;
    let mut value = words[word] >> shift;
    if shift + width > 64 {
        value |= words[word + 1] << (64 - shift);
    }
    value & ((1u64 << width) - 1)
}

/// Position of the first set bit at or after `from`, restricted to the
/// logical stream length `num_bits`.
pub(crate) fn next_set_bit(words: &[u64], from: u64, num_bits: u64) -> Option<u64> {
    if from >= num_bits {
        return None;
    }
    let mut word_idx = (from / 64) as usize;
    let mut word = words[word_idx] & (!0u64 << (from % 64));
    loop {
        if word != 0 {
            let pos = word_idx as u64 * 64 + u64::from(word.trailing_zeros());
            return (pos < num_bits).then_some(pos);
        }
        word_idx += 1;
        if word_idx as u64 * 64 >= num_bits {
            return None;
        }
        word = words[word_idx];
    }
}

/// Position of the last set bit at or below `from` (`from < 0` finds nothing).
pub(crate) fn prev_set_bit(words: &[u64], from: i64) -> Option<u64> {
    if from < 0 {
        return None;
    }
    let mut word_idx = (from / 64) as usize;
    let clear_above = 63 - (from % 64) as u32;
    let mut word = (words[word_idx] << clear_above) >> clear_above;
    loop {
        if word != 0 {
            return Some(word_idx as u64 * 64 + 63 - u64::from(word.leading_zeros()));
        }
        if word_idx == 0 {
            return None;
        }
        word_idx -= 1;
        word = words[word_idx];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_roundtrip_within_word() {
        let mut words = vec![0u64; 2];
        write_field(&mut words, 3, 5, 0b10110);
        assert_eq!(read_field(&words, 3, 5), 0b10110);
        assert_eq!(words[1], 0);
    }

    #[test]
    fn field_roundtrip_across_boundary() {
        let mut words = vec![0u64; 2];
        // 61-bit field starting at bit 60 spills 57 bits into the next word.
        let value = (1u64 << 61) - 3;
        write_field(&mut words, 60, 61, value);
        assert_eq!(read_field(&words, 60, 61), value);
        assert_ne!(words[1], 0);
    }

    #[test]
    fn field_ending_exactly_at_boundary() {
        let mut words = vec![0u64; 1];
        write_field(&mut words, 61, 3, 0b101);
        assert_eq!(read_field(&words, 61, 3), 0b101);
    }

    #[test]
    fn next_set_bit_scans_across_words() {
        let words = vec![0u64, 0, 1 << 7];
        assert_eq!(next_set_bit(&words, 0, 192), Some(135));
        assert_eq!(next_set_bit(&words, 135, 192), Some(135));
        assert_eq!(next_set_bit(&words, 136, 192), None);
    }

    #[test]
    fn next_set_bit_respects_logical_length() {
        let words = vec![1u64 << 10];
        assert_eq!(next_set_bit(&words, 0, 10), None);
        assert_eq!(next_set_bit(&words, 0, 11), Some(10));
        assert_eq!(next_set_bit(&words, 64, 64), None);
    }

    #[test]
    fn prev_set_bit_scans_across_words() {
        let words = vec![1u64 << 3, 0, 1 << 7];
        assert_eq!(prev_set_bit(&words, 191), Some(135));
        assert_eq!(prev_set_bit(&words, 135), Some(135));
        assert_eq!(prev_set_bit(&words, 134), Some(3));
        assert_eq!(prev_set_bit(&words, 2), None);
        assert_eq!(prev_set_bit(&words, -1), None);
    }

    #[test]
    fn words_for_rounds_up() {
        assert_eq!(words_for(0), 0);
        assert_eq!(words_for(1), 1);
        assert_eq!(words_for(64), 1);
        assert_eq!(words_for(65), 2);
    }
}
