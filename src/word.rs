//! The emulated ISA's machine word.
//!
//! Width is fixed at build time by the `word64` feature: 32 bits by default,
//! 64 bits when the feature is enabled. `SWord` is the same bit pattern
//! reinterpreted as two's-complement signed.

#[cfg(not(feature = "word64"))]
pub type Word = u32;
#[cfg(not(feature = "word64"))]
pub type SWord = i32;

#[cfg(feature = "word64")]
pub type Word = u64;
#[cfg(feature = "word64")]
pub type SWord = i64;

/// Bit width of [`Word`].
pub const WORD_BITS: u32 = Word::BITS;

/// Byte width of [`Word`], the unit `x` and unary `*` read from memory.
pub const WORD_BYTES: usize = (WORD_BITS / 8) as usize;

/// Reinterprets `word` as [`SWord`] without changing its bit pattern.
#[inline]
pub fn as_signed(word: Word) -> SWord {
    word as SWord
}

/// Reinterprets `word` as [`Word`] without changing its bit pattern.
#[inline]
pub fn as_unsigned(word: SWord) -> Word {
    word as Word
}

/// Formats `word` as a zero-padded hexadecimal literal, e.g. `0x0000002a`.
pub fn format_hex(word: Word) -> String {
    format!("0x{:0width$x}", word, width = WORD_BYTES * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_roundtrip() {
        let w: Word = Word::MAX;
        assert_eq!(as_unsigned(as_signed(w)), w);
    }

    #[test]
    fn format_hex_pads_to_word_width() {
        assert_eq!(format_hex(0), format!("0x{:0width$}", 0, width = WORD_BYTES * 2));
    }
}
