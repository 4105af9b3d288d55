//! Packed-word field accessors
//!
//! The controller encodes several sub-fields into single 32-bit words:
//! TX buffer words, format descriptors, group control words and the
//! loopback test control register. This module gives each field an
//! explicit accessor over documented bit ranges so the engine never
//! open-codes shift/mask arithmetic.

/// Extract `len` bits of `word` starting at `start`
pub fn extract(word: u32, start: u32, len: u32) -> u32 {
    debug_assert!(start + len <= 32);
    if len == 32 {
        return word;
    }
    (word >> start) & ((1u32 << len) - 1)
}

/// Replace `len` bits of `word` starting at `start` with `value`
pub fn deposit(word: u32, start: u32, len: u32, value: u32) -> u32 {
    debug_assert!(start + len <= 32);
    let mask = if len == 32 {
        u32::MAX
    } else {
        ((1u32 << len) - 1) << start
    };
    (word & !mask) | ((value << start) & mask)
}

/// TX word: chip-select mask, bits 16..24 (0 = line selected)
pub fn tx_cs_mask(word: u32) -> u8 {
    extract(word, 16, 8) as u8
}

/// TX word: format descriptor select, bits 24..26
pub fn tx_fmt_sel(word: u32) -> usize {
    extract(word, 24, 2) as usize
}

/// TX word: chip-select hold, bit 28
pub fn tx_cs_hold(word: u32) -> bool {
    word & (1 << 28) != 0
}

/// TX word: payload masked down to the format's character length
pub fn tx_data(word: u32, char_len: u8) -> u16 {
    extract(word, 0, char_len as u32) as u16
}

/// Format descriptor: character length in bits, field 0..5
pub fn fmt_char_len(word: u32) -> u8 {
    extract(word, 0, 5) as u8
}

/// TGxCTRL / LTGPEND: buffer start pointer, bits 8..16
pub fn start_pointer(word: u32) -> u32 {
    extract(word, 8, 8)
}

/// IOLPBK: test-enable key field, bits 8..12
pub fn loopback_key(word: u32) -> u32 {
    extract(word, 8, 4)
}
