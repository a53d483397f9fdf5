// Radix-64 Alphabet
// Symbol table for the encoder and a constant lookup table for the decoder

/// The 64 output symbols, indexed by 6-bit value
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Placeholder for absent trailing bytes in the final group
pub const PAD: u8 = b'=';

const INVALID: u8 = 0xff;

const DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Map the low 6 bits of `value` to its symbol
#[inline]
pub fn symbol_for(value: u32) -> u8 {
    ALPHABET[(value & 0x3f) as usize]
}

/// Map a symbol back to its 6-bit value. The padding symbol decodes as 0.
/// Returns None for anything outside the alphabet.
#[inline]
pub fn value_of(symbol: u8) -> Option<u32> {
    if symbol == PAD {
        return Some(0);
    }
    match DECODE_TABLE[symbol as usize] {
        INVALID => None,
        value => Some(u32::from(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_inverts_alphabet() {
        for (i, &symbol) in ALPHABET.iter().enumerate() {
            assert_eq!(value_of(symbol), Some(i as u32));
            assert_eq!(symbol_for(i as u32), symbol);
        }
    }

    #[test]
    fn test_padding_decodes_as_zero() {
        assert_eq!(value_of(PAD), Some(0));
    }

    #[test]
    fn test_rejects_foreign_symbols() {
        for symbol in [b'*', b'-', b'_', b'\n', b' ', 0u8, 0x80] {
            assert_eq!(value_of(symbol), None);
        }
    }

    #[test]
    fn test_symbol_for_masks_high_bits() {
        assert_eq!(symbol_for(0x40), b'A');
        assert_eq!(symbol_for(0xff), b'/');
    }
}
