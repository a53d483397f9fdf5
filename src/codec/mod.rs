// Codec Module - Main module file
// Radix-64 text encoding used as the wire format for encrypted streams

pub mod alphabet;
pub mod radix64;

pub use radix64::{CodecMode, Radix64Codec, LINE_WIDTH};

use std::io;

use crate::error::{Rsa64Error, Rsa64Result};
use alphabet::PAD;

/// Encode a complete byte slice as wrapped, padded radix-64 text
pub fn encode(data: &[u8]) -> Rsa64Result<String> {
    let mut codec = Radix64Codec::new();
    codec.begin_encode(Vec::with_capacity(data.len() / 3 * 4 + data.len() / 48 + 4));
    for &byte in data {
        codec.put_byte(byte, 0)?;
    }
    let bytes = codec.end_encode()?;
    String::from_utf8(bytes)
        .map_err(|e| Rsa64Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Decode radix-64 text produced by [`encode`]
///
/// Unlike the streaming codec, this knows where the input ends, so the zero
/// bytes that stand in for `=` symbols are dropped from the result.
pub fn decode(text: &str) -> Rsa64Result<Vec<u8>> {
    let symbols: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if symbols.len() % 4 != 0 {
        return Err(Rsa64Error::TruncatedStream);
    }

    let padding = symbols.iter().rev().take_while(|&&b| b == PAD).count().min(2);
    let len = symbols.len() / 4 * 3 - padding;

    let mut codec = Radix64Codec::new();
    codec.begin_decode(symbols.as_slice());
    let mut data = Vec::with_capacity(len);
    for _ in 0..len {
        data.push(codec.get_byte()?);
    }
    codec.end_decode()?;
    Ok(data)
}
