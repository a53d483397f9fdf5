// Radix-64 Streaming Codec
// Byte-at-a-time encoder/decoder between raw bytes and printable text.
// State survives across calls, so multi-byte integers and raw bytes can be
// interleaved freely on the same stream.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tracing::trace;

use super::alphabet::{symbol_for, value_of, PAD};
use crate::error::{Rsa64Error, Rsa64Result};

/// Encoded characters per output line
pub const LINE_WIDTH: u32 = 64;

/// Raw bytes per symbol group
const GROUP_BYTES: u32 = 3;

/// Symbols per group
const GROUP_SYMBOLS: u32 = 4;

/// Which direction the codec is currently running in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecMode {
    Idle,
    Encoding,
    Decoding,
}

/// Streaming radix-64 codec attached to a single resource `S`
///
/// Encoding needs `S: Write`, decoding needs `S: Read`. Only one mode is
/// active at a time; calling `begin_*` drops whatever was attached before.
pub struct Radix64Codec<S> {
    mode: CodecMode,
    resource: Option<S>,
    buffer: u32,     // pending group, up to 24 bits
    byte_count: u32, // bytes held in `buffer`
    column: u32,     // position on the current output line
}

impl<S> Radix64Codec<S> {
    /// Create an idle codec with nothing attached
    pub fn new() -> Self {
        Self {
            mode: CodecMode::Idle,
            resource: None,
            buffer: 0,
            byte_count: 0,
            column: 0,
        }
    }

    pub fn mode(&self) -> CodecMode {
        self.mode
    }

    pub fn is_encoding(&self) -> bool {
        self.mode == CodecMode::Encoding
    }

    pub fn is_decoding(&self) -> bool {
        self.mode == CodecMode::Decoding
    }

    pub fn is_active(&self) -> bool {
        self.mode != CodecMode::Idle
    }

    /// Bytes currently buffered in the partial group
    pub fn pending_bytes(&self) -> u32 {
        self.byte_count
    }

    fn reset(&mut self) {
        self.buffer = 0;
        self.byte_count = 0;
        self.column = 0;
    }

    fn detach(&mut self) {
        self.resource = None;
        self.mode = CodecMode::Idle;
        self.reset();
    }
}

impl<S> Default for Radix64Codec<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Write> Radix64Codec<S> {
    /// Attach `sink` and start encoding from a clean state
    pub fn begin_encode(&mut self, sink: S) {
        self.detach();
        self.resource = Some(sink);
        self.mode = CodecMode::Encoding;
        trace!("radix-64 encoder started");
    }

    /// Push one raw byte. The last `padding` symbols of a completed group are
    /// written as `=`. Does nothing unless the codec is encoding.
    pub fn put_byte(&mut self, value: u8, padding: u32) -> Rsa64Result<()> {
        if self.mode != CodecMode::Encoding {
            return Ok(());
        }

        self.buffer = (self.buffer << 8) + u32::from(value);
        self.byte_count += 1;

        if self.byte_count == GROUP_BYTES {
            self.flush_group(padding)?;
        }
        Ok(())
    }

    /// Write the buffered 24 bits as four symbols, wrapping lines as needed
    fn flush_group(&mut self, padding: u32) -> Rsa64Result<()> {
        let sink = self.resource.as_mut().ok_or(Rsa64Error::NotEncoding)?;

        // 4 symbols plus at most one line break
        let mut out = [0u8; 5];
        let mut len = 0;
        for i in 0..GROUP_SYMBOLS {
            out[len] = if i + padding > 3 {
                PAD
            } else {
                symbol_for(self.buffer >> (18 - 6 * i))
            };
            len += 1;

            if self.column == LINE_WIDTH - 1 {
                out[len] = b'\n';
                len += 1;
            }
            self.column = (self.column + 1) % LINE_WIDTH;
        }
        if let Err(e) = sink.write_all(&out[..len]) {
            // Part of the group may already be in the sink, so the stream cannot continue
            self.detach();
            return Err(e.into());
        }

        self.buffer = 0;
        self.byte_count = 0;
        Ok(())
    }

    /// Little-endian: low byte first, `padding` applies to the high byte only
    pub fn put_u16(&mut self, value: u16, padding: u32) -> Rsa64Result<()> {
        self.put_byte((value & 0xff) as u8, 0)?;
        self.put_byte((value >> 8) as u8, padding)
    }

    pub fn put_u32(&mut self, value: u32, padding: u32) -> Rsa64Result<()> {
        self.put_u16((value & 0xffff) as u16, 0)?;
        self.put_u16((value >> 16) as u16, padding)
    }

    pub fn put_u64(&mut self, value: u64, padding: u32) -> Rsa64Result<()> {
        self.put_u32((value & 0xffff_ffff) as u32, 0)?;
        self.put_u32((value >> 32) as u32, padding)
    }

    /// Pad out any partial group, flush the sink and hand it back
    pub fn end_encode(&mut self) -> Rsa64Result<S> {
        if self.mode != CodecMode::Encoding {
            return Err(Rsa64Error::NotEncoding);
        }

        match self.byte_count {
            2 => self.put_byte(0, 1)?,
            1 => self.put_u16(0, 2)?,
            _ => {}
        }

        let mut sink = self.resource.take().ok_or(Rsa64Error::NotEncoding)?;
        self.detach();
        sink.flush()?;
        trace!("radix-64 encoder finished");
        Ok(sink)
    }
}

impl Radix64Codec<BufWriter<File>> {
    /// Create `path` and start encoding into it. On failure the codec is left idle.
    pub fn begin_encode_path(&mut self, path: &Path) -> Rsa64Result<()> {
        self.detach();
        let file = File::create(path).map_err(|source| Rsa64Error::OpenOutput {
            path: path.to_path_buf(),
            source,
        })?;
        self.begin_encode(BufWriter::new(file));
        Ok(())
    }
}

impl<S: Read> Radix64Codec<S> {
    /// Attach `source` and start decoding from a clean state
    pub fn begin_decode(&mut self, source: S) {
        self.detach();
        self.resource = Some(source);
        self.mode = CodecMode::Decoding;
        trace!("radix-64 decoder started");
    }

    /// Pull one raw byte, reading a fresh group of 4 symbols when the buffer is empty
    pub fn get_byte(&mut self) -> Rsa64Result<u8> {
        if self.mode != CodecMode::Decoding {
            return Err(Rsa64Error::NotDecoding);
        }

        if self.byte_count == 0 {
            let source = self.resource.as_mut().ok_or(Rsa64Error::NotDecoding)?;
            let mut group = 0u32;
            for _ in 0..GROUP_SYMBOLS {
                let symbol = next_symbol(source)?;
                let value = value_of(symbol).ok_or(Rsa64Error::InvalidSymbol(symbol))?;
                group = (group << 6) + value;
            }
            self.buffer = group;
            self.byte_count = GROUP_BYTES;
        }

        self.byte_count -= 1;
        Ok(((self.buffer >> (8 * self.byte_count)) & 0xff) as u8)
    }

    pub fn get_u16(&mut self) -> Rsa64Result<u16> {
        let low = self.get_byte()?;
        let high = self.get_byte()?;
        Ok(u16::from(low) + (u16::from(high) << 8))
    }

    pub fn get_u32(&mut self) -> Rsa64Result<u32> {
        let low = self.get_u16()?;
        let high = self.get_u16()?;
        Ok(u32::from(low) + (u32::from(high) << 16))
    }

    pub fn get_u64(&mut self) -> Rsa64Result<u64> {
        let low = self.get_u32()?;
        let high = self.get_u32()?;
        Ok(u64::from(low) + (u64::from(high) << 32))
    }

    /// Stop decoding and hand the source back. Trailing padding is not checked.
    pub fn end_decode(&mut self) -> Rsa64Result<S> {
        if self.mode != CodecMode::Decoding {
            return Err(Rsa64Error::NotDecoding);
        }
        let source = self.resource.take().ok_or(Rsa64Error::NotDecoding)?;
        self.detach();
        trace!("radix-64 decoder finished");
        Ok(source)
    }
}

impl Radix64Codec<BufReader<File>> {
    /// Open `path` and start decoding from it. On failure the codec is left idle.
    pub fn begin_decode_path(&mut self, path: &Path) -> Rsa64Result<()> {
        self.detach();
        let file = File::open(path).map_err(|source| Rsa64Error::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        self.begin_decode(BufReader::new(file));
        Ok(())
    }
}

/// Next non-whitespace byte from `source`
fn next_symbol<R: Read>(source: &mut R) -> Rsa64Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => return Err(Rsa64Error::TruncatedStream),
            Ok(_) if byte[0].is_ascii_whitespace() => continue,
            Ok(_) => return Ok(byte[0]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
