// RSA Encryption Implementation
// Splits the input into 3-byte blocks, raises each to e mod n and writes the
// results through the radix-64 codec behind a 32-bit length header

use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};

use super::keygen::{validate_modulus, RsaPublicKey};
use super::number_theory::mod_exp;
use crate::codec::Radix64Codec;
use crate::config::CipherConfig;
use crate::error::{Rsa64Error, Rsa64Result};
use crate::util::file_ops::{get_file_size, open_input};

/// Plaintext bytes per cipher block
pub const BLOCK_BYTES: usize = 3;

/// Combine a block into its integer value, first byte least significant
pub fn block_value(block: [u8; BLOCK_BYTES]) -> u32 {
    u32::from(block[0]) + 256 * u32::from(block[1]) + 65536 * u32::from(block[2])
}

/// Encrypt `length` bytes read from `source` into an already started codec
fn encrypt_into<R: Read, W: Write>(
    source: &mut R,
    length: u64,
    codec: &mut Radix64Codec<W>,
    key: &RsaPublicKey,
    config: &CipherConfig,
) -> Rsa64Result<u64> {
    let header = u32::try_from(length).map_err(|_| Rsa64Error::InputTooLarge(length))?;
    codec.put_u32(header, 0)?;

    let mut remaining = length;
    let mut blocks = 0u64;
    let mut warned = false;

    while remaining > 0 {
        // Bytes past the end of the input stay 0 and are not counted in the header
        let take = remaining.min(BLOCK_BYTES as u64) as usize;
        let mut block = [0u8; BLOCK_BYTES];
        source.read_exact(&mut block[..take])?;
        remaining -= take as u64;

        let plain = block_value(block);
        if u64::from(plain) >= key.n {
            if config.strict_block_range {
                return Err(Rsa64Error::BlockOutOfRange {
                    block: plain,
                    modulus: key.n,
                });
            }
            if !warned {
                warn!(
                    block = plain,
                    modulus = key.n,
                    "block value is not below the modulus; it will not decrypt correctly"
                );
                warned = true;
            }
        }

        // n <= 2^32, so the residue always fits
        let cipher = mod_exp(u64::from(plain), key.e, key.n) as u32;
        codec.put_u32(cipher, 0)?;
        blocks += 1;
    }

    Ok(blocks)
}

/// Encrypt `length` bytes from `source` and write the radix-64 stream to `sink`
/// Returns the number of cipher blocks written
pub fn encrypt_stream<R: Read, W: Write>(
    mut source: R,
    length: u64,
    sink: W,
    key: &RsaPublicKey,
    config: &CipherConfig,
) -> Rsa64Result<u64> {
    validate_modulus(key.n)?;

    let mut codec = Radix64Codec::new();
    codec.begin_encode(sink);
    let blocks = encrypt_into(&mut source, length, &mut codec, key, config)?;
    codec.end_encode()?;

    debug!(length, blocks, "encrypted stream");
    Ok(blocks)
}

/// Encrypt bytes in memory, returning the radix-64 text
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> Rsa64Result<String> {
    encrypt_bytes_with_config(plaintext, public_key, &CipherConfig::default())
}

pub fn encrypt_bytes_with_config(
    plaintext: &[u8],
    public_key: &RsaPublicKey,
    config: &CipherConfig,
) -> Rsa64Result<String> {
    let mut out = Vec::new();
    encrypt_stream(plaintext, plaintext.len() as u64, &mut out, public_key, config)?;
    // The codec only ever writes ASCII
    Ok(out.into_iter().map(char::from).collect())
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Rsa64Result<String> {
    encrypt_bytes(plaintext.as_bytes(), public_key)
}

/// Encrypt the file at `input` into a radix-64 text file at `output`
/// Returns the plaintext length in bytes
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn encrypt_file(
    input: &Path,
    output: &Path,
    key: &RsaPublicKey,
    config: &CipherConfig,
) -> Rsa64Result<u64> {
    validate_modulus(key.n)?;

    // Size the same handle that is read, so the header matches the blocks
    let file = open_input(input)?;
    let length = get_file_size(&file)?;
    let mut source = BufReader::new(file);

    let mut codec = Radix64Codec::new();
    codec.begin_encode_path(output)?;
    let blocks = encrypt_into(&mut source, length, &mut codec, key, config)?;
    codec.end_encode()?;

    debug!(length, blocks, "encrypted file");
    Ok(length)
}
