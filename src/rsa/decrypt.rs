// RSA Decryption Implementation
// Reads the length header, then raises each cipher block to d mod n and
// writes back only the bytes that were part of the original input

use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, instrument};

use super::encrypt::BLOCK_BYTES;
use super::keygen::{validate_modulus, RsaPrivateKey};
use super::number_theory::mod_exp;
use crate::codec::Radix64Codec;
use crate::error::Rsa64Result;
use crate::util::file_ops::create_output;

/// Split a block value back into bytes, least significant first
pub fn block_bytes(plain: u64) -> [u8; BLOCK_BYTES] {
    [
        (plain & 0xff) as u8,
        ((plain >> 8) & 0xff) as u8,
        ((plain >> 16) & 0xff) as u8,
    ]
}

/// Decrypt from an already started codec into `sink`
fn decrypt_from<R: Read, W: Write>(
    codec: &mut Radix64Codec<R>,
    sink: &mut W,
    key: &RsaPrivateKey,
) -> Rsa64Result<u64> {
    let length = u64::from(codec.get_u32()?);

    let mut offset = 0u64;
    while offset < length {
        let cipher = codec.get_u32()?;
        let plain = mod_exp(u64::from(cipher), key.d, key.n);

        // Drop the zero fill of a short final block
        let keep = (length - offset).min(BLOCK_BYTES as u64) as usize;
        sink.write_all(&block_bytes(plain)[..keep])?;
        offset += BLOCK_BYTES as u64;
    }

    sink.flush()?;
    Ok(length)
}

/// Decrypt a radix-64 stream from `source`, writing the plaintext to `sink`
/// Returns the number of bytes written
pub fn decrypt_stream<R: Read, W: Write>(
    source: R,
    mut sink: W,
    key: &RsaPrivateKey,
) -> Rsa64Result<u64> {
    validate_modulus(key.n)?;

    let mut codec = Radix64Codec::new();
    codec.begin_decode(source);
    let written = decrypt_from(&mut codec, &mut sink, key)?;
    codec.end_decode()?;

    debug!(written, "decrypted stream");
    Ok(written)
}

/// Decrypt radix-64 text in memory
pub fn decrypt_bytes(ciphertext: &str, private_key: &RsaPrivateKey) -> Rsa64Result<Vec<u8>> {
    let mut plaintext = Vec::new();
    decrypt_stream(ciphertext.as_bytes(), &mut plaintext, private_key)?;
    Ok(plaintext)
}

/// Decrypt radix-64 text to a string, replacing invalid UTF-8
pub fn decrypt_to_string(ciphertext: &str, private_key: &RsaPrivateKey) -> Rsa64Result<String> {
    let plaintext = decrypt_bytes(ciphertext, private_key)?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

/// Decrypt the radix-64 text file at `input` into `output`
/// Returns the number of bytes written
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn decrypt_file(input: &Path, output: &Path, key: &RsaPrivateKey) -> Rsa64Result<u64> {
    validate_modulus(key.n)?;

    let mut codec = Radix64Codec::new();
    codec.begin_decode_path(input)?;
    let mut sink = BufWriter::new(create_output(output)?);
    let written = decrypt_from(&mut codec, &mut sink, key)?;
    codec.end_decode()?;

    debug!(written, "decrypted file");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::error::Rsa64Error;
    use crate::rsa::keygen::{generate_keypair, RsaKeyPair, RsaPublicKey};

    fn test_roundtrip(keypair: &RsaKeyPair, message: &[u8]) {
        let ciphertext = keypair.public_key.encrypt(message).unwrap();
        let decrypted = keypair.private_key.decrypt(&ciphertext).unwrap();
        assert_eq!(message, decrypted.as_slice());
    }

    #[test]
    fn test_block_bytes() {
        assert_eq!(block_bytes(65 + 256 * 66 + 65536 * 67), [65, 66, 67]);
        // Anything above 24 bits is ignored
        assert_eq!(block_bytes(0x0100_0001), [1, 0, 0]);
    }

    #[test]
    fn test_decrypt_bytes() {
        let keypair = generate_keypair().unwrap();
        let message = b"Hello, RSA!";

        let ciphertext = keypair.public_key.encrypt(message).unwrap();
        let decrypted = decrypt_bytes(&ciphertext, &keypair.private_key).unwrap();

        assert_eq!(message.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_string() {
        let keypair = generate_keypair().unwrap();
        let message = "Test message for RSA decryption";

        let ciphertext = keypair.public_key.encrypt(message.as_bytes()).unwrap();
        let decrypted = decrypt_to_string(&ciphertext, &keypair.private_key).unwrap();

        assert_eq!(message, decrypted);
    }

    #[test]
    fn test_decrypt_abc_with_textbook_key() {
        // p = 61, q = 53; blocks below 3233 round-trip
        let public_key = RsaPublicKey { n: 3233, e: 17 };
        let private_key = RsaPrivateKey { n: 3233, d: 2753 };
        let message = [65u8, 10, 0, 7];

        let ciphertext = public_key.encrypt(&message).unwrap();
        assert_eq!(private_key.decrypt(&ciphertext).unwrap(), message);
    }

    #[test]
    fn test_decrypt_empty_stream() {
        let keypair = generate_keypair().unwrap();
        let ciphertext = keypair.public_key.encrypt(b"").unwrap();
        assert!(keypair.private_key.decrypt(&ciphertext).unwrap().is_empty());
    }

    #[test]
    fn test_decrypt_truncated_stream() {
        let keypair = generate_keypair().unwrap();
        // Header claims 6 bytes but only one cipher block follows
        let mut raw = 6u32.to_le_bytes().to_vec();
        raw.extend_from_slice(&1234u32.to_le_bytes());
        let text = encode(&raw).unwrap();

        let result = keypair.private_key.decrypt(&text);
        assert!(matches!(result, Err(Rsa64Error::TruncatedStream)));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let keypair1 = generate_keypair().unwrap();
        let mut keypair2 = generate_keypair().unwrap();
        while keypair2.private_key == keypair1.private_key {
            keypair2 = generate_keypair().unwrap();
        }

        let message = b"Test message";
        let ciphertext = keypair1.public_key.encrypt(message).unwrap();

        // The stream is well formed, so decryption succeeds with garbage
        let decrypted = keypair2.private_key.decrypt(&ciphertext).unwrap();
        assert_eq!(decrypted.len(), message.len());
        assert_ne!(decrypted.as_slice(), message.as_slice());
    }

    #[test]
    fn test_roundtrip_various_sizes() {
        let keypair = generate_keypair().unwrap();

        let test_cases: Vec<Vec<u8>> = vec![
            b"A".to_vec(),
            b"AB".to_vec(),
            b"ABC".to_vec(),
            b"Hello".to_vec(),
            b"Hello, World!".to_vec(),
            vec![0u8; 100],
            vec![255u8; 100],
            (0..=255u8).collect(),
        ];

        for message in test_cases {
            test_roundtrip(&keypair, &message);
        }
    }
}
