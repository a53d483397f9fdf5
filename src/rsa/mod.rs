// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod number_theory;

pub use decrypt::{decrypt_bytes, decrypt_file, decrypt_stream, decrypt_to_string};
pub use encrypt::{encrypt_bytes, encrypt_bytes_with_config, encrypt_file, encrypt_stream, encrypt_string};
pub use keygen::{
    generate_keypair, generate_keypair_with, generate_keypair_with_config, RsaKeyPair,
    RsaPrivateKey, RsaPublicKey,
};
pub use number_theory::{gcd, is_prime, mod_exp, mod_inverse};
