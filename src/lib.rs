//! Toy RSA block cipher over a streaming radix-64 text codec.
//!
//! Keys are built from two primes drawn from a small range, plaintext is cut
//! into 3-byte blocks, and each block is raised to the key exponent modulo n.
//! The resulting 32-bit integers are written little-endian through
//! [`codec::Radix64Codec`], after a 32-bit header holding the plaintext length.
//!
//! ```
//! use rsa64::rsa::generate_keypair;
//!
//! let keypair = generate_keypair().unwrap();
//! let text = keypair.public_key.encrypt(b"attack at dawn").unwrap();
//! let plain = keypair.private_key.decrypt(&text).unwrap();
//! assert_eq!(plain, b"attack at dawn");
//! ```
//!
//! The key sizes are far too small to offer any real security.

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod rsa;
pub mod util;

pub use config::{CipherConfig, KeyGenConfig};
pub use error::{Rsa64Error, Rsa64Result};
