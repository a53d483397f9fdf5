// Error types
// Every fallible operation in the crate reports through Rsa64Error

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the codec, the number theory routines and the cipher pipeline
#[derive(Debug, Error)]
pub enum Rsa64Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot open input file {}", path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("cannot open output file {}", path.display())]
    OpenOutput { path: PathBuf, source: io::Error },

    #[error("codec is not in encoding mode")]
    NotEncoding,

    #[error("codec is not in decoding mode")]
    NotDecoding,

    /// The source ran out before a full group of 4 symbols could be read
    #[error("encoded stream is truncated")]
    TruncatedStream,

    #[error("invalid radix-64 symbol 0x{0:02x}")]
    InvalidSymbol(u8),

    #[error("{a} has no inverse modulo {modulus}")]
    NoInverse { a: u64, modulus: u64 },

    #[error("modulus {0} is outside the supported range [2, 2^32]")]
    InvalidModulus(u64),

    #[error("input of {0} bytes does not fit the 32-bit length header")]
    InputTooLarge(u64),

    #[error("block value {block} is not below the modulus {modulus}")]
    BlockOutOfRange { block: u32, modulus: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the crate
pub type Rsa64Result<T> = Result<T, Rsa64Error>;
