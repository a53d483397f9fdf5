// RSA Key Generation
// Random prime search over a small range, then e and d from the totient

use std::fmt;

use rand::distributions::{Distribution, Uniform};
use rand::{thread_rng, Rng};
use tracing::{debug, trace};

use super::number_theory::{gcd, is_prime, mod_inverse};
use crate::config::KeyGenConfig;
use crate::error::{Rsa64Error, Rsa64Result};

/// Largest modulus whose residues still fit the 32-bit cipher block
pub const MAX_MODULUS: u64 = 1 << 32;

/// RSA Public Key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: u64, // Modulus
    pub e: u64, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: u64, // Modulus (same as public)
    pub d: u64, // Private exponent
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

/// Reject moduli the cipher pipeline cannot work with
pub fn validate_modulus(n: u64) -> Rsa64Result<()> {
    if !(2..=MAX_MODULUS).contains(&n) {
        return Err(Rsa64Error::InvalidModulus(n));
    }
    Ok(())
}

impl RsaPublicKey {
    pub fn new(n: u64, e: u64) -> Rsa64Result<Self> {
        validate_modulus(n)?;
        Ok(Self { n, e })
    }

    /// Encrypt a message into radix-64 text
    pub fn encrypt(&self, plaintext: &[u8]) -> Rsa64Result<String> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }
}

impl RsaPrivateKey {
    pub fn new(n: u64, d: u64) -> Rsa64Result<Self> {
        validate_modulus(n)?;
        Ok(Self { n, d })
    }

    /// Decrypt radix-64 text produced by [`RsaPublicKey::encrypt`]
    pub fn decrypt(&self, ciphertext: &str) -> Rsa64Result<Vec<u8>> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.n, self.e)
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.n, self.d)
    }
}

/// Two-line key report, as printed by `rsa64 -k`
impl fmt::Display for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Public key: {}", self.public_key)?;
        write!(f, "Private key: {}", self.private_key)
    }
}

/// Draw from `dist` until a prime comes up
fn sample_prime<R: Rng + ?Sized>(rng: &mut R, dist: &Uniform<u64>) -> u64 {
    loop {
        let candidate = dist.sample(rng);
        if is_prime(candidate) {
            return candidate;
        }
    }
}

/// Generate a key pair from `rng` with primes and e drawn from `config`'s range
pub fn generate_keypair_with<R: Rng + ?Sized>(
    rng: &mut R,
    config: &KeyGenConfig,
) -> Rsa64Result<RsaKeyPair> {
    config.validate()?;
    let dist = Uniform::new_inclusive(config.min, config.max);

    // Step 1: Pick two distinct random primes p and q
    let p = sample_prime(rng, &dist);
    let mut q = sample_prime(rng, &dist);
    while q == p {
        q = sample_prime(rng, &dist);
    }

    // Step 2: n = p * q and f = (p-1)(q-1)
    let n = p * q;
    let f = (p - 1) * (q - 1);
    trace!(p, q, f, "picked primes");

    // Step 3: Pick e from the same range, coprime with f
    let e = loop {
        let candidate = dist.sample(rng);
        if gcd(candidate as i64, f as i64) == 1 {
            break candidate;
        }
    };

    // Step 4: d = e^(-1) mod f
    let d = mod_inverse(e, f)?;

    debug!(n, e, "generated key pair");

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { n, e },
        private_key: RsaPrivateKey { n, d },
    })
}

/// Generate a key pair with the given range, using the thread-local RNG
pub fn generate_keypair_with_config(config: &KeyGenConfig) -> Rsa64Result<RsaKeyPair> {
    generate_keypair_with(&mut thread_rng(), config)
}

/// Generate RSA key pair with default settings (primes in [4096, 65535])
pub fn generate_keypair() -> Rsa64Result<RsaKeyPair> {
    generate_keypair_with_config(&KeyGenConfig::default())
}
