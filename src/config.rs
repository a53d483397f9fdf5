// Configuration
// Tunables for key generation and the cipher pipeline

use crate::error::{Rsa64Error, Rsa64Result};
use crate::rsa::number_theory::is_prime;

/// Largest bound that keeps n = p * q below 2^32, so every cipher block fits a u32
pub const MAX_PRIME_BOUND: u64 = 65535;

/// Inclusive range that primes and public exponents are drawn from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub min: u64,
    pub max: u64,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            min: 4096,
            max: MAX_PRIME_BOUND,
        }
    }
}

impl KeyGenConfig {
    pub fn with_range(mut self, min: u64, max: u64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Check the range is usable: bounded above by MAX_PRIME_BOUND and
    /// holding at least two distinct primes
    pub fn validate(&self) -> Rsa64Result<()> {
        if self.min < 2 {
            return Err(Rsa64Error::InvalidConfig(format!(
                "lower bound {} must be at least 2",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(Rsa64Error::InvalidConfig(format!(
                "empty range [{}, {}]",
                self.min, self.max
            )));
        }
        if self.max > MAX_PRIME_BOUND {
            return Err(Rsa64Error::InvalidConfig(format!(
                "upper bound {} exceeds {}",
                self.max, MAX_PRIME_BOUND
            )));
        }

        let primes = (self.min..=self.max).filter(|&n| is_prime(n)).take(2).count();
        if primes < 2 {
            return Err(Rsa64Error::InvalidConfig(format!(
                "range [{}, {}] holds fewer than two primes",
                self.min, self.max
            )));
        }

        Ok(())
    }
}

/// Options for the encryption pipeline
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CipherConfig {
    /// Refuse blocks whose value is not below the modulus instead of
    /// encrypting them anyway
    pub strict_block_range: bool,
}

impl CipherConfig {
    pub fn with_strict_block_range(mut self, strict: bool) -> Self {
        self.strict_block_range = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_valid() {
        let config = KeyGenConfig::default();
        assert_eq!((config.min, config.max), (4096, 65535));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let base = KeyGenConfig::default();
        assert!(base.clone().with_range(1, 100).validate().is_err());
        assert!(base.clone().with_range(500, 100).validate().is_err());
        assert!(base.clone().with_range(4096, 70000).validate().is_err());
        // 24..=28 holds no primes, 23..=28 holds only one
        assert!(base.clone().with_range(24, 28).validate().is_err());
        assert!(base.clone().with_range(23, 28).validate().is_err());
        assert!(base.with_range(23, 29).validate().is_ok());
    }

    #[test]
    fn test_cipher_config_builder() {
        assert!(!CipherConfig::default().strict_block_range);
        assert!(CipherConfig::default().with_strict_block_range(true).strict_block_range);
    }
}
