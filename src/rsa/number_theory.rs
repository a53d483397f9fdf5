// Number Theory Helpers
// Primality, gcd, modular inverse and modular exponentiation on machine words

use num_integer::Integer;

use crate::error::{Rsa64Error, Rsa64Result};

/// Trial-division primality test
/// Checks 2 and evenness first, then odd factors up to sqrt(n)
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // u128 so factor * factor cannot wrap near u64::MAX
    let n_wide = u128::from(n);
    let mut factor = 3u64;
    while u128::from(factor) * u128::from(factor) <= n_wide {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }

    true
}

/// Greatest common divisor of |a| and |b|
/// gcd(0, 0) is 0
pub fn gcd(a: i64, b: i64) -> u64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();

    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }

    a
}

/// Compute t such that (a * t) % n == 1, using the extended Euclidean algorithm
/// Returns NoInverse when gcd(a, n) != 1
pub fn mod_inverse(a: u64, n: u64) -> Rsa64Result<u64> {
    if n == 0 {
        return Err(Rsa64Error::NoInverse { a, modulus: n });
    }

    let (mut r, mut r_new) = (i128::from(n), i128::from(a));
    let (mut t, mut t_new) = (0i128, 1i128);

    while r_new != 0 {
        let q = r / r_new;
        (r, r_new) = (r_new, r - q * r_new);
        (t, t_new) = (t_new, t - q * t_new);
    }

    if r != 1 {
        return Err(Rsa64Error::NoInverse { a, modulus: n });
    }

    // Bezout coefficients stay within (-n, n)
    if t < 0 {
        t += i128::from(n);
    }

    Ok(t as u64)
}

/// Modular exponentiation: base^exponent mod modulus
/// Square-and-multiply, with u128 intermediates so no step can overflow.
/// The result starts at 1, so any exponent of 0 yields 1, even for modulus 1.
///
/// `modulus` must be non-zero.
pub fn mod_exp(base: u64, exponent: u64, modulus: u64) -> u64 {
    debug_assert!(modulus != 0, "mod_exp called with a zero modulus");

    let modulus = u128::from(modulus);
    let mut result = 1u128;
    let mut base = u128::from(base);
    let mut exponent = exponent;

    while exponent != 0 {
        if exponent.is_odd() {
            result = (result * base) % modulus;
        }
        base = (base * base) % modulus;
        exponent >>= 1;
    }

    result as u64
}
