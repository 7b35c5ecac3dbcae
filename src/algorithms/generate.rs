//! Generate prime components for the RSA Private Key

use num_bigint::{BigUint, RandPrime};
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};

/// Number of primes in every key this crate produces.
const NPRIMES: usize = 2;

/// Fresh primes for a two-prime key. `n` and `d` are left to the key
/// construction step.
pub(crate) struct GeneratedPrimes {
    pub p: BigUint,
    pub q: BigUint,
}

/// Generates the two primes of an RSA key of the given bit size such that
/// `exp` is invertible modulo `lcm(p - 1, q - 1)`.
///
/// The top two bits of every prime are set, so the modulus has exactly
/// `bit_size` bits.
pub(crate) fn generate_primes_with_exp<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<GeneratedPrimes> {
    if bit_size < 64 {
        let prime_limit = (1u64 << (bit_size / NPRIMES) as u64) as f64;

        // pi approximates the number of primes less than prime_limit

        // Calculate `log(prime_limit)` as `log(x) = log2(x) / log2(e) = log2(x) * log(2)`.
        let mut pi = prime_limit / ((bit_size / NPRIMES) as f64 * core::f64::consts::LN_2 - 1.);

        // Generated primes start with 0b11, so we can only use a quarter of them.
        pi /= 4f64;
        // Use a factor of two to ensure that key generation terminates in a
        // reasonable amount of time.
        pi /= 2f64;

        if pi < NPRIMES as f64 {
            return Err(Error::TooFewPrimes);
        }
    }

    loop {
        let p = rng.gen_prime(bit_size / NPRIMES);
        let q = rng.gen_prime(bit_size - p.bits());

        if p == q {
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            continue;
        }

        let lambda = (&p - BigUint::one()).lcm(&(&q - BigUint::one()));
        if exp.gcd(&lambda).is_one() {
            return Ok(GeneratedPrimes { p, q });
        }
    }
}
