//! The materialized RSA key used by the backend for private-key operations.

use core::fmt;

use num_bigint::{BigUint, IntoBigUint, ModInverse, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use pkcs8::{der::Encode, EncodePrivateKey, SecretDocument};
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::algorithms::generate::generate_primes_with_exp;
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::encoding::verify_algorithm_id;
use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Minimum value of the public exponent `e`.
const RSA_MIN_PUB_EXPONENT: u64 = 2;

/// Maximum value of the public exponent `e`.
const RSA_MAX_PUB_EXPONENT: u64 = (1 << 33) - 1;

/// Largest modulus accepted when building a key.
const RSA_MAX_MODULUS_BITS: usize = 16384;

/// Public exponent used for freshly generated keys.
const DEFAULT_EXPONENT: u32 = 65537;

/// A fully validated two-prime RSA private key.
///
/// Instances are only produced by [`NativeRsaKey::construct`],
/// [`NativeRsaKey::import_pkcs8`] and [`NativeRsaKey::generate`], so every
/// key held by this type has passed validation. All integers are zeroized
/// when the key is dropped.
pub struct NativeRsaKey {
    /// Modulus
    n: BigUint,
    /// Public exponent
    e: BigUint,
    /// Private exponent
    d: BigUint,
    /// Prime factors of N, `[p, q]`.
    primes: [BigUint; 2],
    /// Precomputed values to speed up private operations
    precomputed: PrecomputedValues,
}

/// Chinese remainder theorem values for the two primes.
struct PrecomputedValues {
    /// D mod (P-1)
    dp: BigUint,
    /// D mod (Q-1)
    dq: BigUint,
    /// Q^-1 mod P
    qinv: BigUint,
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for PrecomputedValues {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl NativeRsaKey {
    /// Builds a key from its primes and public exponent.
    ///
    /// `d` and `n` may be zero, in which case they are derived: `n = p·q` and
    /// `d = e⁻¹ mod lcm(p − 1, q − 1)`. When they are given they must agree
    /// with `p`, `q` and `e`.
    ///
    /// The resulting key is checked with a blinded encrypt/decrypt round trip
    /// driven by `rng` before it is returned.
    pub fn construct<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        p: BigUint,
        q: BigUint,
        e: BigUint,
        d: BigUint,
        n: BigUint,
    ) -> Result<NativeRsaKey> {
        // Every intermediate lives in `key` so that all exit paths zeroize it.
        let mut key = NativeRsaKey {
            n,
            e,
            d,
            primes: [p, q],
            precomputed: PrecomputedValues {
                dp: BigUint::zero(),
                dq: BigUint::zero(),
                qinv: BigUint::zero(),
            },
        };

        let [p, q] = &key.primes;
        if *p <= BigUint::one() || *q <= BigUint::one() || p == q {
            return Err(Error::InvalidPrime);
        }

        let product = p * q;
        if key.n.is_zero() {
            key.n = product;
        } else if key.n != product {
            return Err(Error::InvalidModulus);
        }

        check_public(&key)?;

        if key.d.is_zero() {
            key.d = compute_private_exponent(&key.primes, &key.e)?;
        }

        key.validate()?;
        key.precompute()?;
        key.self_test(rng)?;

        Ok(key)
    }

    /// Imports a key from the payload of a PKCS#8 `PrivateKeyInfo`.
    ///
    /// `payload` is the DER encoding of a PKCS#1 `RSAPrivateKey`. The CRT
    /// values it carries must agree with the ones derived from its primes.
    pub fn import_pkcs8<R: CryptoRngCore + ?Sized>(
        algorithm: pkcs8::AlgorithmIdentifierRef<'_>,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<NativeRsaKey> {
        verify_algorithm_id(&algorithm).map_err(pkcs8::Error::from)?;

        let pkcs1_key = pkcs1::RsaPrivateKey::try_from(payload)?;

        // Multi-prime RSA keys not currently supported
        if pkcs1_key.version() != pkcs1::Version::TwoPrime {
            return Err(pkcs1::Error::Version.into());
        }

        let key = NativeRsaKey::construct(
            rng,
            BigUint::from_bytes_be(pkcs1_key.prime1.as_bytes()),
            BigUint::from_bytes_be(pkcs1_key.prime2.as_bytes()),
            BigUint::from_bytes_be(pkcs1_key.public_exponent.as_bytes()),
            BigUint::from_bytes_be(pkcs1_key.private_exponent.as_bytes()),
            BigUint::from_bytes_be(pkcs1_key.modulus.as_bytes()),
        )?;

        let consistent = ct_eq_uint(&key.precomputed.dp, pkcs1_key.exponent1.as_bytes())
            & ct_eq_uint(&key.precomputed.dq, pkcs1_key.exponent2.as_bytes())
            & ct_eq_uint(&key.precomputed.qinv, pkcs1_key.coefficient.as_bytes());

        if !bool::from(consistent) {
            return Err(Error::InvalidCoefficient);
        }

        Ok(key)
    }

    /// Generates a new two-prime key of the given bit size with public
    /// exponent 65537.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<NativeRsaKey> {
        let exp = BigUint::from(DEFAULT_EXPONENT);
        let primes = generate_primes_with_exp(rng, bit_size, &exp)?;
        NativeRsaKey::construct(
            rng,
            primes.p,
            primes.q,
            exp,
            BigUint::zero(),
            BigUint::zero(),
        )
    }

    /// Performs basic sanity checks on the key.
    fn validate(&self) -> Result<()> {
        // Check that de ≡ 1 mod p-1, for each prime.
        // This implies that e is coprime to each p-1 as e has a multiplicative
        // inverse. Therefore e is coprime to lcm(p-1,q-1) = λ(N).
        // It also implies that a^de ≡ a mod p as a^(p-1) ≡ 1 mod p. Thus a^de
        // ≡ a mod n for all a coprime to n, as required.
        let de = Zeroizing::new(&self.e * &self.d);
        for prime in &self.primes {
            let congruence: BigUint = &*de % (prime - BigUint::one());
            if !congruence.is_one() {
                return Err(Error::InvalidExponent);
            }
        }

        Ok(())
    }

    /// Performs some calculations to speed up private key operations.
    fn precompute(&mut self) -> Result<()> {
        let [p, q] = &self.primes;

        let dp = &self.d % (p - BigUint::one());
        let dq = &self.d % (q - BigUint::one());
        let qinv = q
            .clone()
            .mod_inverse(p)
            .and_then(IntoBigUint::into_biguint)
            .ok_or(Error::InvalidPrime)?;

        self.precomputed = PrecomputedValues { dp, dq, qinv };

        Ok(())
    }

    /// Checks that a random message survives a blinded encrypt/decrypt
    /// round trip through the CRT path.
    fn self_test<R: CryptoRngCore + ?Sized>(&self, rng: &mut R) -> Result<()> {
        let mut m = rng.gen_biguint_below(&self.n);
        let c = rsa_encrypt(self, &m)?;
        let result = rsa_decrypt_and_check(self, Some(rng), &c);

        let matches = match result {
            Ok(mut decrypted) => {
                let eq = decrypted == m;
                decrypted.zeroize();
                eq
            }
            Err(_) => false,
        };
        m.zeroize();

        if matches {
            Ok(())
        } else {
            Err(Error::Internal)
        }
    }
}

/// Rejects public exponents and moduli outside of the supported range.
fn check_public(key: &impl PublicKeyParts) -> Result<()> {
    if key.n().bits() > RSA_MAX_MODULUS_BITS {
        return Err(Error::ModulusTooLarge);
    }

    let e = key.e().to_u64().ok_or(Error::PublicExponentTooLarge)?;

    if e < RSA_MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }

    if e > RSA_MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }

    if e.is_even() {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}

/// Computes `d = e⁻¹ mod lcm(p − 1, q − 1)`.
fn compute_private_exponent(primes: &[BigUint; 2], e: &BigUint) -> Result<BigUint> {
    let [p, q] = primes;
    let lambda = Zeroizing::new((p - BigUint::one()).lcm(&(q - BigUint::one())));

    e.clone()
        .mod_inverse(&*lambda)
        .and_then(IntoBigUint::into_biguint)
        .ok_or(Error::InvalidExponent)
}

/// Compares an integer against a big-endian encoding without branching on
/// the secret value.
fn ct_eq_uint(value: &BigUint, encoded: &[u8]) -> subtle::Choice {
    let expected = Zeroizing::new(value.to_bytes_be());
    let offset = encoded.iter().take_while(|b| **b == 0).count();
    expected.as_slice().ct_eq(&encoded[offset..])
}

impl PublicKeyParts for NativeRsaKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl PrivateKeyParts for NativeRsaKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn dp(&self) -> &BigUint {
        &self.precomputed.dp
    }

    fn dq(&self) -> &BigUint {
        &self.precomputed.dq
    }

    fn qinv(&self) -> &BigUint {
        &self.precomputed.qinv
    }
}

impl EncodePrivateKey for NativeRsaKey {
    fn to_pkcs8_der(&self) -> pkcs8::Result<SecretDocument> {
        let modulus = self.n.to_bytes_be();
        let public_exponent = self.e.to_bytes_be();
        let private_exponent = Zeroizing::new(self.d.to_bytes_be());
        let prime1 = Zeroizing::new(self.primes[0].to_bytes_be());
        let prime2 = Zeroizing::new(self.primes[1].to_bytes_be());
        let exponent1 = Zeroizing::new(self.precomputed.dp.to_bytes_be());
        let exponent2 = Zeroizing::new(self.precomputed.dq.to_bytes_be());
        let coefficient = Zeroizing::new(self.precomputed.qinv.to_bytes_be());

        let private_key = Zeroizing::new(
            pkcs1::RsaPrivateKey {
                modulus: pkcs1::UintRef::new(&modulus)?,
                public_exponent: pkcs1::UintRef::new(&public_exponent)?,
                private_exponent: pkcs1::UintRef::new(&private_exponent)?,
                prime1: pkcs1::UintRef::new(&prime1)?,
                prime2: pkcs1::UintRef::new(&prime2)?,
                exponent1: pkcs1::UintRef::new(&exponent1)?,
                exponent2: pkcs1::UintRef::new(&exponent2)?,
                coefficient: pkcs1::UintRef::new(&coefficient)?,
                other_prime_infos: None,
            }
            .to_der()?,
        );

        pkcs8::PrivateKeyInfo::new(pkcs1::ALGORITHM_ID, private_key.as_ref()).try_into()
    }
}

impl Zeroize for NativeRsaKey {
    fn zeroize(&mut self) {
        self.n.zeroize();
        self.e.zeroize();
        self.d.zeroize();
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.precomputed.zeroize();
    }
}

impl Drop for NativeRsaKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for NativeRsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRsaKey")
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}
