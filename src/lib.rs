#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Usage
//!
//! ## Building a key from its primes
//!
//! ```
//! use rsa_privkey::{traits::PublicKeyParts, RsaPrivateKey};
//! use hex_literal::hex;
//!
//! let mut key = RsaPrivateKey::new();
//! key.set_p(&hex!("fa818531f47bd226e280db8c706772695e4a94a059d845e92208dea777104c3d"));
//! key.set_q(&hex!("eade40b2212a6a0cc374829febe4d74dd3de6beb12761095ed40bdd22087b1fd"));
//! key.set_e(&hex!("010001"));
//!
//! let native = key.native_key().expect("p, q and e are consistent");
//! assert_eq!(native.size(), 64);
//! assert!(key.is_materialized());
//!
//! // any change releases the native key
//! key.set_e(&hex!("03"));
//! assert!(!key.is_materialized());
//! ```
//!
//! ## PKCS#8 round trip
//!
//! ```
//! use rsa_privkey::{DecodeError, RsaPrivateKey};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//!
//! let mut key = RsaPrivateKey::generate_with_rng(&mut rng, 1024).expect("failed to generate a key");
//! let der = key.encode_pkcs8_der_with_rng(&mut rng);
//! assert!(!der.is_empty());
//!
//! let mut decoded = RsaPrivateKey::new();
//! decoded.decode_pkcs8_der_with_rng(&der, &mut rng).expect("failed to decode");
//! assert_eq!(decoded.n(), key.n());
//!
//! assert_eq!(decoded.decode_pkcs8_der(&[]), Err(DecodeError::EmptyInput));
//! ```

#[cfg(doctest)]
pub struct ReadmeDoctests;

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;
pub use rand_core;

mod algorithms;
mod cache;
pub mod components;
mod encoding;
pub mod errors;
mod key;
mod native;
pub mod traits;

#[cfg(feature = "hazmat")]
pub mod hazmat;

pub use pkcs1;
pub use pkcs8;

pub use crate::{
    components::{Component, KeyComponents},
    encoding::RSA_ENCRYPTION_OID,
    errors::{DecodeError, Error, Result},
    key::RsaPrivateKey,
    native::NativeRsaKey,
};
