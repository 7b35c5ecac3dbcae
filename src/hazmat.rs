//! ⚠️ Raw RSA primitives.
//!
//! # ☢️️ WARNING: HAZARDOUS API ☢️
//!
//! These are the unpadded RSA operations the crate runs internally to check
//! a freshly built [`NativeRsaKey`][crate::NativeRsaKey]. They map integers
//! to integers and add or remove no padding, so on their own they are not a
//! secure encryption or signature scheme.
//!
//! Only use them to build well-reviewed higher-level constructions, or to
//! test keys held in this crate against another implementation.

pub use crate::algorithms::rsa::{rsa_decrypt, rsa_decrypt_and_check, rsa_encrypt};
