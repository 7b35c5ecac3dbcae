//! Error types.

use alloc::string::String;
use pkcs8::ObjectIdentifier;

/// Alias for [`core::result::Result`] with the `rsa-privkey` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types raised while constructing, validating or exporting a key.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `p`, `q` and `e` must all be set before a native key can be built.
    #[error("key components p, q and e are required")]
    MissingComponents,

    /// Invalid prime value.
    #[error("invalid prime value")]
    InvalidPrime,

    /// Invalid modulus.
    #[error("invalid modulus")]
    InvalidModulus,

    /// Invalid exponent.
    #[error("invalid exponent")]
    InvalidExponent,

    /// Invalid coefficient.
    #[error("invalid coefficient")]
    InvalidCoefficient,

    /// Modulus too large.
    #[error("modulus too large")]
    ModulusTooLarge,

    /// Public exponent too small.
    #[error("public exponent too small")]
    PublicExponentTooSmall,

    /// Public exponent too large.
    #[error("public exponent too large")]
    PublicExponentTooLarge,

    /// Too few primes of a given length to generate an RSA key.
    #[error("too few primes of given length to generate an RSA key")]
    TooFewPrimes,

    /// Decryption error.
    #[error("decryption error")]
    Decryption,

    /// Internal error.
    #[error("internal error")]
    Internal,

    /// Truncated or incomplete storage blob.
    #[error("invalid storage blob")]
    InvalidStorageBlob,

    /// PKCS#1 error.
    #[error("{0}")]
    Pkcs1(pkcs1::Error),

    /// PKCS#8 error.
    #[error("{0}")]
    Pkcs8(pkcs8::Error),
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        Error::Pkcs1(err)
    }
}

impl From<pkcs8::Error> for Error {
    fn from(err: pkcs8::Error) -> Error {
        Error::Pkcs8(err)
    }
}

impl From<pkcs8::der::Error> for Error {
    fn from(err: pkcs8::der::Error) -> Error {
        Error::Pkcs8(err.into())
    }
}

/// Reasons a PKCS#8 document could not be loaded into a key.
///
/// A failed decode never modifies the key it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input was empty.
    #[error("empty input")]
    EmptyInput,

    /// The `privateKey` OCTET STRING was empty.
    #[error("empty key payload")]
    EmptyPayload,

    /// The algorithm identifier is not `rsaEncryption`.
    #[error("algorithm mismatch: {oid} is not rsaEncryption")]
    AlgorithmMismatch {
        /// Object identifier found in the document.
        oid: ObjectIdentifier,
    },

    /// The document could not be parsed or the key it carries is invalid.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl From<pkcs8::der::Error> for DecodeError {
    fn from(err: pkcs8::der::Error) -> DecodeError {
        DecodeError::MalformedInput(format!("{err}"))
    }
}

impl From<Error> for DecodeError {
    fn from(err: Error) -> DecodeError {
        DecodeError::MalformedInput(format!("{err}"))
    }
}
