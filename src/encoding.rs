//! PKCS#8 envelope handling.
//!
//! The envelope parser is deliberately lenient about what follows the
//! `privateKey` OCTET STRING: optional attributes, public keys and bytes past
//! the end of the outer SEQUENCE are skipped rather than rejected.

use pkcs8::der::{
    asn1::{Null, OctetStringRef},
    Decode, Header, Reader, SliceReader, Tag,
};
use pkcs8::{AlgorithmIdentifierRef, ObjectIdentifier};

/// `rsaEncryption` (1.2.840.113549.1.1.1).
pub const RSA_ENCRYPTION_OID: ObjectIdentifier = pkcs1::ALGORITHM_OID;

/// The fields of a PKCS#8 `PrivateKeyInfo` needed to locate the key.
#[derive(Clone, Debug)]
pub(crate) struct Envelope<'a> {
    pub algorithm: AlgorithmIdentifierRef<'a>,
    pub private_key: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Parses `SEQUENCE { INTEGER 0, AlgorithmIdentifier, OCTET STRING, ... }`.
    pub fn parse(bytes: &'a [u8]) -> pkcs8::der::Result<Self> {
        let mut reader = SliceReader::new(bytes)?;
        let header = Header::decode(&mut reader)?;
        header.tag.assert_eq(Tag::Sequence)?;

        reader.read_nested(header.length, |seq| {
            let version = u8::decode(seq)?;
            if version != 0 {
                return Err(Tag::Integer.value_error());
            }

            let algorithm = AlgorithmIdentifierRef::decode(seq)?;
            let private_key = OctetStringRef::decode(seq)?.as_bytes();

            // attributes and publicKey are not used
            let rest = seq.remaining_len();
            seq.read_slice(rest)?;

            Ok(Envelope {
                algorithm,
                private_key,
            })
        })
    }

    /// Whether the algorithm identifier names RSA.
    pub fn is_rsa(&self) -> bool {
        self.algorithm.oid == RSA_ENCRYPTION_OID
    }
}

/// Verify that the `AlgorithmIdentifier` for a key is correct.
pub(crate) fn verify_algorithm_id(algorithm: &AlgorithmIdentifierRef) -> pkcs8::spki::Result<()> {
    if algorithm.oid != RSA_ENCRYPTION_OID {
        return Err(pkcs8::spki::Error::OidUnknown { oid: algorithm.oid });
    }

    if algorithm.parameters_any()? != Null.into() {
        return Err(pkcs8::spki::Error::KeyMalformed);
    }

    Ok(())
}
