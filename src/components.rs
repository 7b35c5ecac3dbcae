//! Raw RSA private key components.

use alloc::vec::Vec;
use core::fmt;

use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Error, Result};
use crate::native::NativeRsaKey;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the length prefix in front of every field of a storage blob.
const LENGTH_PREFIX: usize = 8;

/// Names one of the eight component slots of an RSA private key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Component {
    /// First prime factor `p`.
    P,
    /// Second prime factor `q`.
    Q,
    /// CRT coefficient `q⁻¹ mod p`.
    QInv,
    /// First CRT exponent `d mod (p − 1)`.
    DP,
    /// Second CRT exponent `d mod (q − 1)`.
    DQ,
    /// Private exponent `d`.
    D,
    /// Modulus `n`.
    N,
    /// Public exponent `e`.
    E,
}

impl Component {
    /// All components, in storage blob order.
    pub const ALL: [Component; 8] = [
        Component::P,
        Component::Q,
        Component::QInv,
        Component::DP,
        Component::DQ,
        Component::D,
        Component::N,
        Component::E,
    ];

    /// Short lowercase name of the component.
    pub fn name(self) -> &'static str {
        match self {
            Component::P => "p",
            Component::Q => "q",
            Component::QInv => "qinv",
            Component::DP => "dp",
            Component::DQ => "dq",
            Component::D => "d",
            Component::N => "n",
            Component::E => "e",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight fields of an RSA private key as big-endian unsigned integers.
///
/// Each field is stored exactly as it was set, with no fixed width. An empty
/// field is unset. Fields are independent: setting one never derives or
/// checks another. All fields are zeroized when replaced or dropped.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyComponents {
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    p: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    q: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    qinv: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    dp: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    dq: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    d: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    n: Zeroizing<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(with = "hex_field"))]
    e: Zeroizing<Vec<u8>>,
}

impl KeyComponents {
    /// Creates an empty set of components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies all eight fields out of a native key.
    pub fn from_native(key: &NativeRsaKey) -> Self {
        let encode = |value: &num_bigint::BigUint| Zeroizing::new(value.to_bytes_be());

        KeyComponents {
            p: encode(&key.primes()[0]),
            q: encode(&key.primes()[1]),
            qinv: encode(key.qinv()),
            dp: encode(key.dp()),
            dq: encode(key.dq()),
            d: encode(key.d()),
            n: encode(key.n()),
            e: encode(key.e()),
        }
    }

    /// Returns the bytes of a component; empty if unset.
    pub fn get(&self, component: Component) -> &[u8] {
        self.slot(component)
    }

    /// Replaces a component. The previous value is zeroized.
    pub fn set(&mut self, component: Component, value: &[u8]) {
        let slot = self.slot_mut(component);
        slot.zeroize();
        slot.extend_from_slice(value);
    }

    /// Whether a component holds a value.
    pub fn is_set(&self, component: Component) -> bool {
        !self.slot(component).is_empty()
    }

    /// Whether `p`, `q` and `e` are present, which is enough to build a
    /// native key.
    pub fn is_sufficient(&self) -> bool {
        self.is_set(Component::P) && self.is_set(Component::Q) && self.is_set(Component::E)
    }

    /// Serializes the components into a storage blob.
    ///
    /// Every field is written as an 8-byte big-endian length followed by its
    /// bytes, in [`Component::ALL`] order.
    pub fn to_storage_bytes(&self) -> Zeroizing<Vec<u8>> {
        let len = Component::ALL
            .iter()
            .map(|c| LENGTH_PREFIX + self.slot(*c).len())
            .sum();

        let mut out = Zeroizing::new(Vec::with_capacity(len));
        for component in Component::ALL {
            let value = self.slot(component);
            out.extend_from_slice(&(value.len() as u64).to_be_bytes());
            out.extend_from_slice(value);
        }

        out
    }

    /// Parses a storage blob produced by [`KeyComponents::to_storage_bytes`].
    ///
    /// Empty fields load as unset components. Fails if the blob is truncated
    /// or has bytes past the last field.
    pub fn from_storage_bytes(mut bytes: &[u8]) -> Result<Self> {
        let mut components = KeyComponents::new();

        for component in Component::ALL {
            let value = take_field(&mut bytes)?;
            components.set(component, value);
        }

        if !bytes.is_empty() {
            return Err(Error::InvalidStorageBlob);
        }

        Ok(components)
    }

    fn slot(&self, component: Component) -> &Zeroizing<Vec<u8>> {
        match component {
            Component::P => &self.p,
            Component::Q => &self.q,
            Component::QInv => &self.qinv,
            Component::DP => &self.dp,
            Component::DQ => &self.dq,
            Component::D => &self.d,
            Component::N => &self.n,
            Component::E => &self.e,
        }
    }

    fn slot_mut(&mut self, component: Component) -> &mut Zeroizing<Vec<u8>> {
        match component {
            Component::P => &mut self.p,
            Component::Q => &mut self.q,
            Component::QInv => &mut self.qinv,
            Component::DP => &mut self.dp,
            Component::DQ => &mut self.dq,
            Component::D => &mut self.d,
            Component::N => &mut self.n,
            Component::E => &mut self.e,
        }
    }
}

/// Splits one length-prefixed field off the front of `bytes`.
fn take_field<'a>(bytes: &mut &'a [u8]) -> Result<&'a [u8]> {
    let input: &'a [u8] = *bytes;
    if input.len() < LENGTH_PREFIX {
        return Err(Error::InvalidStorageBlob);
    }

    let (prefix, rest) = input.split_at(LENGTH_PREFIX);
    let mut len = [0u8; LENGTH_PREFIX];
    len.copy_from_slice(prefix);

    let len = usize::try_from(u64::from_be_bytes(len)).map_err(|_| Error::InvalidStorageBlob)?;
    if rest.len() < len {
        return Err(Error::InvalidStorageBlob);
    }

    let (value, rest) = rest.split_at(len);
    *bytes = rest;
    Ok(value)
}

impl fmt::Debug for KeyComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for component in Component::ALL {
            if self.is_set(component) {
                set.entry(&component);
            }
        }
        set.finish()
    }
}

#[cfg(feature = "serde")]
mod hex_field {
    use alloc::vec::Vec;
    use serde::{Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub(super) fn serialize<S: Serializer>(
        value: &Zeroizing<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serdect::slice::serialize_hex_lower_or_bin(&**value, serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Zeroizing<Vec<u8>>, D::Error> {
        serdect::slice::deserialize_hex_or_bin_vec(deserializer).map(Zeroizing::new)
    }
}
