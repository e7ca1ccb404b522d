//! Core types for q-NEW keys and signatures

use std::fmt;

use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::HASH_BITS;
use crate::{Error, Result};

/// Domain parameters shared by a key pair: modulus `p`, subgroup order `q`
/// and subgroup generator `g`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainParams {
    /// Prime modulus, `p ≡ 1 (mod 2q)`
    #[serde(with = "biguint_hex")]
    pub p: BigUint,
    /// 160-bit prime subgroup order
    #[serde(with = "biguint_hex")]
    pub q: BigUint,
    /// Generator of the order-q subgroup
    #[serde(with = "biguint_hex")]
    pub g: BigUint,
}

impl DomainParams {
    /// The published seed p was derived from: the big-endian bytes of q.
    pub fn seed(&self) -> Vec<u8> {
        self.q.to_bytes_be()
    }

    /// Reject parameters that cannot serve as a modulus and a nonce range:
    /// `p == 0` or `q < 2`.
    pub(crate) fn check_group(&self) -> Result<()> {
        if self.p.is_zero() {
            return Err(Error::InvalidArgument("Modulus p must be non-zero".into()));
        }
        if self.q <= BigUint::one() {
            return Err(Error::InvalidArgument(
                "Subgroup order q must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Details needed to re-derive p from the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Bit length p was generated for
    pub bits: usize,
    /// Number of rejected candidates before p was accepted
    pub counter: u32,
}

/// Private scalar x, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar(BigUint);

impl SecretScalar {
    /// Wrap a private scalar
    pub fn new(x: BigUint) -> Self {
        Self(x)
    }

    /// Borrow the scalar value
    pub fn expose(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}

impl Serialize for SecretScalar {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        biguint_hex::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SecretScalar {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        biguint_hex::deserialize(deserializer).map(SecretScalar)
    }
}

/// Which halves of a key a record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyMaterial {
    /// Public values only
    PublicOnly,
    /// Public values and the private scalar x
    PublicPrivate {
        /// Private scalar, `0 < x < q`
        x: SecretScalar,
    },
}

/// A q-NEW key: domain parameters, public value y and optionally the private
/// scalar x.
///
/// Records are immutable once built and can be shared across threads for
/// signing and verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    params: DomainParams,
    #[serde(with = "biguint_hex")]
    y: BigUint,
    material: KeyMaterial,
}

impl KeyRecord {
    /// Build a public-only record
    pub fn public(params: DomainParams, y: BigUint) -> Self {
        Self {
            params,
            y,
            material: KeyMaterial::PublicOnly,
        }
    }

    /// Build a record holding both public values and the private scalar
    pub fn private(params: DomainParams, y: BigUint, x: BigUint) -> Self {
        Self {
            params,
            y,
            material: KeyMaterial::PublicPrivate {
                x: SecretScalar::new(x),
            },
        }
    }

    /// Build a record from the positional tuple `(p, q, g, y[, x])`.
    ///
    /// Exactly four (public) or five (private) fields are accepted.
    pub fn construct(fields: &[BigUint]) -> Result<Self> {
        match fields {
            [p, q, g, y] => Ok(Self::public(
                DomainParams {
                    p: p.clone(),
                    q: q.clone(),
                    g: g.clone(),
                },
                y.clone(),
            )),
            [p, q, g, y, x] => Ok(Self::private(
                DomainParams {
                    p: p.clone(),
                    q: q.clone(),
                    g: g.clone(),
                },
                y.clone(),
                x.clone(),
            )),
            _ => Err(Error::InvalidArgument(format!(
                "construct() expects 4 or 5 fields, got {}",
                fields.len()
            ))),
        }
    }

    /// Domain parameters
    pub fn params(&self) -> &DomainParams {
        &self.params
    }

    /// Public value `y = g^x mod p`
    pub fn y(&self) -> &BigUint {
        &self.y
    }

    /// Private scalar, if present
    pub fn x(&self) -> Option<&BigUint> {
        match &self.material {
            KeyMaterial::PublicOnly => None,
            KeyMaterial::PublicPrivate { x } => Some(x.expose()),
        }
    }

    /// Which halves of the key this record carries
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Published seed for the domain parameters
    pub fn seed(&self) -> Vec<u8> {
        self.params.seed()
    }

    /// Maximum size in bits of a digest this key is meant to sign.
    ///
    /// Fixed by the hash width, independent of the size of p.
    pub fn size(&self) -> usize {
        HASH_BITS
    }

    /// Whether the record holds the private scalar
    pub fn has_private(&self) -> bool {
        matches!(self.material, KeyMaterial::PublicPrivate { .. })
    }

    /// q-NEW keys can always sign
    pub fn can_sign(&self) -> bool {
        true
    }

    /// q-NEW is a signature-only scheme
    pub fn can_encrypt(&self) -> bool {
        false
    }

    /// A new record with only `(p, q, g, y)`.
    pub fn public_projection(&self) -> KeyRecord {
        KeyRecord::public(self.params.clone(), self.y.clone())
    }
}

/// A q-NEW signature `(r, s)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// R component, `(g^K mod p) mod q`
    #[serde(with = "biguint_hex")]
    pub r: BigUint,
    /// S component, `(K - r*M*x) mod q`
    #[serde(with = "biguint_hex")]
    pub s: BigUint,
}

impl Signature {
    /// Create a new signature
    pub fn new(r: BigUint, s: BigUint) -> Self {
        Self { r, s }
    }

    /// Parse a signature from hex-encoded components
    pub fn from_hex(r: &str, s: &str) -> Result<Self> {
        Ok(Self {
            r: biguint_hex::decode(r)?,
            s: biguint_hex::decode(s)?,
        })
    }
}

/// Hex encoding of big integers for serde
pub mod biguint_hex {
    use num_bigint_dig::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parse a big-endian hex integer. A `0x` prefix and an odd number of
    /// digits are both accepted.
    pub fn decode(encoded: &str) -> Result<BigUint, hex::FromHexError> {
        let digits = encoded.trim_start_matches("0x");
        let bytes = if digits.len() % 2 == 1 {
            hex::decode(format!("0{}", digits))?
        } else {
            hex::decode(digits)?
        };
        Ok(BigUint::from_bytes_be(&bytes))
    }

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(value.to_bytes_be()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        decode(&encoded)
            .map_err(|e| serde::de::Error::custom(format!("Invalid hex integer: {}", e)))
    }
}
