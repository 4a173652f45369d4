//! Ed25519 public key addresses
//!
//! Provides [`Pubkey`], the strongly-typed 32-byte account address used
//! throughout the pipeline. Addresses render as base58 text and serialize
//! as strings in human-readable formats.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte account address
///
/// Immutable and cheap to clone (Copy). The textual form is base58.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    /// Create a new Pubkey from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create a Pubkey from a byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PubkeyError> {
        if bytes.len() != 32 {
            return Err(PubkeyError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Parse a base58-encoded address
    ///
    /// # Errors
    /// Returns error if the text is not base58 or does not decode to 32 bytes
    pub fn from_base58(s: &str) -> Result<Self, PubkeyError> {
        let bytes = bs58::decode(s).into_vec()?;
        Self::from_slice(&bytes)
    }

    /// Whether the bytes decompress to a point on the ed25519 curve
    ///
    /// Program-derived addresses must be off-curve so that no private key
    /// can ever exist for them.
    #[must_use]
    pub fn is_on_curve(&self) -> bool {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0).is_ok()
    }

    /// Check if the address is all zeros (uninitialized)
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl Default for Pubkey {
    fn default() -> Self {
        Self([0; 32])
    }
}

impl Display for Pubkey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl FromStr for Pubkey {
    type Err = PubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl AsRef<[u8; 32]> for Pubkey {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl serde::Serialize for Pubkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Pubkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PubkeyVisitor;

        impl<'de> serde::de::Visitor<'de> for PubkeyVisitor {
            type Value = Pubkey;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a base58 string or 32-byte array")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Pubkey::from_slice(value).map_err(serde::de::Error::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut arr = [0u8; 32];
                for (i, byte) in arr.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &"32 bytes"))?;
                }
                Ok(Pubkey::new(arr))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(PubkeyVisitor)
        } else {
            deserializer.deserialize_bytes(PubkeyVisitor)
        }
    }
}

/// Errors that can occur when working with addresses
#[derive(Debug, thiserror::Error)]
pub enum PubkeyError {
    /// Invalid address length
    #[error("invalid address length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Base58 decoding error
    #[error("base58 decode error: {0}")]
    Base58Decode(#[from] bs58::decode::Error),
}
