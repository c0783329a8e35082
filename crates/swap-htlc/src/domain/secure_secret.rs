//! # Swap Secret
//!
//! Holder for an unrevealed swap secret. The bytes are zeroed on drop and
//! never appear in `Debug` output. Once revealed through a withdrawal the
//! secret becomes a plain [`Preimage`] on the record.

use serde::{Deserialize, Serialize};
use swap_types::Preimage;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An unrevealed 32-byte secret.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SwapSecret {
    inner: [u8; 32],
}

impl SwapSecret {
    /// Wrap secret bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { inner: bytes }
    }

    /// Copy from a 32-byte slice.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let inner: [u8; 32] = slice.try_into().ok()?;
        Some(Self { inner })
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.inner
    }

    /// Hand the secret over for a withdrawal. The returned value is public
    /// from then on.
    pub fn reveal(&self) -> Preimage {
        Preimage::new(self.inner)
    }
}

impl std::fmt::Debug for SwapSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SwapSecret(***)")
    }
}

impl Serialize for SwapSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for SwapSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let secret = Self::from_slice(&bytes);
        bytes.zeroize();
        secret.ok_or_else(|| serde::de::Error::custom("secret must be 32 bytes"))
    }
}
