//! # Core Value Types
//!
//! Fixed-width identifiers used across every registry.
//!
//! ## Clusters
//!
//! - **Parties & assets**: `Address`, `TokenId`, `Amount`
//! - **Swap identity**: `SwapId`, `HashLock`, `Preimage`
//! - **Domains & time**: `DomainId`, `Timestamp`

use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token amount. Fungible balances never go negative.
pub type Amount = u128;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Defines a fixed-width byte identifier with hex display and parsing.
macro_rules! byte_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Byte width.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Wrap raw bytes.
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// A value with every byte set to `byte`.
            pub const fn repeat(byte: u8) -> Self {
                Self([byte; $len])
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// True for the all-zero value.
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $len]
            }

            /// Copy from a slice of exactly `LEN` bytes.
            pub fn from_slice(slice: &[u8]) -> Result<Self, ParseError> {
                if slice.len() != $len {
                    return Err(ParseError::InvalidLength {
                        expected: $len,
                        got: slice.len(),
                    });
                }
                let mut bytes = [0u8; $len];
                bytes.copy_from_slice(slice);
                Ok(Self(bytes))
            }

            /// Hex encoding without prefix.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // First four bytes are enough to tell records apart in logs
                write!(f, "{}(0x{}..)", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.strip_prefix("0x").unwrap_or(s);
                let bytes =
                    hex::decode(trimmed).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
                Self::from_slice(&bytes)
            }
        }
    };
}

byte_id!(
    /// A 20-byte account address on some domain.
    Address,
    20
);

byte_id!(
    /// Address of a fungible token on its domain.
    TokenId,
    20
);

byte_id!(
    /// Deterministic swap identifier, a SHA-256 digest of the immutable
    /// swap parameters.
    SwapId,
    32
);

byte_id!(
    /// SHA-256 commitment to a secret.
    HashLock,
    32
);

byte_id!(
    /// A revealed secret. Once recorded by a withdrawal it is public.
    Preimage,
    32
);

/// Identifier of an independent execution domain (a distinct ledger).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct DomainId(pub u32);

impl DomainId {
    /// Raw numeric id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain-{}", self.0)
    }
}

impl From<u32> for DomainId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
