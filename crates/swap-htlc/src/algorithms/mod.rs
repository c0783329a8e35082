//! # Algorithms
//!
//! Swap id derivation and hash-lock cryptography.

pub mod identity;
pub mod secret;

pub use identity::{derive_predefined_id, derive_relay_id, derive_shared_secret_id};
pub use secret::{generate_secret, hash_lock_for, verify_preimage};
