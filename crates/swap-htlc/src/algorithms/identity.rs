//! # Swap Identity
//!
//! Deterministic swap ids. Two registries on two domains compute the same id
//! for the same immutable parameters without talking to each other.
//!
//! ## Encoding
//!
//! `SHA-256(tag || fields)` where every field is fixed width:
//!
//! | Field | Width |
//! |-------|-------|
//! | Address / TokenId | 20 bytes |
//! | Amount | 16 bytes big-endian |
//! | Timestamp | 8 bytes big-endian |
//! | DomainId | 4 bytes big-endian |
//! | HashLock | 32 bytes |
//! | Option<Address> | 1 flag byte + 20 bytes (zeroed when absent) |
//!
//! The variant tag keeps ids from different registry flavours disjoint even
//! when their fields happen to encode to the same bytes.

use crate::domain::{PredefinedTerms, RelayTerms, SharedSecretTerms};
use sha2::{Digest, Sha256};
use swap_types::{Address, SwapId};

const SHARED_SECRET_TAG: &[u8] = b"htlc/shared-secret/v1";
const PREDEFINED_TAG: &[u8] = b"htlc/predefined/v1";
const RELAY_TAG: &[u8] = b"htlc/router-relay/v1";

fn finish(hasher: Sha256) -> SwapId {
    SwapId::new(hasher.finalize().into())
}

fn update_optional(hasher: &mut Sha256, address: Option<Address>) {
    match address {
        Some(addr) => {
            hasher.update([1u8]);
            hasher.update(addr.as_bytes());
        }
        None => {
            hasher.update([0u8]);
            hasher.update(Address::ZERO.as_bytes());
        }
    }
}

/// Id of a shared-secret record.
pub fn derive_shared_secret_id(terms: &SharedSecretTerms) -> SwapId {
    let mut hasher = Sha256::new();
    hasher.update(SHARED_SECRET_TAG);
    hasher.update(terms.sender.as_bytes());
    update_optional(&mut hasher, terms.receiver);
    hasher.update(terms.token.as_bytes());
    hasher.update(terms.amount.to_be_bytes());
    hasher.update(terms.hash_lock.as_bytes());
    hasher.update(terms.timelock.to_be_bytes());
    finish(hasher)
}

/// Id of a predefined record.
pub fn derive_predefined_id(terms: &PredefinedTerms) -> SwapId {
    let mut hasher = Sha256::new();
    hasher.update(PREDEFINED_TAG);
    hasher.update(terms.sender.as_bytes());
    hasher.update(terms.sender_token.as_bytes());
    hasher.update(terms.sender_amount.to_be_bytes());
    hasher.update(terms.receiver_token.as_bytes());
    hasher.update(terms.receiver_amount.to_be_bytes());
    hasher.update(terms.timelock.to_be_bytes());
    finish(hasher)
}

/// Id shared by an outbound intent and its inbound receipt.
pub fn derive_relay_id(terms: &RelayTerms) -> SwapId {
    let mut hasher = Sha256::new();
    hasher.update(RELAY_TAG);
    hasher.update(terms.sender.as_bytes());
    hasher.update(terms.sender_domain.get().to_be_bytes());
    hasher.update(terms.sender_token.as_bytes());
    hasher.update(terms.sender_amount.to_be_bytes());
    hasher.update(terms.receiver_domain.get().to_be_bytes());
    hasher.update(terms.receiver_token.as_bytes());
    hasher.update(terms.receiver_amount.to_be_bytes());
    hasher.update(terms.timelock.to_be_bytes());
    finish(hasher)
}
