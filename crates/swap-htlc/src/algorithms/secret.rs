//! # Secret Generation and Verification
//!
//! SHA-256 hash locks. The same digest is used on every domain so that a
//! preimage revealed on one leg withdraws the other.

use crate::domain::SwapSecret;
use rand::RngCore;
use sha2::{Digest, Sha256};
use swap_types::{HashLock, Preimage};

/// Generate a fresh secret and its hash lock.
pub fn generate_secret() -> (SwapSecret, HashLock) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = SwapSecret::new(bytes);
    let lock = hash_lock_for(&secret.reveal());
    zeroize::Zeroize::zeroize(&mut bytes);
    (secret, lock)
}

/// Commitment to a preimage.
pub fn hash_lock_for(preimage: &Preimage) -> HashLock {
    HashLock::new(Sha256::digest(preimage.as_bytes()).into())
}

/// True if `preimage` opens `lock`.
pub fn verify_preimage(preimage: &Preimage, lock: &HashLock) -> bool {
    hash_lock_for(preimage) == *lock
}
