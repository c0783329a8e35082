//! # Domain Value Objects
//!
//! Record state machines and the immutable parameter sets each variant's
//! swap id is derived from.

use serde::{Deserialize, Serialize};
use swap_types::{Address, Amount, DomainId, HashLock, Timestamp, TokenId};

/// Lifecycle of an escrow record.
///
/// `NonExistent -> Pending -> {Withdrawn, Refunded}`. Holding the state as
/// one enum makes `withdrawn && refunded` unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapState {
    /// Escrow held, awaiting withdrawal or expiry.
    #[default]
    Pending,
    /// Paid to the counterparty.
    Withdrawn,
    /// Paid back to the depositor.
    Refunded,
}

impl SwapState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SwapState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Withdrawn) | (Self::Pending, Self::Refunded)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Withdrawn | Self::Refunded)
    }
}

/// Lifecycle of an inbound receipt on the receiver side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptState {
    /// Return asset escrowed, confirmation requested.
    #[default]
    Pending,
    /// Remote intent reported withdrawn; return asset paid to the original sender.
    Confirmed,
    /// Never confirmed; escrow paid back to the receiver after expiry.
    Refunded,
}

impl ReceiptState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: ReceiptState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Refunded)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Refunded)
    }
}

/// Immutable parameters of a shared-secret leg.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSecretTerms {
    /// Escrow depositor.
    pub sender: Address,
    /// Designated withdrawer, if any.
    pub receiver: Option<Address>,
    /// Escrowed token.
    pub token: TokenId,
    /// Escrowed amount.
    pub amount: Amount,
    /// Commitment to the secret.
    pub hash_lock: HashLock,
    /// Absolute expiry.
    pub timelock: Timestamp,
}

/// Immutable parameters of a predefined (secret-less) leg.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedTerms {
    /// Escrow depositor.
    pub sender: Address,
    /// Escrowed token.
    pub sender_token: TokenId,
    /// Escrowed amount.
    pub sender_amount: Amount,
    /// Token the depositor wants back.
    pub receiver_token: TokenId,
    /// Amount the depositor wants back.
    pub receiver_amount: Amount,
    /// Absolute expiry.
    pub timelock: Timestamp,
}

impl PredefinedTerms {
    /// Terms of the reverse leg as seen from the withdrawer.
    pub fn reversed(&self, withdrawer: Address) -> Self {
        Self {
            sender: withdrawer,
            sender_token: self.receiver_token,
            sender_amount: self.receiver_amount,
            receiver_token: self.sender_token,
            receiver_amount: self.sender_amount,
            timelock: self.timelock,
        }
    }
}

/// Immutable parameters of a router-relay swap. Both the sender and the
/// receiver registry derive the same id from these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayTerms {
    /// Intent owner on the sender domain.
    pub sender: Address,
    /// Domain hosting the sender registry.
    pub sender_domain: DomainId,
    /// Token escrowed on the sender domain.
    pub sender_token: TokenId,
    /// Amount escrowed on the sender domain.
    pub sender_amount: Amount,
    /// Domain hosting the receiver registry.
    pub receiver_domain: DomainId,
    /// Token escrowed on the receiver domain.
    pub receiver_token: TokenId,
    /// Amount escrowed on the receiver domain.
    pub receiver_amount: Amount,
    /// Absolute expiry shared by both legs.
    pub timelock: Timestamp,
}
