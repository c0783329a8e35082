//! # Domain Entities
//!
//! Escrow records owned by the registries.
//!
//! | Record | Registry | Terminal states |
//! |--------|----------|-----------------|
//! | `SwapRecord` | shared-secret | Withdrawn, Refunded |
//! | `PredefinedSwapRecord` | predefined | Withdrawn, Refunded |
//! | `OutboundSwapIntent` | sender (router-relay) | Withdrawn, Refunded |
//! | `InboundReceipt` | receiver (router-relay) | Confirmed, Refunded |

use super::errors::SwapError;
use super::value_objects::{
    PredefinedTerms, ReceiptState, RelayTerms, SharedSecretTerms, SwapState,
};
use serde::{Deserialize, Serialize};
use swap_types::{Address, Amount, DomainId, HashLock, Preimage, SwapId, Timestamp, TokenId};

/// A record whose escrow is held by a registry.
pub trait EscrowRecord {
    /// Record id.
    fn id(&self) -> SwapId;

    /// Token and amount held in escrow, `None` once terminal.
    fn escrow(&self) -> Option<(TokenId, Amount)>;
}

/// Reject a transition out of a terminal swap state.
fn check_swap_transition(id: SwapId, from: SwapState, to: SwapState) -> Result<(), SwapError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    Err(match from {
        SwapState::Withdrawn => SwapError::AlreadyWithdrawn(id),
        SwapState::Refunded => SwapError::AlreadyRefunded(id),
        // Pending -> Pending is the only remaining invalid pair
        SwapState::Pending => SwapError::NotFound(id),
    })
}

// =============================================================================
// SHARED-SECRET VARIANT
// =============================================================================

/// Hash/time-locked escrow released by revealing the secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    /// Derived identifier.
    pub id: SwapId,
    /// Escrow depositor, the only party that may refund.
    pub sender: Address,
    /// Designated withdrawer; `None` lets any revealer withdraw.
    pub receiver: Option<Address>,
    /// Escrowed token.
    pub token: TokenId,
    /// Escrowed amount.
    pub amount: Amount,
    /// SHA-256 commitment to the secret.
    pub hash_lock: HashLock,
    /// Absolute expiry.
    pub timelock: Timestamp,
    /// Current state.
    pub state: SwapState,
    /// Revealed secret, set only by a successful withdrawal.
    pub preimage: Option<Preimage>,
    /// Who withdrew.
    pub withdrawn_by: Option<Address>,
    /// Creation time.
    pub created_at: Timestamp,
}

impl SwapRecord {
    /// Create a pending record from its terms.
    pub fn new(id: SwapId, terms: SharedSecretTerms, created_at: Timestamp) -> Self {
        Self {
            id,
            sender: terms.sender,
            receiver: terms.receiver,
            token: terms.token,
            amount: terms.amount,
            hash_lock: terms.hash_lock,
            timelock: terms.timelock,
            state: SwapState::Pending,
            preimage: None,
            withdrawn_by: None,
            created_at,
        }
    }

    /// Withdrawn flag.
    pub fn withdrawn(&self) -> bool {
        self.state == SwapState::Withdrawn
    }

    /// Refunded flag.
    pub fn refunded(&self) -> bool {
        self.state == SwapState::Refunded
    }

    /// Record the revealed secret and mark withdrawn.
    pub fn withdraw(&mut self, preimage: Preimage, by: Address) -> Result<(), SwapError> {
        check_swap_transition(self.id, self.state, SwapState::Withdrawn)?;
        self.preimage = Some(preimage);
        self.withdrawn_by = Some(by);
        self.state = SwapState::Withdrawn;
        Ok(())
    }

    /// Mark refunded.
    pub fn refund(&mut self) -> Result<(), SwapError> {
        check_swap_transition(self.id, self.state, SwapState::Refunded)?;
        self.state = SwapState::Refunded;
        Ok(())
    }
}

impl EscrowRecord for SwapRecord {
    fn id(&self) -> SwapId {
        self.id
    }

    fn escrow(&self) -> Option<(TokenId, Amount)> {
        (self.state == SwapState::Pending).then_some((self.token, self.amount))
    }
}

// =============================================================================
// PREDEFINED VARIANT
// =============================================================================

/// Escrow settled by the counterparty paying the reciprocal asset in the
/// same call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedSwapRecord {
    /// Derived identifier.
    pub id: SwapId,
    /// Escrow depositor.
    pub sender: Address,
    /// Escrowed token.
    pub sender_token: TokenId,
    /// Escrowed amount.
    pub sender_amount: Amount,
    /// Token owed to the depositor.
    pub receiver_token: TokenId,
    /// Amount owed to the depositor.
    pub receiver_amount: Amount,
    /// Absolute expiry.
    pub timelock: Timestamp,
    /// Counterparty that received `sender_amount`; unset while pending.
    pub receiver: Option<Address>,
    /// Current state.
    pub state: SwapState,
    /// Matching leg of the same logical swap.
    pub counterparty_record: Option<SwapId>,
    /// Creation time.
    pub created_at: Timestamp,
}

impl PredefinedSwapRecord {
    /// Create a pending record from its terms.
    pub fn new(id: SwapId, terms: PredefinedTerms, created_at: Timestamp) -> Self {
        Self {
            id,
            sender: terms.sender,
            sender_token: terms.sender_token,
            sender_amount: terms.sender_amount,
            receiver_token: terms.receiver_token,
            receiver_amount: terms.receiver_amount,
            timelock: terms.timelock,
            receiver: None,
            state: SwapState::Pending,
            counterparty_record: None,
            created_at,
        }
    }

    /// Reverse leg, created already settled and linked back to `origin`.
    pub fn settled_mirror(
        id: SwapId,
        terms: PredefinedTerms,
        origin: &PredefinedSwapRecord,
        created_at: Timestamp,
    ) -> Self {
        Self {
            receiver: Some(origin.sender),
            state: SwapState::Withdrawn,
            counterparty_record: Some(origin.id),
            ..Self::new(id, terms, created_at)
        }
    }

    /// Immutable terms of this leg.
    pub fn terms(&self) -> PredefinedTerms {
        PredefinedTerms {
            sender: self.sender,
            sender_token: self.sender_token,
            sender_amount: self.sender_amount,
            receiver_token: self.receiver_token,
            receiver_amount: self.receiver_amount,
            timelock: self.timelock,
        }
    }

    /// Withdrawn flag.
    pub fn withdrawn(&self) -> bool {
        self.state == SwapState::Withdrawn
    }

    /// Refunded flag.
    pub fn refunded(&self) -> bool {
        self.state == SwapState::Refunded
    }

    /// Mark withdrawn by `receiver`, linking the reverse leg.
    pub fn withdraw(&mut self, receiver: Address, counterparty: SwapId) -> Result<(), SwapError> {
        check_swap_transition(self.id, self.state, SwapState::Withdrawn)?;
        self.receiver = Some(receiver);
        self.counterparty_record = Some(counterparty);
        self.state = SwapState::Withdrawn;
        Ok(())
    }

    /// Mark refunded.
    pub fn refund(&mut self) -> Result<(), SwapError> {
        check_swap_transition(self.id, self.state, SwapState::Refunded)?;
        self.state = SwapState::Refunded;
        Ok(())
    }
}

impl EscrowRecord for PredefinedSwapRecord {
    fn id(&self) -> SwapId {
        self.id
    }

    fn escrow(&self) -> Option<(TokenId, Amount)> {
        (self.state == SwapState::Pending).then_some((self.sender_token, self.sender_amount))
    }
}

// =============================================================================
// ROUTER-RELAY VARIANT
// =============================================================================

/// Outbound swap intent held by the sender registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSwapIntent {
    /// Derived identifier, shared with the remote receipt.
    pub id: SwapId,
    /// Intent owner.
    pub sender: Address,
    /// Escrowed token.
    pub sender_token: TokenId,
    /// Escrowed amount.
    pub sender_amount: Amount,
    /// Absolute expiry.
    pub timelock: Timestamp,
    /// Domain the counter-asset lives on.
    pub receiver_domain: DomainId,
    /// Counter-asset token.
    pub receiver_token: TokenId,
    /// Counter-asset amount.
    pub receiver_amount: Amount,
    /// Set by the confirmation message to whoever withdrew.
    pub receiver: Option<Address>,
    /// Current state.
    pub state: SwapState,
    /// Creation time.
    pub created_at: Timestamp,
}

impl OutboundSwapIntent {
    /// Create a pending intent from its terms.
    pub fn new(id: SwapId, terms: &RelayTerms, created_at: Timestamp) -> Self {
        Self {
            id,
            sender: terms.sender,
            sender_token: terms.sender_token,
            sender_amount: terms.sender_amount,
            timelock: terms.timelock,
            receiver_domain: terms.receiver_domain,
            receiver_token: terms.receiver_token,
            receiver_amount: terms.receiver_amount,
            receiver: None,
            state: SwapState::Pending,
            created_at,
        }
    }

    /// Withdrawn flag.
    pub fn withdrawn(&self) -> bool {
        self.state == SwapState::Withdrawn
    }

    /// Refunded flag.
    pub fn refunded(&self) -> bool {
        self.state == SwapState::Refunded
    }

    /// Mark withdrawn by the confirmed receiver.
    pub fn withdraw(&mut self, receiver: Address) -> Result<(), SwapError> {
        check_swap_transition(self.id, self.state, SwapState::Withdrawn)?;
        self.receiver = Some(receiver);
        self.state = SwapState::Withdrawn;
        Ok(())
    }

    /// Mark refunded.
    pub fn refund(&mut self) -> Result<(), SwapError> {
        check_swap_transition(self.id, self.state, SwapState::Refunded)?;
        self.state = SwapState::Refunded;
        Ok(())
    }
}

impl EscrowRecord for OutboundSwapIntent {
    fn id(&self) -> SwapId {
        self.id
    }

    fn escrow(&self) -> Option<(TokenId, Amount)> {
        (self.state == SwapState::Pending).then_some((self.sender_token, self.sender_amount))
    }
}

/// Inbound receipt held by the receiver registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundReceipt {
    /// Same id as the remote intent.
    pub id: SwapId,
    /// Depositor of the return asset; refunded on expiry.
    pub receiver: Address,
    /// Intent owner on the sender domain; paid on confirmation.
    pub payee: Address,
    /// Domain of the matching intent.
    pub sender_domain: DomainId,
    /// Escrowed token.
    pub token: TokenId,
    /// Escrowed amount.
    pub amount: Amount,
    /// Absolute expiry.
    pub timelock: Timestamp,
    /// Current state.
    pub state: ReceiptState,
    /// Creation time.
    pub created_at: Timestamp,
}

impl InboundReceipt {
    /// Create a pending receipt for `receiver` against the intent described by `terms`.
    pub fn new(id: SwapId, terms: &RelayTerms, receiver: Address, created_at: Timestamp) -> Self {
        Self {
            id,
            receiver,
            payee: terms.sender,
            sender_domain: terms.sender_domain,
            token: terms.receiver_token,
            amount: terms.receiver_amount,
            timelock: terms.timelock,
            state: ReceiptState::Pending,
            created_at,
        }
    }

    /// Confirmed flag.
    pub fn confirmed(&self) -> bool {
        self.state == ReceiptState::Confirmed
    }

    /// Refunded flag.
    pub fn refunded(&self) -> bool {
        self.state == ReceiptState::Refunded
    }

    /// Move to `next`, rejecting any exit from a terminal state.
    pub fn transition_to(&mut self, next: ReceiptState) -> Result<(), SwapError> {
        if !self.state.can_transition_to(next) {
            return Err(match self.state {
                ReceiptState::Confirmed => SwapError::AlreadyConfirmed(self.id),
                ReceiptState::Refunded => SwapError::AlreadyRefunded(self.id),
                ReceiptState::Pending => SwapError::NotFound(self.id),
            });
        }
        self.state = next;
        Ok(())
    }
}

impl EscrowRecord for InboundReceipt {
    fn id(&self) -> SwapId {
        self.id
    }

    fn escrow(&self) -> Option<(TokenId, Amount)> {
        (self.state == ReceiptState::Pending).then_some((self.token, self.amount))
    }
}
