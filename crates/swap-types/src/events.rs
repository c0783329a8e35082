//! # Emitted Events
//!
//! Events published by the registries for the external indexing
//! collaborator. The registries never read them back.

use crate::entities::{Address, Amount, DomainId, HashLock, Preimage, SwapId, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

/// Which registry flavour produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryKind {
    /// Hash/time-locked registry with a shared secret.
    SharedSecret,
    /// Same-domain registry without a secret; both legs settle in one call.
    Predefined,
    /// Router-relay registry holding outbound intents.
    Sender,
    /// Router-relay registry holding inbound receipts.
    Receiver,
}

impl RegistryKind {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SharedSecret => "shared_secret",
            Self::Predefined => "predefined",
            Self::Sender => "sender",
            Self::Receiver => "receiver",
        }
    }
}

/// A registry state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    /// A record entered `Pending` and its asset is escrowed.
    Created {
        /// Record id.
        id: SwapId,
        /// Escrow depositor.
        sender: Address,
        /// Escrowed token.
        sender_token: TokenId,
        /// Escrowed amount.
        sender_amount: Amount,
        /// Intended counterparty, when known at creation.
        receiver: Option<Address>,
        /// Counterpart domain (router-relay only).
        receiver_domain: Option<DomainId>,
        /// Token expected in return (absent for the shared-secret variant).
        receiver_token: Option<TokenId>,
        /// Amount expected in return (absent for the shared-secret variant).
        receiver_amount: Option<Amount>,
        /// Commitment (shared-secret only).
        hash_lock: Option<HashLock>,
        /// Absolute expiry.
        timelock: Timestamp,
    },

    /// A record was withdrawn by its counterparty.
    Withdrawn {
        /// Record id.
        id: SwapId,
        /// Who received the escrow.
        receiver: Address,
        /// Revealed secret (shared-secret only).
        preimage: Option<Preimage>,
        /// Linked reverse-leg record (predefined only).
        counterparty_record: Option<SwapId>,
    },

    /// A receiver escrowed the return asset and requested confirmation.
    WithdrawalInitiated {
        /// Receipt id (equal to the remote intent id).
        id: SwapId,
        /// Depositor of the return asset.
        receiver: Address,
    },

    /// The remote intent reported withdrawn; the return asset was paid out.
    WithdrawalCompleted {
        /// Receipt id.
        id: SwapId,
    },

    /// The depositor reclaimed the escrow after expiry.
    Refunded {
        /// Record id.
        id: SwapId,
    },
}

impl SwapEvent {
    /// Id of the record the event refers to.
    pub fn swap_id(&self) -> SwapId {
        match self {
            Self::Created { id, .. }
            | Self::Withdrawn { id, .. }
            | Self::WithdrawalInitiated { id, .. }
            | Self::WithdrawalCompleted { id }
            | Self::Refunded { id } => *id,
        }
    }

    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "Created",
            Self::Withdrawn { .. } => "Withdrawn",
            Self::WithdrawalInitiated { .. } => "WithdrawalInitiated",
            Self::WithdrawalCompleted { .. } => "WithdrawalCompleted",
            Self::Refunded { .. } => "Refunded",
        }
    }
}

/// An event tagged with where it was emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Domain hosting the registry.
    pub domain: DomainId,
    /// Address of the emitting registry.
    pub registry: Address,
    /// Registry flavour.
    pub kind: RegistryKind,
    /// The transition.
    pub event: SwapEvent,
}

impl EmittedEvent {
    /// JSON form for log shipping and indexers.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outbound port through which registries emit events.
pub trait EventSink: Send + Sync {
    /// Hand an event to the consumer. Must not fail the caller.
    fn emit(&self, event: EmittedEvent);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: EmittedEvent) {}
}
