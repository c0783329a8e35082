//! # Router Messages
//!
//! The two hops of the router-relay handshake and their wire encoding.
//!
//! ```text
//! receiver domain                         sender domain
//!   start_withdrawal ── ConfirmWithdrawal{id, receiver} ──▶ handle
//!   handle ◀────────── ConfirmCompletion{id} ────────────── (intent withdrawn)
//! ```

use crate::domain::SwapError;
use serde::{Deserialize, Serialize};
use swap_types::{Address, SwapId};

/// Cross-domain message between an intent and its receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterMessage {
    /// First hop: the receiver escrowed the return asset.
    ConfirmWithdrawal {
        /// Intent id.
        id: SwapId,
        /// Who escrowed on the receiver domain and is owed the intent's asset.
        receiver: Address,
    },
    /// Second hop: the intent was withdrawn.
    ConfirmCompletion {
        /// Receipt id.
        id: SwapId,
    },
}

impl RouterMessage {
    /// Swap the message refers to.
    pub fn id(&self) -> SwapId {
        match self {
            Self::ConfirmWithdrawal { id, .. } | Self::ConfirmCompletion { id } => *id,
        }
    }

    /// Stable variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfirmWithdrawal { .. } => "ConfirmWithdrawal",
            Self::ConfirmCompletion { .. } => "ConfirmCompletion",
        }
    }

    /// Wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, SwapError> {
        bincode::serialize(self).map_err(|e| SwapError::MalformedMessage(e.to_string()))
    }

    /// Parse wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, SwapError> {
        bincode::deserialize(bytes).map_err(|e| SwapError::MalformedMessage(e.to_string()))
    }
}
