//! # Inbound Ports
//!
//! Entry points the host domain calls into: cross-domain message delivery
//! and the read-only query surface for wallets and indexers.

use crate::domain::SwapError;
use swap_types::{Address, DomainId, SwapId};

/// Outcome of a successful delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The message moved a record to a terminal state.
    Applied,
    /// The record was already terminal; nothing changed.
    Duplicate,
}

impl Delivery {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Duplicate => "duplicate",
        }
    }
}

/// A registry that accepts cross-domain messages.
///
/// Errors are rejections; use [`SwapError::is_origin_problem`] and
/// [`SwapError::is_retryable`] to classify them. Redelivery of an already
/// applied message returns `Ok(Delivery::Duplicate)`.
pub trait MessageRecipient: Send {
    /// Deliver `body` sent by `sender` on `origin`.
    fn handle(
        &mut self,
        origin: DomainId,
        sender: Address,
        body: &[u8],
    ) -> Result<Delivery, SwapError>;
}

/// Read-only query surface of a registry.
pub trait SwapQuery {
    /// Stored record type.
    type Record: Clone;

    /// Full record by id.
    fn get(&self, id: &SwapId) -> Option<&Self::Record>;

    /// All ids, in creation order.
    fn ids(&self) -> Vec<SwapId>;
}
