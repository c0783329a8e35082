//! # Outbound Ports
//!
//! What a registry needs from its host domain: a token ledger, a clock and,
//! for the router-relay variant, a cross-domain transport.

use crate::domain::{AssetError, TransportError};
use serde::{Deserialize, Serialize};
use std::fmt;
use swap_types::{Address, Amount, DomainId, Timestamp, TokenId};
use uuid::Uuid;

/// One leg of a ledger batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerTransfer {
    /// Move funds held by `from`.
    Transfer {
        /// Token contract.
        token: TokenId,
        /// Current holder.
        from: Address,
        /// Beneficiary.
        to: Address,
        /// Amount moved.
        amount: Amount,
    },
    /// Pull funds from `owner` against `spender`'s allowance.
    TransferFrom {
        /// Token contract.
        token: TokenId,
        /// Party whose allowance is consumed.
        spender: Address,
        /// Current holder.
        owner: Address,
        /// Beneficiary.
        to: Address,
        /// Amount moved.
        amount: Amount,
    },
}

/// Fungible token ledger of one domain.
///
/// Every call is atomic: a failed transfer moves nothing.
pub trait AssetTransferPort: Send + Sync {
    /// Balance of `holder`.
    fn balance_of(&self, token: TokenId, holder: Address) -> Result<Amount, AssetError>;

    /// Amount `spender` may pull from `owner`.
    fn allowance(&self, token: TokenId, owner: Address, spender: Address)
        -> Result<Amount, AssetError>;

    /// Move `amount` held by `from` to `to`.
    fn transfer(
        &self,
        token: TokenId,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError>;

    /// Pull `amount` from `owner` to `to` using `spender`'s allowance.
    ///
    /// Allowance is checked before balance.
    fn transfer_from(
        &self,
        token: TokenId,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError>;

    /// Apply every transfer or none of them.
    fn execute(&self, batch: &[LedgerTransfer]) -> Result<(), AssetError>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Receipt for an accepted dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub Uuid);

impl MessageHandle {
    /// Fresh random handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageHandle({})", self.0)
    }
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fire-and-forget message transport between domains.
///
/// Acceptance says nothing about delivery: a message may arrive late, more
/// than once, or never.
pub trait CrossDomainTransport: Send + Sync {
    /// Queue `body` for `recipient` on `destination`, declaring `sender` as
    /// the origin address on the local domain.
    fn dispatch(
        &self,
        sender: Address,
        destination: DomainId,
        recipient: Address,
        body: Vec<u8>,
    ) -> Result<MessageHandle, TransportError>;
}
