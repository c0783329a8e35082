//! # Domain Errors
//!
//! Error taxonomy for every registry operation and inbound message.
//!
//! Every guard failure aborts the whole operation with no state change and
//! no asset movement. The inbound handler path additionally needs to tell
//! an origin problem apart from a permanent rejection and from a transient
//! port failure, see [`SwapError::is_origin_problem`] and
//! [`SwapError::is_retryable`].

use swap_types::{Address, Amount, DomainId, SwapId, Timestamp, TokenId};
use thiserror::Error;

/// Failures reported by an [`AssetTransferPort`](crate::ports::AssetTransferPort).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Spender allowance below the requested amount.
    #[error("Insufficient allowance on {token}: owner {owner} approved {available}, need {required}")]
    InsufficientAllowance {
        /// Token contract.
        token: TokenId,
        /// Owner of the funds.
        owner: Address,
        /// Requested amount.
        required: Amount,
        /// Approved amount.
        available: Amount,
    },

    /// Holder balance below the requested amount.
    #[error("Insufficient balance on {token}: holder {holder} has {available}, need {required}")]
    InsufficientBalance {
        /// Token contract.
        token: TokenId,
        /// Holder of the funds.
        holder: Address,
        /// Requested amount.
        required: Amount,
        /// Held amount.
        available: Amount,
    },

    /// The token is not known to the ledger.
    #[error("Unknown token: {0}")]
    UnknownToken(TokenId),

    /// Ledger could not be reached; the call may succeed later.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by a [`CrossDomainTransport`](crate::ports::CrossDomainTransport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport has no route to the destination domain.
    #[error("No route to {0}")]
    NoRoute(DomainId),

    /// Transport refused the message for now.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Swap registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// Zero amount where a positive amount is required.
    #[error("Invalid amount: must be > 0")]
    InvalidAmount,

    /// Proposed expiry is not strictly in the future.
    #[error("Invalid timelock {timelock}: must be after {now}")]
    InvalidTimelock {
        /// Proposed expiry.
        timelock: Timestamp,
        /// Current time.
        now: Timestamp,
    },

    /// A record already exists for the derived id.
    #[error("Swap already exists: {0}")]
    DuplicateSwap(SwapId),

    /// No record for the id.
    #[error("Swap not found: {0}")]
    NotFound(SwapId),

    /// Record already withdrawn.
    #[error("Swap already withdrawn: {0}")]
    AlreadyWithdrawn(SwapId),

    /// Record already refunded.
    #[error("Swap already refunded: {0}")]
    AlreadyRefunded(SwapId),

    /// Receipt already confirmed.
    #[error("Receipt already confirmed: {0}")]
    AlreadyConfirmed(SwapId),

    /// Refund attempted before expiry.
    #[error("Timelock not passed: expires at {timelock}, now {now}")]
    TimelockNotPassed {
        /// Record expiry (including any refund grace).
        timelock: Timestamp,
        /// Current time.
        now: Timestamp,
    },

    /// Withdrawal attempted at or after expiry.
    #[error("Timelock expired at {timelock}, now {now}")]
    TimelockExpired {
        /// Record expiry.
        timelock: Timestamp,
        /// Current time.
        now: Timestamp,
    },

    /// Secret does not hash to the committed lock.
    #[error("Invalid preimage")]
    InvalidPreimage,

    /// Caller is not the escrow depositor.
    #[error("Not sender: {caller}")]
    NotSender {
        /// Rejected caller.
        caller: Address,
    },

    /// Caller is not the designated receiver.
    #[error("Not receiver: {caller}")]
    NotReceiver {
        /// Rejected caller.
        caller: Address,
    },

    /// Caller is not the registry owner.
    #[error("Not owner: {caller}")]
    NotOwner {
        /// Rejected caller.
        caller: Address,
    },

    /// Allowance check failed before any state change.
    #[error("Insufficient allowance on {token}: need {required}, approved {available}")]
    InsufficientAllowance {
        /// Token contract.
        token: TokenId,
        /// Owner of the funds.
        owner: Address,
        /// Requested amount.
        required: Amount,
        /// Approved amount.
        available: Amount,
    },

    /// Balance check failed before any state change.
    #[error("Insufficient balance on {token}: need {required}, have {available}")]
    InsufficientBalance {
        /// Token contract.
        token: TokenId,
        /// Holder of the funds.
        holder: Address,
        /// Requested amount.
        required: Amount,
        /// Held amount.
        available: Amount,
    },

    /// Inbound message origin does not match the enrolled router.
    #[error("Untrusted origin: {sender} on {domain}")]
    UntrustedOrigin {
        /// Declared origin domain.
        domain: DomainId,
        /// Declared origin sender.
        sender: Address,
    },

    /// No router enrolled for the destination domain.
    #[error("No router enrolled for {0}")]
    NoRouterEnrolled(DomainId),

    /// Inbound payload could not be decoded.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Inbound message variant is not handled by this registry.
    #[error("Unexpected message: {0}")]
    UnexpectedMessage(&'static str),

    /// The ledger does not know the token.
    #[error("Unknown token: {0}")]
    UnknownToken(TokenId),

    /// Ledger could not be reached.
    #[error("Asset transfer failed: {0}")]
    AssetTransfer(String),

    /// Transport failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SwapError {
    /// True for rejections caused by a record already in a terminal state.
    pub fn is_already_terminal(&self) -> bool {
        matches!(
            self,
            Self::AlreadyWithdrawn(_) | Self::AlreadyRefunded(_) | Self::AlreadyConfirmed(_)
        )
    }

    /// True when the message origin must be investigated.
    pub fn is_origin_problem(&self) -> bool {
        matches!(self, Self::UntrustedOrigin { .. })
    }

    /// True when the same call may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AssetTransfer(_) | Self::Transport(TransportError::Unavailable(_))
        )
    }
}

impl From<AssetError> for SwapError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::InsufficientAllowance {
                token,
                owner,
                required,
                available,
            } => Self::InsufficientAllowance {
                token,
                owner,
                required,
                available,
            },
            AssetError::InsufficientBalance {
                token,
                holder,
                required,
                available,
            } => Self::InsufficientBalance {
                token,
                holder,
                required,
                available,
            },
            AssetError::UnknownToken(token) => Self::UnknownToken(token),
            AssetError::Unavailable(reason) => Self::AssetTransfer(reason),
        }
    }
}
