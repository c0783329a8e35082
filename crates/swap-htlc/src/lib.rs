//! # Swap HTLC
//!
//! Hashed/timed-lock escrow registries for cross-party, cross-domain atomic
//! swaps.
//!
//! ## Variants
//!
//! | Variant | Registry | Atomicity from |
//! |---------|----------|----------------|
//! | Shared secret | `SwapRegistry` | the preimage revealed by the first withdrawal |
//! | Predefined | `PredefinedSwapRegistry` | both payouts in one ledger batch |
//! | Router relay | `SenderRegistry` + `ReceiverRegistry` | authenticated two-hop handshake |
//!
//! ## Guarantees
//!
//! - A record reaches exactly one terminal state and its escrow is paid out
//!   exactly once.
//! - Every failed operation leaves records and balances untouched.
//! - Redelivered router messages are no-ops, never second payouts.
//! - Timelocks, not message delivery, guarantee liveness: every escrow is
//!   refundable after its expiry.
//!
//! ## Module Structure
//!
//! ```text
//! swap-htlc/
//! ├── domain/       # Records, state machines, guards, errors
//! ├── algorithms/   # Swap id derivation, hash locks
//! ├── ports/        # Ledger, clock, transport, message delivery
//! ├── routing/      # Router enrollment, messages, pure inbound transitions
//! ├── registry/     # The four registries
//! └── adapters/     # In-memory ledger, mailbox, clocks, event recorder
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod routing;

// Re-exports
pub use adapters::{
    Envelope, InMemoryLedger, InMemoryMailbox, MailboxHandle, ManualClock, RecordingEventSink,
    SystemClock,
};
pub use algorithms::{
    derive_predefined_id, derive_relay_id, derive_shared_secret_id, generate_secret,
    hash_lock_for, verify_preimage,
};
pub use domain::{
    AssetError, EscrowRecord, InboundReceipt, OutboundSwapIntent, PredefinedSwapRecord,
    PredefinedTerms, ReceiptState, RelayTerms, SharedSecretTerms, SwapArena, SwapError,
    SwapRecord, SwapSecret, SwapState, TransportError,
};
pub use ports::{
    AssetTransferPort, Clock, CrossDomainTransport, Delivery, LedgerTransfer, MessageHandle,
    MessageRecipient, SwapQuery,
};
pub use registry::{
    PendingDispatch, PredefinedSwapRegistry, ReceiverRegistry, ReceiverRegistryConfig,
    RegistryContext, RouterLink, SenderRegistry, SwapRegistry,
};
pub use routing::{Effect, RouterEnrollment, RouterMessage, Transition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
