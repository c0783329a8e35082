//! # Registries
//!
//! One registry per variant. Each owns an arena of records on a single
//! domain and holds its escrow at its own ledger address.
//!
//! | Registry | Records | Settles by |
//! |----------|---------|------------|
//! | [`SwapRegistry`] | `SwapRecord` | revealing the secret |
//! | [`PredefinedSwapRegistry`] | `PredefinedSwapRecord` | counterparty paying in the same call |
//! | [`SenderRegistry`] | `OutboundSwapIntent` | authenticated `ConfirmWithdrawal` |
//! | [`ReceiverRegistry`] | `InboundReceipt` | authenticated `ConfirmCompletion` |

pub mod predefined;
pub mod receiver;
pub mod router_link;
pub mod sender;
pub mod shared_secret;

pub use predefined::PredefinedSwapRegistry;
pub use receiver::{ReceiverRegistry, ReceiverRegistryConfig};
pub use router_link::{PendingDispatch, RouterLink};
pub use sender::SenderRegistry;
pub use shared_secret::SwapRegistry;

use crate::domain::SwapError;
use crate::ports::{AssetTransferPort, Clock, LedgerTransfer};
use crate::routing::{Effect, RouterMessage};
use std::sync::Arc;
use swap_types::{
    Address, Amount, DomainId, EmittedEvent, EventSink, NullEventSink, RegistryKind, SwapEvent,
    Timestamp, TokenId,
};

/// What a registry needs from the domain hosting it.
#[derive(Clone)]
pub struct RegistryContext {
    /// Hosting domain.
    pub domain: DomainId,
    /// Registry address; escrow is held here.
    pub address: Address,
    /// Token ledger of the domain.
    pub ledger: Arc<dyn AssetTransferPort>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Event consumer.
    pub events: Arc<dyn EventSink>,
}

impl RegistryContext {
    /// Context with events discarded.
    pub fn new(
        domain: DomainId,
        address: Address,
        ledger: Arc<dyn AssetTransferPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            domain,
            address,
            ledger,
            clock,
            events: Arc::new(NullEventSink),
        }
    }

    /// Route events to `events`.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub(crate) fn emit(&self, kind: RegistryKind, event: SwapEvent) {
        self.events.emit(EmittedEvent {
            domain: self.domain,
            registry: self.address,
            kind,
            event,
        });
    }

    /// Escrow leg: pull from `owner` into the registry.
    pub(crate) fn pull(&self, token: TokenId, owner: Address, amount: Amount) -> LedgerTransfer {
        LedgerTransfer::TransferFrom {
            token,
            spender: self.address,
            owner,
            to: self.address,
            amount,
        }
    }

    /// Payout leg: pay from the registry to `to`.
    pub(crate) fn pay(&self, token: TokenId, to: Address, amount: Amount) -> LedgerTransfer {
        LedgerTransfer::Transfer {
            token,
            from: self.address,
            to,
            amount,
        }
    }

    /// Execute all legs or none.
    pub(crate) fn settle(&self, batch: &[LedgerTransfer]) -> Result<(), SwapError> {
        self.ledger.execute(batch).map_err(SwapError::from)
    }
}

/// Effects of an applied inbound transition, grouped by when they run.
#[derive(Default)]
pub(crate) struct SplitEffects {
    pub transfers: Vec<LedgerTransfer>,
    pub events: Vec<SwapEvent>,
    pub dispatches: Vec<(DomainId, RouterMessage)>,
}

impl SplitEffects {
    pub(crate) fn from_effects(ctx: &RegistryContext, effects: Vec<Effect>) -> Self {
        let mut split = Self::default();
        for effect in effects {
            match effect {
                Effect::Payout { token, to, amount } => {
                    split.transfers.push(ctx.pay(token, to, amount))
                }
                Effect::Emit(event) => split.events.push(event),
                Effect::Dispatch {
                    destination,
                    message,
                } => split.dispatches.push((destination, message)),
            }
        }
        split
    }
}
