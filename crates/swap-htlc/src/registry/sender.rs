//! # Sender Registry
//!
//! Router-relay sender side. Holds outbound intents; the only way to
//! withdraw an intent is an authenticated `ConfirmWithdrawal` from the
//! router enrolled for the intent's receiver domain.

use super::{RegistryContext, RouterLink, SplitEffects};
use crate::algorithms::derive_relay_id;
use crate::domain::{
    guard_future_timelock, guard_pending, guard_positive_amount, guard_refundable, guard_sender,
    guard_unused, OutboundSwapIntent, RelayTerms, SwapArena, SwapError,
};
use crate::ports::{CrossDomainTransport, Delivery, MessageRecipient, SwapQuery};
use crate::routing::{on_confirm_withdrawal, RouterMessage, Transition};
use std::sync::Arc;
use swap_types::{Address, Amount, DomainId, RegistryKind, SwapEvent, SwapId, Timestamp, TokenId};
use tracing::{debug, info, warn};

const KIND: RegistryKind = RegistryKind::Sender;

/// Registry of outbound swap intents.
pub struct SenderRegistry {
    ctx: RegistryContext,
    router: RouterLink,
    intents: SwapArena<OutboundSwapIntent>,
}

impl SenderRegistry {
    /// Empty registry whose enrollment table is administered by `owner`.
    pub fn new(
        ctx: RegistryContext,
        owner: Address,
        transport: Arc<dyn CrossDomainTransport>,
    ) -> Self {
        Self {
            ctx,
            router: RouterLink::new(owner, transport),
            intents: SwapArena::new(),
        }
    }

    /// Address holding the escrow and dispatching messages.
    pub fn address(&self) -> Address {
        self.ctx.address
    }

    /// Hosting domain.
    pub fn domain(&self) -> DomainId {
        self.ctx.domain
    }

    /// Trust `router` as the receiver registry of `domain`. Owner only.
    pub fn enroll_router(
        &mut self,
        caller: Address,
        domain: DomainId,
        router: Address,
    ) -> Result<Option<Address>, SwapError> {
        self.router.enrollment_mut().enroll(caller, domain, router)
    }

    /// Outbound half: enrollment and retained messages.
    pub fn router(&self) -> &RouterLink {
        &self.router
    }

    /// Escrow `sender_amount` and open an intent for the counter-asset on
    /// `receiver_domain`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_contract(
        &mut self,
        caller: Address,
        timelock: Timestamp,
        sender_token: TokenId,
        sender_amount: Amount,
        receiver_domain: DomainId,
        receiver_token: TokenId,
        receiver_amount: Amount,
    ) -> Result<SwapId, SwapError> {
        let now = self.ctx.now();
        guard_future_timelock(timelock, now)?;
        guard_positive_amount(sender_amount)?;
        guard_positive_amount(receiver_amount)?;
        self.router.enrollment().require_router(receiver_domain)?;

        let terms = RelayTerms {
            sender: caller,
            sender_domain: self.ctx.domain,
            sender_token,
            sender_amount,
            receiver_domain,
            receiver_token,
            receiver_amount,
            timelock,
        };
        let id = derive_relay_id(&terms);
        guard_unused(self.intents.contains(&id), id)?;

        self.ctx
            .settle(&[self.ctx.pull(sender_token, caller, sender_amount)])?;
        self.intents
            .insert(OutboundSwapIntent::new(id, &terms, now))?;

        info!(
            swap_id = %id,
            sender = %caller,
            receiver_domain = %receiver_domain,
            "[swap-htlc] Outbound intent created"
        );
        self.ctx.emit(
            KIND,
            SwapEvent::Created {
                id,
                sender: caller,
                sender_token,
                sender_amount,
                receiver: None,
                receiver_domain: Some(receiver_domain),
                receiver_token: Some(receiver_token),
                receiver_amount: Some(receiver_amount),
                hash_lock: None,
                timelock,
            },
        );
        Ok(id)
    }

    /// Return the escrow to the intent's sender after expiry.
    pub fn refund(&mut self, caller: Address, id: SwapId) -> Result<(), SwapError> {
        let now = self.ctx.now();
        let intent = self.intents.require(&id)?;
        guard_sender(intent.sender, caller)?;
        guard_pending(id, intent.state)?;
        guard_refundable(intent.timelock, 0, now)?;

        self.ctx.settle(&[self
            .ctx
            .pay(intent.sender_token, intent.sender, intent.sender_amount)])?;
        if let Some(intent) = self.intents.get_mut(&id) {
            intent.refund()?;
        }

        info!(swap_id = %id, "[swap-htlc] Outbound intent refunded");
        self.ctx.emit(KIND, SwapEvent::Refunded { id });
        Ok(())
    }

    /// Retry confirmations the transport refused. Returns how many went out.
    pub fn redispatch_pending(&mut self) -> usize {
        self.router.redispatch_pending(self.ctx.address)
    }

    /// Intent by id.
    pub fn get(&self, id: &SwapId) -> Option<&OutboundSwapIntent> {
        self.intents.get(id)
    }

    /// Every id, in creation order.
    pub fn ids(&self) -> Vec<SwapId> {
        self.intents.ids()
    }

    /// Escrow currently held for pending intents in `token`.
    pub fn pending_escrow(&self, token: TokenId) -> Amount {
        self.intents.pending_escrow(token)
    }

    fn confirm_withdrawal(
        &mut self,
        origin: DomainId,
        sender: Address,
        id: SwapId,
        receiver: Address,
    ) -> Result<Delivery, SwapError> {
        let intent = self.intents.require(&id)?;
        if intent.receiver_domain != origin {
            warn!(
                swap_id = %id,
                "[swap-htlc] Confirmation from {} for intent bound to {}",
                origin,
                intent.receiver_domain
            );
            return Err(SwapError::UntrustedOrigin {
                domain: origin,
                sender,
            });
        }

        match on_confirm_withdrawal(intent, receiver, self.ctx.now())? {
            Transition::NoOp => {
                warn!(swap_id = %id, "[swap-htlc] Duplicate ConfirmWithdrawal ignored");
                Ok(Delivery::Duplicate)
            }
            Transition::Apply { next, effects } => {
                let split = SplitEffects::from_effects(&self.ctx, effects);
                self.ctx.settle(&split.transfers)?;
                if let Some(intent) = self.intents.get_mut(&id) {
                    *intent = next;
                }
                info!(swap_id = %id, receiver = %receiver, "[swap-htlc] Outbound intent withdrawn");
                for event in split.events {
                    self.ctx.emit(KIND, event);
                }
                for (destination, message) in split.dispatches {
                    self.router.send(self.ctx.address, destination, message);
                }
                Ok(Delivery::Applied)
            }
        }
    }
}

impl MessageRecipient for SenderRegistry {
    fn handle(
        &mut self,
        origin: DomainId,
        sender: Address,
        body: &[u8],
    ) -> Result<Delivery, SwapError> {
        if let Err(err) = self.router.enrollment().verify_origin(origin, sender) {
            warn!("[swap-htlc] Rejected message from {} on {}", sender, origin);
            return Err(err);
        }
        let message = RouterMessage::decode(body)?;
        debug!(swap_id = %message.id(), "[swap-htlc] Sender registry handling {}", message.name());

        match message {
            RouterMessage::ConfirmWithdrawal { id, receiver } => {
                self.confirm_withdrawal(origin, sender, id, receiver)
            }
            RouterMessage::ConfirmCompletion { .. } => {
                Err(SwapError::UnexpectedMessage("ConfirmCompletion"))
            }
        }
    }
}

impl SwapQuery for SenderRegistry {
    type Record = OutboundSwapIntent;

    fn get(&self, id: &SwapId) -> Option<&OutboundSwapIntent> {
        self.intents.get(id)
    }

    fn ids(&self) -> Vec<SwapId> {
        self.intents.ids()
    }
}
