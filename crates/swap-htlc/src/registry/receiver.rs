//! # Receiver Registry
//!
//! Router-relay receiver side. A receiver escrows the return asset against
//! a remote intent and asks the sender domain to release it; the escrow is
//! paid to the intent's owner once the sender domain confirms completion.
//!
//! Between `start_withdrawal` and the completion message the remote intent
//! may already be withdrawn while the receipt is still pending. That window
//! is expected and bounded by message latency.

use super::{RegistryContext, RouterLink, SplitEffects};
use crate::algorithms::derive_relay_id;
use crate::domain::{
    guard_not_expired, guard_positive_amount, guard_receipt_pending, guard_refundable,
    guard_sender, guard_unused, InboundReceipt, ReceiptState, RelayTerms, SwapArena, SwapError,
};
use crate::ports::{CrossDomainTransport, Delivery, MessageRecipient, SwapQuery};
use crate::routing::{on_confirm_completion, RouterMessage, Transition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swap_types::{Address, Amount, DomainId, RegistryKind, SwapEvent, SwapId, Timestamp, TokenId};
use tracing::{debug, info, warn};

const KIND: RegistryKind = RegistryKind::Receiver;

/// Receiver registry settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverRegistryConfig {
    /// Extra seconds after the timelock before a receipt may be refunded.
    pub refund_grace_secs: u64,
}

/// Registry of inbound receipts.
pub struct ReceiverRegistry {
    ctx: RegistryContext,
    router: RouterLink,
    receipts: SwapArena<InboundReceipt>,
    config: ReceiverRegistryConfig,
}

impl ReceiverRegistry {
    /// Empty registry whose enrollment table is administered by `owner`.
    pub fn new(
        ctx: RegistryContext,
        owner: Address,
        transport: Arc<dyn CrossDomainTransport>,
    ) -> Self {
        Self::with_config(ctx, owner, transport, ReceiverRegistryConfig::default())
    }

    /// Empty registry with explicit settings.
    pub fn with_config(
        ctx: RegistryContext,
        owner: Address,
        transport: Arc<dyn CrossDomainTransport>,
        config: ReceiverRegistryConfig,
    ) -> Self {
        Self {
            ctx,
            router: RouterLink::new(owner, transport),
            receipts: SwapArena::new(),
            config,
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

    /// Trust `router` as the sender registry of `domain`. Owner only.
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

    /// Escrow the return asset against the intent described by the
    /// arguments and request its release.
    ///
    /// The arguments must reproduce the intent's parameters exactly; any
    /// mismatch derives an id no intent has and the confirmation is
    /// rejected on the sender domain.
    #[allow(clippy::too_many_arguments)]
    pub fn start_withdrawal(
        &mut self,
        caller: Address,
        timelock: Timestamp,
        sender: Address,
        sender_domain: DomainId,
        sender_token: TokenId,
        sender_amount: Amount,
        receiver_token: TokenId,
        receiver_amount: Amount,
    ) -> Result<SwapId, SwapError> {
        let now = self.ctx.now();
        guard_not_expired(timelock, now)?;
        guard_positive_amount(sender_amount)?;
        guard_positive_amount(receiver_amount)?;
        self.router.enrollment().require_router(sender_domain)?;

        let terms = RelayTerms {
            sender,
            sender_domain,
            sender_token,
            sender_amount,
            receiver_domain: self.ctx.domain,
            receiver_token,
            receiver_amount,
            timelock,
        };
        let id = derive_relay_id(&terms);
        guard_unused(self.receipts.contains(&id), id)?;

        self.ctx
            .settle(&[self.ctx.pull(receiver_token, caller, receiver_amount)])?;
        self.receipts
            .insert(InboundReceipt::new(id, &terms, caller, now))?;

        info!(
            swap_id = %id,
            receiver = %caller,
            sender_domain = %sender_domain,
            "[swap-htlc] Withdrawal initiated"
        );
        self.ctx.emit(
            KIND,
            SwapEvent::WithdrawalInitiated {
                id,
                receiver: caller,
            },
        );
        self.router.send(
            self.ctx.address,
            sender_domain,
            RouterMessage::ConfirmWithdrawal {
                id,
                receiver: caller,
            },
        );
        Ok(id)
    }

    /// Return the escrow to the receiver once the timelock (plus grace) has
    /// passed without a completion.
    pub fn refund(&mut self, caller: Address, id: SwapId) -> Result<(), SwapError> {
        let now = self.ctx.now();
        let receipt = self.receipts.require(&id)?;
        guard_sender(receipt.receiver, caller)?;
        guard_receipt_pending(id, receipt.state)?;
        guard_refundable(receipt.timelock, self.config.refund_grace_secs, now)?;

        self.ctx
            .settle(&[self.ctx.pay(receipt.token, receipt.receiver, receipt.amount)])?;
        if let Some(receipt) = self.receipts.get_mut(&id) {
            receipt.transition_to(ReceiptState::Refunded)?;
        }

        info!(swap_id = %id, "[swap-htlc] Receipt refunded");
        self.ctx.emit(KIND, SwapEvent::Refunded { id });
        Ok(())
    }

    /// Retry withdrawal requests the transport refused.
    pub fn redispatch_pending(&mut self) -> usize {
        self.router.redispatch_pending(self.ctx.address)
    }

    /// Receipt by id.
    pub fn get(&self, id: &SwapId) -> Option<&InboundReceipt> {
        self.receipts.get(id)
    }

    /// Every id, in creation order.
    pub fn ids(&self) -> Vec<SwapId> {
        self.receipts.ids()
    }

    /// Escrow currently held for pending receipts in `token`.
    pub fn pending_escrow(&self, token: TokenId) -> Amount {
        self.receipts.pending_escrow(token)
    }

    fn confirm_completion(
        &mut self,
        origin: DomainId,
        sender: Address,
        id: SwapId,
    ) -> Result<Delivery, SwapError> {
        let receipt = self.receipts.require(&id)?;
        if receipt.sender_domain != origin {
            warn!(
                swap_id = %id,
                "[swap-htlc] Completion from {} for receipt bound to {}",
                origin,
                receipt.sender_domain
            );
            return Err(SwapError::UntrustedOrigin {
                domain: origin,
                sender,
            });
        }

        match on_confirm_completion(receipt)? {
            Transition::NoOp => {
                warn!(swap_id = %id, "[swap-htlc] Duplicate ConfirmCompletion ignored");
                Ok(Delivery::Duplicate)
            }
            Transition::Apply { next, effects } => {
                let split = SplitEffects::from_effects(&self.ctx, effects);
                self.ctx.settle(&split.transfers)?;
                if let Some(receipt) = self.receipts.get_mut(&id) {
                    *receipt = next;
                }
                info!(swap_id = %id, "[swap-htlc] Withdrawal completed");
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

impl MessageRecipient for ReceiverRegistry {
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
        debug!(swap_id = %message.id(), "[swap-htlc] Receiver registry handling {}", message.name());

        match message {
            RouterMessage::ConfirmCompletion { id } => self.confirm_completion(origin, sender, id),
            RouterMessage::ConfirmWithdrawal { .. } => {
                Err(SwapError::UnexpectedMessage("ConfirmWithdrawal"))
            }
        }
    }
}

impl SwapQuery for ReceiverRegistry {
    type Record = InboundReceipt;

    fn get(&self, id: &SwapId) -> Option<&InboundReceipt> {
        self.receipts.get(id)
    }

    fn ids(&self) -> Vec<SwapId> {
        self.receipts.ids()
    }
}
