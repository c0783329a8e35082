//! # Predefined Swap Registry
//!
//! Secret-less variant for swaps that settle inside one domain. The
//! counterparty withdraws by paying the reciprocal asset in the same call;
//! both payouts and the reverse-leg record land atomically.

use super::RegistryContext;
use crate::algorithms::derive_predefined_id;
use crate::domain::{
    guard_future_timelock, guard_not_expired, guard_pending, guard_positive_amount,
    guard_refundable, guard_sender, guard_unused, PredefinedSwapRecord, PredefinedTerms,
    SwapArena, SwapError,
};
use crate::ports::SwapQuery;
use swap_types::{Address, Amount, RegistryKind, SwapEvent, SwapId, Timestamp, TokenId};
use tracing::{debug, info};

const KIND: RegistryKind = RegistryKind::Predefined;

/// Registry of predefined swap records.
pub struct PredefinedSwapRegistry {
    ctx: RegistryContext,
    records: SwapArena<PredefinedSwapRecord>,
}

impl PredefinedSwapRegistry {
    /// Empty registry.
    pub fn new(ctx: RegistryContext) -> Self {
        Self {
            ctx,
            records: SwapArena::new(),
        }
    }

    /// Address holding the escrow.
    pub fn address(&self) -> Address {
        self.ctx.address
    }

    /// Escrow `sender_amount` of `sender_token`, asking for
    /// `receiver_amount` of `receiver_token` in return.
    pub fn create(
        &mut self,
        caller: Address,
        timelock: Timestamp,
        sender_token: TokenId,
        sender_amount: Amount,
        receiver_token: TokenId,
        receiver_amount: Amount,
    ) -> Result<SwapId, SwapError> {
        let now = self.ctx.now();
        guard_future_timelock(timelock, now)?;
        guard_positive_amount(sender_amount)?;
        guard_positive_amount(receiver_amount)?;

        let terms = PredefinedTerms {
            sender: caller,
            sender_token,
            sender_amount,
            receiver_token,
            receiver_amount,
            timelock,
        };
        let id = derive_predefined_id(&terms);
        guard_unused(self.records.contains(&id), id)?;

        self.ctx
            .settle(&[self.ctx.pull(sender_token, caller, sender_amount)])?;
        self.records
            .insert(PredefinedSwapRecord::new(id, terms, now))?;

        info!(swap_id = %id, sender = %caller, "[swap-htlc] Predefined swap created");
        self.ctx.emit(
            KIND,
            SwapEvent::Created {
                id,
                sender: caller,
                sender_token,
                sender_amount,
                receiver: None,
                receiver_domain: None,
                receiver_token: Some(receiver_token),
                receiver_amount: Some(receiver_amount),
                hash_lock: None,
                timelock,
            },
        );
        Ok(id)
    }

    /// Pay the requested asset and take the escrow. Returns the id of the
    /// reverse-leg record.
    ///
    /// If the caller cannot pay, nothing moves and the record stays pending.
    pub fn withdraw(&mut self, caller: Address, id: SwapId) -> Result<SwapId, SwapError> {
        let now = self.ctx.now();
        let record = self.records.require(&id)?;
        guard_pending(id, record.state)?;
        guard_not_expired(record.timelock, now)?;

        let mirror_terms = record.terms().reversed(caller);
        let mirror_id = derive_predefined_id(&mirror_terms);
        guard_unused(self.records.contains(&mirror_id), mirror_id)?;
        debug!(swap_id = %id, counterparty = %mirror_id, "[swap-htlc] Guards passed, settling both legs");

        self.ctx.settle(&[
            self.ctx
                .pull(record.receiver_token, caller, record.receiver_amount),
            self.ctx
                .pay(record.receiver_token, record.sender, record.receiver_amount),
            self.ctx.pay(record.sender_token, caller, record.sender_amount),
        ])?;

        let mirror = PredefinedSwapRecord::settled_mirror(mirror_id, mirror_terms, record, now);
        if let Some(record) = self.records.get_mut(&id) {
            record.withdraw(caller, mirror_id)?;
        }
        self.records.insert(mirror)?;

        info!(
            swap_id = %id,
            counterparty = %mirror_id,
            receiver = %caller,
            "[swap-htlc] Predefined swap withdrawn"
        );
        self.ctx.emit(
            KIND,
            SwapEvent::Withdrawn {
                id,
                receiver: caller,
                preimage: None,
                counterparty_record: Some(mirror_id),
            },
        );
        Ok(mirror_id)
    }

    /// Return the escrow to its sender after expiry.
    pub fn refund(&mut self, caller: Address, id: SwapId) -> Result<(), SwapError> {
        let now = self.ctx.now();
        let record = self.records.require(&id)?;
        guard_sender(record.sender, caller)?;
        guard_pending(id, record.state)?;
        guard_refundable(record.timelock, 0, now)?;

        self.ctx.settle(&[self
            .ctx
            .pay(record.sender_token, record.sender, record.sender_amount)])?;
        if let Some(record) = self.records.get_mut(&id) {
            record.refund()?;
        }

        info!(swap_id = %id, "[swap-htlc] Predefined swap refunded");
        self.ctx.emit(KIND, SwapEvent::Refunded { id });
        Ok(())
    }

    /// Record by id.
    pub fn get(&self, id: &SwapId) -> Option<&PredefinedSwapRecord> {
        self.records.get(id)
    }

    /// Every id, in creation order.
    pub fn ids(&self) -> Vec<SwapId> {
        self.records.ids()
    }

    /// Escrow currently held for pending records in `token`.
    pub fn pending_escrow(&self, token: TokenId) -> Amount {
        self.records.pending_escrow(token)
    }
}

impl SwapQuery for PredefinedSwapRegistry {
    type Record = PredefinedSwapRecord;

    fn get(&self, id: &SwapId) -> Option<&PredefinedSwapRecord> {
        self.records.get(id)
    }

    fn ids(&self) -> Vec<SwapId> {
        self.records.ids()
    }
}
