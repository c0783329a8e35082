//! # Shared-Secret Registry
//!
//! Hash/time-locked escrow on one domain. Both legs of a swap lock under the
//! same hash; withdrawing one leg publishes the preimage that opens the
//! other.

use super::RegistryContext;
use crate::algorithms::{derive_shared_secret_id, verify_preimage};
use crate::domain::{
    guard_designated_receiver, guard_future_timelock, guard_not_expired, guard_pending,
    guard_positive_amount, guard_refundable, guard_sender, guard_unused, SharedSecretTerms,
    SwapArena, SwapError, SwapRecord,
};
use crate::ports::SwapQuery;
use swap_types::{
    Address, Amount, HashLock, Preimage, RegistryKind, SwapEvent, SwapId, Timestamp, TokenId,
};
use tracing::{debug, info};

const KIND: RegistryKind = RegistryKind::SharedSecret;

/// Registry of shared-secret swap records.
pub struct SwapRegistry {
    ctx: RegistryContext,
    records: SwapArena<SwapRecord>,
}

impl SwapRegistry {
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

    /// Lock `amount` of `token` from `caller` under `hash_lock` until `timelock`.
    ///
    /// With `receiver` set only that address may withdraw.
    pub fn create(
        &mut self,
        caller: Address,
        receiver: Option<Address>,
        hash_lock: HashLock,
        timelock: Timestamp,
        token: TokenId,
        amount: Amount,
    ) -> Result<SwapId, SwapError> {
        let now = self.ctx.now();
        guard_future_timelock(timelock, now)?;
        guard_positive_amount(amount)?;

        let terms = SharedSecretTerms {
            sender: caller,
            receiver,
            token,
            amount,
            hash_lock,
            timelock,
        };
        let id = derive_shared_secret_id(&terms);
        guard_unused(self.records.contains(&id), id)?;
        debug!(swap_id = %id, "[swap-htlc] Guards passed, escrowing {} of {}", amount, token);

        self.ctx.settle(&[self.ctx.pull(token, caller, amount)])?;
        self.records.insert(SwapRecord::new(id, terms, now))?;

        info!(swap_id = %id, sender = %caller, "[swap-htlc] Shared-secret swap created");
        self.ctx.emit(
            KIND,
            SwapEvent::Created {
                id,
                sender: caller,
                sender_token: token,
                sender_amount: amount,
                receiver,
                receiver_domain: None,
                receiver_token: None,
                receiver_amount: None,
                hash_lock: Some(hash_lock),
                timelock,
            },
        );
        Ok(id)
    }

    /// Reveal `preimage` and take the escrow.
    pub fn withdraw(
        &mut self,
        caller: Address,
        id: SwapId,
        preimage: Preimage,
    ) -> Result<(), SwapError> {
        let now = self.ctx.now();
        let record = self.records.require(&id)?;
        guard_pending(id, record.state)?;
        guard_not_expired(record.timelock, now)?;
        guard_designated_receiver(record.receiver, caller)?;
        if !verify_preimage(&preimage, &record.hash_lock) {
            return Err(SwapError::InvalidPreimage);
        }

        self.ctx
            .settle(&[self.ctx.pay(record.token, caller, record.amount)])?;
        if let Some(record) = self.records.get_mut(&id) {
            record.withdraw(preimage, caller)?;
        }

        info!(swap_id = %id, receiver = %caller, "[swap-htlc] Shared-secret swap withdrawn");
        self.ctx.emit(
            KIND,
            SwapEvent::Withdrawn {
                id,
                receiver: caller,
                preimage: Some(preimage),
                counterparty_record: None,
            },
        );
        Ok(())
    }

    /// Return the escrow to its sender after expiry.
    pub fn refund(&mut self, caller: Address, id: SwapId) -> Result<(), SwapError> {
        let now = self.ctx.now();
        let record = self.records.require(&id)?;
        guard_sender(record.sender, caller)?;
        guard_pending(id, record.state)?;
        guard_refundable(record.timelock, 0, now)?;

        self.ctx
            .settle(&[self.ctx.pay(record.token, record.sender, record.amount)])?;
        if let Some(record) = self.records.get_mut(&id) {
            record.refund()?;
        }

        info!(swap_id = %id, "[swap-htlc] Shared-secret swap refunded");
        self.ctx.emit(KIND, SwapEvent::Refunded { id });
        Ok(())
    }

    /// Record by id.
    pub fn get(&self, id: &SwapId) -> Option<&SwapRecord> {
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

impl SwapQuery for SwapRegistry {
    type Record = SwapRecord;

    fn get(&self, id: &SwapId) -> Option<&SwapRecord> {
        self.records.get(id)
    }

    fn ids(&self) -> Vec<SwapId> {
        self.records.ids()
    }
}
