//! # Domain Guards
//!
//! Predicates every registry checks before touching state or assets.
//!
//! A guard returns `Ok(())` or the exact error the operation must fail
//! with. Registries call them in a fixed order so the reported error is
//! deterministic when several guards would fail at once.

use super::errors::SwapError;
use super::value_objects::{ReceiptState, SwapState};
use swap_types::{Address, Amount, SwapId, Timestamp};

/// Guard: record still pending.
pub fn guard_pending(id: SwapId, state: SwapState) -> Result<(), SwapError> {
    match state {
        SwapState::Pending => Ok(()),
        SwapState::Withdrawn => Err(SwapError::AlreadyWithdrawn(id)),
        SwapState::Refunded => Err(SwapError::AlreadyRefunded(id)),
    }
}

/// Guard: receipt still pending.
pub fn guard_receipt_pending(id: SwapId, state: ReceiptState) -> Result<(), SwapError> {
    match state {
        ReceiptState::Pending => Ok(()),
        ReceiptState::Confirmed => Err(SwapError::AlreadyConfirmed(id)),
        ReceiptState::Refunded => Err(SwapError::AlreadyRefunded(id)),
    }
}

/// Guard: expiry strictly in the future at creation.
pub fn guard_future_timelock(timelock: Timestamp, now: Timestamp) -> Result<(), SwapError> {
    if timelock <= now {
        return Err(SwapError::InvalidTimelock { timelock, now });
    }
    Ok(())
}

/// Guard: positive amount.
pub fn guard_positive_amount(amount: Amount) -> Result<(), SwapError> {
    if amount == 0 {
        return Err(SwapError::InvalidAmount);
    }
    Ok(())
}

/// Guard: withdrawal only strictly before expiry.
pub fn guard_not_expired(timelock: Timestamp, now: Timestamp) -> Result<(), SwapError> {
    if now >= timelock {
        return Err(SwapError::TimelockExpired { timelock, now });
    }
    Ok(())
}

/// Guard: refund only at or after `timelock + grace`.
pub fn guard_refundable(
    timelock: Timestamp,
    grace: Timestamp,
    now: Timestamp,
) -> Result<(), SwapError> {
    let unlock = timelock.saturating_add(grace);
    if now < unlock {
        return Err(SwapError::TimelockNotPassed {
            timelock: unlock,
            now,
        });
    }
    Ok(())
}

/// Guard: caller deposited the escrow.
pub fn guard_sender(expected: Address, caller: Address) -> Result<(), SwapError> {
    if expected != caller {
        return Err(SwapError::NotSender { caller });
    }
    Ok(())
}

/// Guard: caller is the designated receiver, when one is set.
pub fn guard_designated_receiver(
    designated: Option<Address>,
    caller: Address,
) -> Result<(), SwapError> {
    match designated {
        Some(receiver) if receiver != caller => Err(SwapError::NotReceiver { caller }),
        _ => Ok(()),
    }
}

/// Guard: no record yet for `id`.
pub fn guard_unused(exists: bool, id: SwapId) -> Result<(), SwapError> {
    if exists {
        return Err(SwapError::DuplicateSwap(id));
    }
    Ok(())
}
