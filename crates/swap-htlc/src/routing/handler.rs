//! # Inbound Transitions
//!
//! Pure functions from (record, message, now) to the record's next state
//! plus the side effects the registry must apply. An already-terminal record
//! always yields [`Transition::NoOp`] so redelivery never pays twice.

use super::messages::RouterMessage;
use crate::domain::{guard_not_expired, InboundReceipt, OutboundSwapIntent, ReceiptState, SwapError};
use swap_types::{Address, Amount, DomainId, SwapEvent, Timestamp, TokenId};

/// Side effect of an applied transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Pay escrow out of the registry.
    Payout {
        /// Token paid.
        token: TokenId,
        /// Beneficiary.
        to: Address,
        /// Amount paid.
        amount: Amount,
    },
    /// Publish an event.
    Emit(SwapEvent),
    /// Send a message to the router of `destination`.
    Dispatch {
        /// Target domain.
        destination: DomainId,
        /// Message to send.
        message: RouterMessage,
    },
}

/// Result of evaluating a message against a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition<R> {
    /// Replace the record with `next` and apply `effects` in order.
    Apply {
        /// Record after the transition.
        next: R,
        /// Effects to apply.
        effects: Vec<Effect>,
    },
    /// Record already terminal; nothing to do.
    NoOp,
}

/// Sender side: the receiver escrowed on its domain and claims the intent.
pub fn on_confirm_withdrawal(
    intent: &OutboundSwapIntent,
    receiver: Address,
    now: Timestamp,
) -> Result<Transition<OutboundSwapIntent>, SwapError> {
    if intent.state.is_terminal() {
        return Ok(Transition::NoOp);
    }
    guard_not_expired(intent.timelock, now)?;

    let mut next = intent.clone();
    next.withdraw(receiver)?;

    Ok(Transition::Apply {
        next,
        effects: vec![
            Effect::Payout {
                token: intent.sender_token,
                to: receiver,
                amount: intent.sender_amount,
            },
            Effect::Emit(SwapEvent::Withdrawn {
                id: intent.id,
                receiver,
                preimage: None,
                counterparty_record: None,
            }),
            Effect::Dispatch {
                destination: intent.receiver_domain,
                message: RouterMessage::ConfirmCompletion { id: intent.id },
            },
        ],
    })
}

/// Receiver side: the intent was withdrawn, release the return asset.
///
/// Applies after the receipt's timelock as long as it was not refunded.
pub fn on_confirm_completion(
    receipt: &InboundReceipt,
) -> Result<Transition<InboundReceipt>, SwapError> {
    if receipt.state.is_terminal() {
        return Ok(Transition::NoOp);
    }

    let mut next = receipt.clone();
    next.transition_to(ReceiptState::Confirmed)?;

    Ok(Transition::Apply {
        next,
        effects: vec![
            Effect::Payout {
                token: receipt.token,
                to: receipt.payee,
                amount: receipt.amount,
            },
            Effect::Emit(SwapEvent::WithdrawalCompleted { id: receipt.id }),
        ],
    })
}
