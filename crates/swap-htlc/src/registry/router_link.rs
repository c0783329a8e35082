//! # Router Link
//!
//! Outbound half of a router-relay registry: the enrollment table, the
//! transport, and the queue of committed messages the transport refused.

use crate::domain::SwapError;
use crate::ports::{CrossDomainTransport, MessageHandle};
use crate::routing::{RouterEnrollment, RouterMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use swap_types::{Address, DomainId};
use tracing::{error, info};

/// A message whose state transition committed but whose dispatch failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDispatch {
    /// Target domain.
    pub destination: DomainId,
    /// Message to send.
    pub message: RouterMessage,
    /// Failed dispatch attempts.
    pub attempts: u32,
}

/// Enrollment plus transport for one registry.
pub struct RouterLink {
    enrollment: RouterEnrollment,
    transport: Arc<dyn CrossDomainTransport>,
    pending: VecDeque<PendingDispatch>,
}

impl RouterLink {
    /// Link with an empty enrollment table owned by `owner`.
    pub fn new(owner: Address, transport: Arc<dyn CrossDomainTransport>) -> Self {
        Self {
            enrollment: RouterEnrollment::new(owner),
            transport,
            pending: VecDeque::new(),
        }
    }

    /// Trust table.
    pub fn enrollment(&self) -> &RouterEnrollment {
        &self.enrollment
    }

    /// Trust table, for enrollment writes.
    pub fn enrollment_mut(&mut self) -> &mut RouterEnrollment {
        &mut self.enrollment
    }

    /// Messages waiting for a retry.
    pub fn pending(&self) -> &VecDeque<PendingDispatch> {
        &self.pending
    }

    /// Send `message` to the router of `destination` from `sender`.
    ///
    /// Never fails the caller: the transition that produced the message has
    /// already committed. A message refused for a transient reason is kept
    /// for [`redispatch_pending`](Self::redispatch_pending); one that can
    /// never be delivered is dropped and left to the timelocks.
    pub fn send(
        &mut self,
        sender: Address,
        destination: DomainId,
        message: RouterMessage,
    ) -> Option<MessageHandle> {
        match self.try_send(sender, destination, &message) {
            Ok(handle) => Some(handle),
            Err(err) if err.is_retryable() => {
                error!(
                    swap_id = %message.id(),
                    destination = %destination,
                    "[swap-htlc] Dispatch of {} failed, retained for retry: {}",
                    message.name(),
                    err
                );
                self.pending.push_back(PendingDispatch {
                    destination,
                    message,
                    attempts: 1,
                });
                None
            }
            Err(err) => {
                error!(
                    swap_id = %message.id(),
                    destination = %destination,
                    "[swap-htlc] Dispatch of {} failed permanently, dropped: {}",
                    message.name(),
                    err
                );
                None
            }
        }
    }

    /// Retry every retained message once. Returns how many were accepted.
    ///
    /// Entries that now fail permanently, for example after the route was
    /// removed, leave the queue.
    pub fn redispatch_pending(&mut self, sender: Address) -> usize {
        let mut sent = 0;
        for _ in 0..self.pending.len() {
            let Some(mut entry) = self.pending.pop_front() else {
                break;
            };
            match self.try_send(sender, entry.destination, &entry.message) {
                Ok(handle) => {
                    info!(
                        swap_id = %entry.message.id(),
                        "[swap-htlc] Redispatched {} as {} after {} attempt(s)",
                        entry.message.name(),
                        handle,
                        entry.attempts
                    );
                    sent += 1;
                }
                Err(err) if err.is_retryable() => {
                    entry.attempts += 1;
                    error!(
                        swap_id = %entry.message.id(),
                        "[swap-htlc] Redispatch attempt {} failed: {}",
                        entry.attempts,
                        err
                    );
                    self.pending.push_back(entry);
                }
                Err(err) => {
                    error!(
                        swap_id = %entry.message.id(),
                        destination = %entry.destination,
                        "[swap-htlc] Redispatch of {} failed permanently, dropped: {}",
                        entry.message.name(),
                        err
                    );
                }
            }
        }
        sent
    }

    fn try_send(
        &self,
        sender: Address,
        destination: DomainId,
        message: &RouterMessage,
    ) -> Result<MessageHandle, SwapError> {
        let recipient = self.enrollment.require_router(destination)?;
        let body = message.encode()?;
        Ok(self
            .transport
            .dispatch(sender, destination, recipient, body)?)
    }
}
