//! In-Memory Mailbox Adapter
//!
//! A message hub shared by several simulated domains. Each domain gets a
//! [`MailboxHandle`] implementing `CrossDomainTransport`; a relayer drains
//! the per-destination queues and delivers envelopes to recipients.

use crate::domain::TransportError;
use crate::ports::{CrossDomainTransport, MessageHandle};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use swap_types::{Address, DomainId};
use tracing::{debug, warn};

/// A dispatched message awaiting delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Dispatch receipt.
    pub handle: MessageHandle,
    /// Domain the message was sent from.
    pub origin: DomainId,
    /// Sending address on the origin domain.
    pub sender: Address,
    /// Target domain.
    pub destination: DomainId,
    /// Target address on the destination domain.
    pub recipient: Address,
    /// Opaque payload.
    pub body: Vec<u8>,
    /// Failed delivery attempts so far.
    pub attempts: u32,
}

#[derive(Default)]
struct MailboxState {
    queues: HashMap<DomainId, VecDeque<Envelope>>,
    offline: HashSet<DomainId>,
    dispatched: u64,
}

/// Hub connecting simulated domains.
#[derive(Clone, Default)]
pub struct InMemoryMailbox {
    state: Arc<Mutex<MailboxState>>,
}

impl InMemoryMailbox {
    /// Hub with no domains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a route to `domain`.
    pub fn register_domain(&self, domain: DomainId) {
        self.state.lock().queues.entry(domain).or_default();
    }

    /// Transport for registries hosted on `origin`.
    pub fn handle(&self, origin: DomainId) -> MailboxHandle {
        self.register_domain(origin);
        MailboxHandle {
            origin,
            mailbox: self.clone(),
        }
    }

    /// Refuse dispatches from `domain` while offline.
    pub fn set_offline(&self, domain: DomainId, offline: bool) {
        let mut state = self.state.lock();
        if offline {
            state.offline.insert(domain);
        } else {
            state.offline.remove(&domain);
        }
    }

    /// Take up to `max` queued envelopes for `destination`.
    pub fn drain(&self, destination: DomainId, max: usize) -> Vec<Envelope> {
        let mut state = self.state.lock();
        match state.queues.get_mut(&destination) {
            Some(queue) => {
                let take = max.min(queue.len());
                queue.drain(..take).collect()
            }
            None => Vec::new(),
        }
    }

    /// Put an envelope back at the end of its destination queue.
    pub fn requeue(&self, envelope: Envelope) {
        self.state
            .lock()
            .queues
            .entry(envelope.destination)
            .or_default()
            .push_back(envelope);
    }

    /// Queued envelopes for `destination`.
    pub fn pending(&self, destination: DomainId) -> usize {
        self.state
            .lock()
            .queues
            .get(&destination)
            .map_or(0, VecDeque::len)
    }

    /// Copy of the queue for `destination`, oldest first.
    pub fn peek(&self, destination: DomainId) -> Vec<Envelope> {
        self.state
            .lock()
            .queues
            .get(&destination)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Domains with an open route.
    pub fn domains(&self) -> Vec<DomainId> {
        let mut domains: Vec<_> = self.state.lock().queues.keys().copied().collect();
        domains.sort();
        domains
    }

    /// Messages accepted since creation.
    pub fn dispatched_count(&self) -> u64 {
        self.state.lock().dispatched
    }

    fn enqueue(
        &self,
        origin: DomainId,
        sender: Address,
        destination: DomainId,
        recipient: Address,
        body: Vec<u8>,
    ) -> Result<MessageHandle, TransportError> {
        let mut state = self.state.lock();
        if state.offline.contains(&origin) {
            warn!("[swap-htlc] Mailbox on {} offline, refusing dispatch", origin);
            return Err(TransportError::Unavailable(format!("{} offline", origin)));
        }
        let queue = state
            .queues
            .get_mut(&destination)
            .ok_or(TransportError::NoRoute(destination))?;

        let handle = MessageHandle::new();
        queue.push_back(Envelope {
            handle,
            origin,
            sender,
            destination,
            recipient,
            body,
            attempts: 0,
        });
        state.dispatched += 1;
        debug!(
            "[swap-htlc] Dispatched {} {} -> {} ({})",
            handle, origin, destination, recipient
        );
        Ok(handle)
    }
}

/// Per-domain view of the hub.
#[derive(Clone)]
pub struct MailboxHandle {
    origin: DomainId,
    mailbox: InMemoryMailbox,
}

impl MailboxHandle {
    /// Domain this handle dispatches from.
    pub fn origin(&self) -> DomainId {
        self.origin
    }
}

impl CrossDomainTransport for MailboxHandle {
    fn dispatch(
        &self,
        sender: Address,
        destination: DomainId,
        recipient: Address,
        body: Vec<u8>,
    ) -> Result<MessageHandle, TransportError> {
        self.mailbox
            .enqueue(self.origin, sender, destination, recipient, body)
    }
}
