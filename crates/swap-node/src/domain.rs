//! # Domain Node
//!
//! One execution domain: its token ledger and the four registries it
//! hosts. Inbound envelopes are routed to the registry they address.

use std::sync::Arc;

use swap_htlc::{
    Clock, Delivery, Envelope, InMemoryLedger, InMemoryMailbox, MessageRecipient,
    PredefinedSwapRegistry, ReceiverRegistry, ReceiverRegistryConfig, RegistryContext,
    SenderRegistry, SwapError, SwapRegistry,
};
use swap_types::{Address, DomainId, EventSink};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, DomainConfig};

/// Failures routing an envelope to a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// No node hosts the destination domain.
    #[error("Unknown domain: {0}")]
    UnknownDomain(DomainId),

    /// Destination address is not a message-receiving registry.
    #[error("No recipient {recipient} on {domain}")]
    UnknownRecipient {
        /// Destination domain.
        domain: DomainId,
        /// Addressed registry.
        recipient: Address,
    },

    /// The registry rejected the message.
    #[error(transparent)]
    Swap(#[from] SwapError),

    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NodeError {
    /// True when redelivery may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NodeError::Swap(e) if e.is_retryable())
    }

    /// True when the sender must be investigated.
    pub fn is_origin_problem(&self) -> bool {
        matches!(self, NodeError::Swap(e) if e.is_origin_problem())
    }
}

/// An execution domain and its registries.
pub struct DomainNode {
    config: DomainConfig,
    ledger: Arc<InMemoryLedger>,
    shared_secret: SwapRegistry,
    predefined: PredefinedSwapRegistry,
    sender: SenderRegistry,
    receiver: ReceiverRegistry,
}

impl DomainNode {
    /// Build the registries of `config`, dispatching through `mailbox`.
    pub fn new(
        config: DomainConfig,
        receiver_config: ReceiverRegistryConfig,
        mailbox: &InMemoryMailbox,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let transport = Arc::new(mailbox.handle(config.domain));
        let context = |address: Address| {
            RegistryContext::new(config.domain, address, ledger.clone(), clock.clone())
                .with_events(events.clone())
        };

        let shared_secret = SwapRegistry::new(context(config.shared_secret_registry));
        let predefined = PredefinedSwapRegistry::new(context(config.predefined_registry));
        let sender = SenderRegistry::new(
            context(config.sender_registry),
            config.owner,
            transport.clone(),
        );
        let receiver = ReceiverRegistry::with_config(
            context(config.receiver_registry),
            config.owner,
            transport,
            receiver_config,
        );

        info!(
            "[swap-node] Domain {} ({}) ready: sender={} receiver={}",
            config.domain, config.name, config.sender_registry, config.receiver_registry
        );

        Self {
            config,
            ledger,
            shared_secret,
            predefined,
            sender,
            receiver,
        }
    }

    /// Domain identifier.
    pub fn domain(&self) -> DomainId {
        self.config.domain
    }

    /// Static configuration.
    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Token ledger.
    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    /// Shared-secret registry.
    pub fn shared_secret(&mut self) -> &mut SwapRegistry {
        &mut self.shared_secret
    }

    /// Predefined registry.
    pub fn predefined(&mut self) -> &mut PredefinedSwapRegistry {
        &mut self.predefined
    }

    /// Router-relay sender registry.
    pub fn sender(&mut self) -> &mut SenderRegistry {
        &mut self.sender
    }

    /// Router-relay receiver registry.
    pub fn receiver(&mut self) -> &mut ReceiverRegistry {
        &mut self.receiver
    }

    /// Trust `peer`'s relay registries on both sides of the handshake.
    ///
    /// Our sender talks to the peer's receiver and vice versa.
    pub fn enroll_peer(&mut self, peer: &DomainConfig) -> Result<(), SwapError> {
        let owner = self.config.owner;
        self.sender
            .enroll_router(owner, peer.domain, peer.receiver_registry)?;
        self.receiver
            .enroll_router(owner, peer.domain, peer.sender_registry)?;
        debug!(
            "[swap-node] {} enrolled peer {} ({})",
            self.config.domain, peer.domain, peer.name
        );
        Ok(())
    }

    /// Hand an envelope to the registry it addresses.
    pub fn deliver(&mut self, envelope: &Envelope) -> Result<Delivery, NodeError> {
        let recipient: &mut dyn MessageRecipient = if envelope.recipient
            == self.config.sender_registry
        {
            &mut self.sender
        } else if envelope.recipient == self.config.receiver_registry {
            &mut self.receiver
        } else {
            return Err(NodeError::UnknownRecipient {
                domain: self.config.domain,
                recipient: envelope.recipient,
            });
        };

        Ok(recipient.handle(envelope.origin, envelope.sender, &envelope.body)?)
    }

    /// Re-send router messages the transport refused earlier.
    pub fn redispatch_pending(&mut self) -> usize {
        self.sender.redispatch_pending() + self.receiver.redispatch_pending()
    }

    /// Router messages still retained by this domain.
    pub fn retained_dispatches(&self) -> usize {
        self.sender.router().pending().len() + self.receiver.router().pending().len()
    }
}
