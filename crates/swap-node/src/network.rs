//! # Swap Network
//!
//! Every configured domain wired to one mailbox, one clock and one event
//! bus, with each domain's relay registries enrolled as routers on every
//! other domain.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use swap_bus::InMemoryEventBus;
use swap_htlc::{Clock, InMemoryMailbox};
use swap_types::DomainId;
use tracing::info;

use crate::config::NodeConfig;
use crate::domain::{DomainNode, NodeError};

/// Shared handle to one domain.
pub type SharedDomain = Arc<Mutex<DomainNode>>;

/// All domains hosted by this process.
pub struct SwapNetwork {
    mailbox: InMemoryMailbox,
    bus: Arc<InMemoryEventBus>,
    clock: Arc<dyn Clock>,
    nodes: BTreeMap<DomainId, SharedDomain>,
}

impl SwapNetwork {
    /// Validate `config` and build every domain it names.
    pub fn from_config(config: &NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        config.validate()?;

        let mailbox = InMemoryMailbox::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let mut nodes = BTreeMap::new();

        for domain in &config.domains {
            let mut node = DomainNode::new(
                domain.clone(),
                config.receiver.clone(),
                &mailbox,
                clock.clone(),
                bus.clone(),
            );
            for peer in config.domains.iter().filter(|p| p.domain != domain.domain) {
                node.enroll_peer(peer)?;
            }
            nodes.insert(domain.domain, Arc::new(Mutex::new(node)));
        }

        info!(
            "[swap-node] Network ready with {} domain(s): {:?}",
            nodes.len(),
            nodes.keys().collect::<Vec<_>>()
        );

        Ok(Self {
            mailbox,
            bus,
            clock,
            nodes,
        })
    }

    /// Message hub between the domains.
    pub fn mailbox(&self) -> &InMemoryMailbox {
        &self.mailbox
    }

    /// Event bus every registry emits into.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Shared time source.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// One domain.
    pub fn node(&self, domain: DomainId) -> Result<SharedDomain, NodeError> {
        self.nodes
            .get(&domain)
            .cloned()
            .ok_or(NodeError::UnknownDomain(domain))
    }

    /// Every domain, ordered by id.
    pub fn nodes(&self) -> &BTreeMap<DomainId, SharedDomain> {
        &self.nodes
    }
}
