//! # Event Topics and Filters
//!
//! Classifies emitted swap events so subscribers can pick what they need.

use serde::{Deserialize, Serialize};
use swap_types::{DomainId, EmittedEvent, RegistryKind, SwapEvent, SwapId};

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// A record was created and its asset escrowed.
    Created,
    /// A record was paid out to its counterparty.
    Withdrawn,
    /// A record was paid back to its depositor.
    Refunded,
    /// Receiver-side handshake progress.
    Relay,
    /// All events (no filtering).
    All,
}

/// Topic of a swap event.
pub fn topic_of(event: &SwapEvent) -> EventTopic {
    match event {
        SwapEvent::Created { .. } => EventTopic::Created,
        SwapEvent::Withdrawn { .. } => EventTopic::Withdrawn,
        SwapEvent::Refunded { .. } => EventTopic::Refunded,
        SwapEvent::WithdrawalInitiated { .. } | SwapEvent::WithdrawalCompleted { .. } => {
            EventTopic::Relay
        }
    }
}

/// Filter for subscribing to specific events. Empty lists match everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include.
    pub topics: Vec<EventTopic>,
    /// Emitting domains to include.
    pub domains: Vec<DomainId>,
    /// Registry flavours to include.
    pub registries: Vec<RegistryKind>,
    /// Swap ids to include.
    pub swap_ids: Vec<SwapId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    /// Create a filter for events emitted on specific domains.
    #[must_use]
    pub fn from_domains(domains: Vec<DomainId>) -> Self {
        Self {
            domains,
            ..Self::default()
        }
    }

    /// Narrow to one swap id.
    #[must_use]
    pub fn for_swap(mut self, id: SwapId) -> Self {
        self.swap_ids.push(id);
        self
    }

    /// Narrow to one registry flavour.
    #[must_use]
    pub fn for_registry(mut self, kind: RegistryKind) -> Self {
        self.registries.push(kind);
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, emitted: &EmittedEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&topic_of(&emitted.event));
        let domain_match = self.domains.is_empty() || self.domains.contains(&emitted.domain);
        let registry_match =
            self.registries.is_empty() || self.registries.contains(&emitted.kind);
        let id_match =
            self.swap_ids.is_empty() || self.swap_ids.contains(&emitted.event.swap_id());

        topic_match && domain_match && registry_match && id_match
    }
}
