//! # Swap Bus - Event Fan-Out
//!
//! Registries emit [`EmittedEvent`](swap_types::EmittedEvent)s through the
//! `EventSink` port. This crate provides a sink that fans them out to any
//! number of subscribers (indexers, wallet UIs, the metrics exporter).
//!
//! ```text
//! ┌──────────────┐   emit()   ┌──────────────┐  subscribe()  ┌──────────┐
//! │   Registry   │ ─────────▶ │  Event Bus   │ ────────────▶ │ Indexer  │
//! └──────────────┘            └──────────────┘               └──────────┘
//! ```
//!
//! The bus is outbound only: nothing it carries ever feeds back into a
//! registry.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{topic_of, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
