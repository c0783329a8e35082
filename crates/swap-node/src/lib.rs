//! # Swap Node Runtime
//!
//! Hosts one or more execution domains in a single process and relays
//! router messages between them.
//!
//! ## Structure
//!
//! - `config` - `NodeConfig` with env overrides and validation
//! - `domain` - `DomainNode`: a ledger plus the four registries
//! - `network` - every domain wired to one mailbox, clock and event bus
//! - `relayer` - drains the mailbox with bounded redelivery
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `SWAP_*` env)
//! 2. Initialize telemetry
//! 3. Build the network and cross-enroll relay routers
//! 4. Spawn the metrics recorder and the relayer
//! 5. Wait for shutdown

#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod network;
pub mod relayer;

pub use config::{ConfigError, DomainConfig, NodeConfig, RelayerConfig};
pub use domain::{DomainNode, NodeError};
pub use network::{SharedDomain, SwapNetwork};
pub use relayer::{RelayReport, Relayer};

use swap_bus::Subscription;
use tracing::debug;

/// Feed lifecycle metrics from a bus subscription until the bus closes.
pub async fn record_bus_metrics(mut subscription: Subscription) {
    while let Some(event) = subscription.recv().await {
        swap_telemetry::record_event(&event);
    }
    debug!("[swap-node] Event bus closed, metrics recorder stopped");
}
