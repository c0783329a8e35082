//! # Node Configuration
//!
//! Domains hosted by this node, relayer tuning and receiver settings.
//!
//! Defaults describe a two-domain devnet. Every scalar can be overridden
//! through `SWAP_*` environment variables, see [`NodeConfig::from_env`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use swap_htlc::ReceiverRegistryConfig;
use swap_telemetry::TelemetryConfig;
use swap_types::{Address, DomainId};
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Logging and metrics.
    pub telemetry: TelemetryConfig,
    /// Hosted domains.
    pub domains: Vec<DomainConfig>,
    /// Message relayer.
    pub relayer: RelayerConfig,
    /// Applied to every receiver registry.
    pub receiver: ReceiverRegistryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            telemetry: TelemetryConfig::default(),
            domains: vec![DomainConfig::devnet(1, "alpha"), DomainConfig::devnet(2, "beta")],
            relayer: RelayerConfig::default(),
            receiver: ReceiverRegistryConfig::default(),
        }
    }
}

/// One execution domain and the addresses of its registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain identifier, unique across the node.
    pub domain: DomainId,
    /// Human readable name for logs.
    pub name: String,
    /// Administers router enrollment on this domain.
    pub owner: Address,
    /// Shared-secret registry address.
    pub shared_secret_registry: Address,
    /// Predefined registry address.
    pub predefined_registry: Address,
    /// Router-relay sender registry address.
    pub sender_registry: Address,
    /// Router-relay receiver registry address.
    pub receiver_registry: Address,
}

impl DomainConfig {
    /// Devnet addresses: high nibble is the domain, low nibble the role.
    pub fn devnet(domain: u32, name: &str) -> Self {
        let base = ((domain & 0x0F) as u8) << 4;
        Self {
            domain: DomainId(domain),
            name: name.to_string(),
            owner: Address::repeat(base | 0x0A),
            shared_secret_registry: Address::repeat(base | 0x01),
            predefined_registry: Address::repeat(base | 0x02),
            sender_registry: Address::repeat(base | 0x03),
            receiver_registry: Address::repeat(base | 0x04),
        }
    }

    /// Every registry address on this domain.
    pub fn registry_addresses(&self) -> [Address; 4] {
        [
            self.shared_secret_registry,
            self.predefined_registry,
            self.sender_registry,
            self.receiver_registry,
        ]
    }
}

/// Relayer tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Milliseconds between mailbox sweeps.
    pub poll_interval_ms: u64,
    /// Retryable failures tolerated per message before it is dropped.
    pub max_redeliveries: u32,
    /// Maximum envelopes drained per domain per sweep.
    pub batch_size: usize,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            max_redeliveries: 5,
            batch_size: 64,
        }
    }
}

impl NodeConfig {
    /// Defaults with environment overrides.
    ///
    /// # Environment Variables
    ///
    /// - `SWAP_POLL_INTERVAL_MS`: Relayer sweep interval (default: 250)
    /// - `SWAP_MAX_REDELIVERIES`: Redelivery budget per message (default: 5)
    /// - `SWAP_BATCH_SIZE`: Envelopes per domain per sweep (default: 64)
    /// - `SWAP_REFUND_GRACE_SECS`: Receiver refund grace (default: 0)
    ///
    /// Telemetry variables are read by [`TelemetryConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.telemetry = TelemetryConfig::from_env();
        Ok(config)
    }

    /// Defaults overridden by an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "SWAP_POLL_INTERVAL_MS")? {
            config.relayer.poll_interval_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "SWAP_MAX_REDELIVERIES")? {
            config.relayer.max_redeliveries = v;
        }
        if let Some(v) = parse_var(&lookup, "SWAP_BATCH_SIZE")? {
            config.relayer.batch_size = v;
        }
        if let Some(v) = parse_var(&lookup, "SWAP_REFUND_GRACE_SECS")? {
            config.receiver.refund_grace_secs = v;
        }
        Ok(config)
    }

    /// Reject configurations the runtime cannot wire.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::NoDomains);
        }
        if self.relayer.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.relayer.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        let mut domains = HashSet::new();
        for domain in &self.domains {
            if !domains.insert(domain.domain) {
                return Err(ConfigError::DuplicateDomain(domain.domain));
            }
            // Registries on one domain hold escrow at distinct addresses
            let mut addresses = HashSet::new();
            for address in domain.registry_addresses() {
                if !addresses.insert(address) {
                    return Err(ConfigError::AddressCollision {
                        domain: domain.domain,
                        address,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a hosted domain.
    pub fn domain(&self, id: DomainId) -> Option<&DomainConfig> {
        self.domains.iter().find(|d| d.domain == id)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No domains configured.
    #[error("No domains configured")]
    NoDomains,

    /// Two domains share an id.
    #[error("Duplicate domain id: {0}")]
    DuplicateDomain(DomainId),

    /// Relayer would spin.
    #[error("Relayer poll interval must be > 0")]
    ZeroPollInterval,

    /// Relayer would never drain anything.
    #[error("Relayer batch size must be > 0")]
    ZeroBatchSize,

    /// Two registries on one domain share an address.
    #[error("Registry address {address} used twice on {domain}")]
    AddressCollision {
        /// Offending domain.
        domain: DomainId,
        /// Shared address.
        address: Address,
    },

    /// Environment value failed to parse.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}
