//! # Relayer
//!
//! Moves router messages from the mailbox to the destination domain.
//!
//! Each sweep first asks every domain to re-send retained dispatches, then
//! drains up to `batch_size` envelopes per destination and delivers them.
//! Transient failures are requeued until `max_redeliveries` is spent;
//! everything else is final. Duplicates are normal and counted, not logged
//! as failures.

use std::collections::BTreeMap;
use std::time::Duration;

use swap_htlc::{Delivery, Envelope, InMemoryMailbox};
use swap_telemetry::{
    record_delivery, record_rejection, DeliveryOutcome, RejectionReason,
    ROUTER_DELIVERY_ATTEMPTS,
};
use swap_types::DomainId;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::RelayerConfig;
use crate::domain::NodeError;
use crate::network::{SharedDomain, SwapNetwork};

/// Counters from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Envelopes that transitioned a record.
    pub applied: usize,
    /// Envelopes for records already terminal.
    pub duplicates: usize,
    /// Envelopes put back for another attempt.
    pub requeued: usize,
    /// Envelopes rejected for good.
    pub rejected: usize,
    /// Envelopes dropped after spending their redelivery budget.
    pub exhausted: usize,
    /// Retained dispatches accepted by the transport this sweep.
    pub redispatched: usize,
}

impl RelayReport {
    /// Envelopes taken from the mailbox.
    pub fn handled(&self) -> usize {
        self.applied + self.duplicates + self.requeued + self.rejected + self.exhausted
    }

    /// True when the sweep found nothing to do.
    pub fn is_idle(&self) -> bool {
        self.handled() == 0 && self.redispatched == 0
    }

    fn merge(&mut self, other: RelayReport) {
        self.applied += other.applied;
        self.duplicates += other.duplicates;
        self.requeued += other.requeued;
        self.rejected += other.rejected;
        self.exhausted += other.exhausted;
        self.redispatched += other.redispatched;
    }
}

/// Drives the mailbox between the domains of a [`SwapNetwork`].
pub struct Relayer {
    mailbox: InMemoryMailbox,
    nodes: BTreeMap<DomainId, SharedDomain>,
    config: RelayerConfig,
}

impl Relayer {
    /// Relayer over every domain of `network`.
    pub fn new(network: &SwapNetwork, config: RelayerConfig) -> Self {
        Self {
            mailbox: network.mailbox().clone(),
            nodes: network.nodes().clone(),
            config,
        }
    }

    /// Tuning in effect.
    pub fn config(&self) -> &RelayerConfig {
        &self.config
    }

    /// One pass over every domain.
    pub fn pump(&self) -> RelayReport {
        let mut report = RelayReport::default();

        for node in self.nodes.values() {
            report.redispatched += node.lock().redispatch_pending();
        }

        // Replies produced during this sweep wait for the next one
        let batch: Vec<Envelope> = self
            .mailbox
            .domains()
            .into_iter()
            .flat_map(|domain| self.mailbox.drain(domain, self.config.batch_size))
            .collect();

        for envelope in batch {
            ROUTER_DELIVERY_ATTEMPTS.inc();
            report.merge(self.deliver(envelope));
        }

        if !report.is_idle() {
            debug!(?report, "[swap-node] Relay sweep");
        }
        report
    }

    /// Sweep until a pass finds nothing, at most `max_sweeps` times.
    pub fn pump_until_idle(&self, max_sweeps: usize) -> RelayReport {
        let mut total = RelayReport::default();
        for _ in 0..max_sweeps {
            let report = self.pump();
            if report.is_idle() {
                break;
            }
            total.merge(report);
        }
        total
    }

    /// Sweep every `poll_interval_ms` until `shutdown` flips to true.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms));
        info!(
            poll_interval_ms = self.config.poll_interval_ms,
            "[swap-node] Relayer started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.pump();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[swap-node] Relayer shutdown signal received");
                        break;
                    }
                }
            }
        }
    }

    fn deliver(&self, mut envelope: Envelope) -> RelayReport {
        let mut report = RelayReport::default();
        let outcome = match self.nodes.get(&envelope.destination) {
            Some(node) => node.lock().deliver(&envelope),
            None => Err(NodeError::UnknownDomain(envelope.destination)),
        };

        match outcome {
            Ok(Delivery::Applied) => {
                record_delivery(DeliveryOutcome::Applied);
                report.applied += 1;
            }
            Ok(Delivery::Duplicate) => {
                record_delivery(DeliveryOutcome::Duplicate);
                debug!(
                    handle = %envelope.handle,
                    "[swap-node] Duplicate delivery ignored"
                );
                report.duplicates += 1;
            }
            Err(err) if err.is_retryable() => {
                record_delivery(DeliveryOutcome::Rejected);
                record_rejection(RejectionReason::Retry);
                envelope.attempts += 1;
                if envelope.attempts > self.config.max_redeliveries {
                    error!(
                        handle = %envelope.handle,
                        destination = %envelope.destination,
                        attempts = envelope.attempts,
                        "[swap-node] Redelivery budget spent, dropping: {}",
                        err
                    );
                    report.exhausted += 1;
                } else {
                    warn!(
                        handle = %envelope.handle,
                        attempts = envelope.attempts,
                        "[swap-node] Transient delivery failure, requeued: {}",
                        err
                    );
                    self.mailbox.requeue(envelope);
                    report.requeued += 1;
                }
            }
            Err(err) if err.is_origin_problem() => {
                record_delivery(DeliveryOutcome::Rejected);
                record_rejection(RejectionReason::Origin);
                warn!(
                    handle = %envelope.handle,
                    origin = %envelope.origin,
                    sender = %envelope.sender,
                    "[swap-node] Message from untrusted origin rejected: {}",
                    err
                );
                report.rejected += 1;
            }
            Err(err) => {
                record_delivery(DeliveryOutcome::Rejected);
                record_rejection(RejectionReason::Permanent);
                warn!(
                    handle = %envelope.handle,
                    destination = %envelope.destination,
                    "[swap-node] Message rejected: {}",
                    err
                );
                report.rejected += 1;
            }
        }
        report
    }
}
