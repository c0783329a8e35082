//! Prometheus metrics for swap nodes.
//!
//! All metrics follow the naming convention: `swap_<area>_<metric>_total`.
//! Registries never touch these directly; the node feeds them from the event
//! bus and from relayer outcomes.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use swap_types::{EmittedEvent, RegistryKind, SwapEvent};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Records created, by registry flavour
    pub static ref SWAPS_CREATED: IntCounterVec = IntCounterVec::new(
        Opts::new("swap_records_created_total", "Escrow records created"),
        &["variant"]
    ).expect("metric creation failed");

    /// Records paid out to the counterparty, by registry flavour
    pub static ref SWAPS_WITHDRAWN: IntCounterVec = IntCounterVec::new(
        Opts::new("swap_records_withdrawn_total", "Escrow records withdrawn or confirmed"),
        &["variant"]
    ).expect("metric creation failed");

    /// Records paid back to the depositor, by registry flavour
    pub static ref SWAPS_REFUNDED: IntCounterVec = IntCounterVec::new(
        Opts::new("swap_records_refunded_total", "Escrow records refunded"),
        &["variant"]
    ).expect("metric creation failed");

    // =========================================================================
    // ROUTER METRICS
    // =========================================================================

    /// Envelopes the relayer took from the mailbox, redeliveries included
    pub static ref ROUTER_DELIVERY_ATTEMPTS: IntCounter = IntCounter::new(
        "swap_router_delivery_attempts_total",
        "Router message delivery attempts, redeliveries included"
    ).expect("metric creation failed");

    /// Delivery outcomes
    pub static ref ROUTER_DELIVERIES: IntCounterVec = IntCounterVec::new(
        Opts::new("swap_router_deliveries_total", "Router message delivery outcomes"),
        &["outcome"]  // outcome: applied/duplicate/rejected
    ).expect("metric creation failed");

    /// Rejections by reason
    pub static ref ROUTER_REJECTIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("swap_router_rejections_total", "Rejected router messages by reason"),
        &["reason"]  // reason: origin/permanent/retry
    ).expect("metric creation failed");
}

/// Delivery outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Message transitioned a record.
    Applied,
    /// Record already terminal.
    Duplicate,
    /// Handler returned an error.
    Rejected,
}

impl DeliveryOutcome {
    fn label(self) -> &'static str {
        match self {
            DeliveryOutcome::Applied => "applied",
            DeliveryOutcome::Duplicate => "duplicate",
            DeliveryOutcome::Rejected => "rejected",
        }
    }
}

/// Rejection reason label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Sender not the enrolled router, or wrong domain.
    Origin,
    /// Will never succeed.
    Permanent,
    /// Transient; requeued.
    Retry,
}

impl RejectionReason {
    fn label(self) -> &'static str {
        match self {
            RejectionReason::Origin => "origin",
            RejectionReason::Permanent => "permanent",
            RejectionReason::Retry => "retry",
        }
    }
}

/// Register all metrics with the global registry. Safe to call twice.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SWAPS_CREATED.clone()),
        Box::new(SWAPS_WITHDRAWN.clone()),
        Box::new(SWAPS_REFUNDED.clone()),
        Box::new(ROUTER_DELIVERY_ATTEMPTS.clone()),
        Box::new(ROUTER_DELIVERIES.clone()),
        Box::new(ROUTER_REJECTIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Update lifecycle counters from one emitted event.
pub fn record_event(emitted: &EmittedEvent) {
    let variant = variant_label(emitted.kind);
    match &emitted.event {
        SwapEvent::Created { .. } | SwapEvent::WithdrawalInitiated { .. } => {
            SWAPS_CREATED.with_label_values(&[variant]).inc()
        }
        SwapEvent::Withdrawn { .. } | SwapEvent::WithdrawalCompleted { .. } => {
            SWAPS_WITHDRAWN.with_label_values(&[variant]).inc()
        }
        SwapEvent::Refunded { .. } => SWAPS_REFUNDED.with_label_values(&[variant]).inc(),
    }
}

/// Count one delivery attempt.
pub fn record_delivery(outcome: DeliveryOutcome) {
    ROUTER_DELIVERIES.with_label_values(&[outcome.label()]).inc();
}

/// Count one rejected delivery.
pub fn record_rejection(reason: RejectionReason) {
    ROUTER_REJECTIONS.with_label_values(&[reason.label()]).inc();
}

fn variant_label(kind: RegistryKind) -> &'static str {
    kind.as_str()
}
