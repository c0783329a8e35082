//! # Ports
//!
//! Inbound: message delivery and queries. Outbound: ledger, clock, transport.

pub mod inbound;
pub mod outbound;

pub use inbound::{Delivery, MessageRecipient, SwapQuery};
pub use outbound::{AssetTransferPort, Clock, CrossDomainTransport, LedgerTransfer, MessageHandle};
