//! # Adapters
//!
//! In-memory implementations of the outbound ports.

pub mod clock;
pub mod event_sink;
pub mod ledger;
pub mod mailbox;

pub use clock::{ManualClock, SystemClock};
pub use event_sink::RecordingEventSink;
pub use ledger::InMemoryLedger;
pub use mailbox::{Envelope, InMemoryMailbox, MailboxHandle};
