//! # Routing
//!
//! Router enrollment, the router message codec and the pure inbound
//! transition functions used by the router-relay registries.

pub mod enrollment;
pub mod handler;
pub mod messages;

pub use enrollment::RouterEnrollment;
pub use handler::{on_confirm_completion, on_confirm_withdrawal, Effect, Transition};
pub use messages::RouterMessage;
