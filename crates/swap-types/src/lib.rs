//! # Swap Types Crate
//!
//! Value types shared by the swap registries, the event bus and the runtime.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers that two domains must compute
//!   identically (`SwapId`, `DomainId`, `Address`) are defined here once.
//! - **Events are outbound only**: registries emit `SwapEvent`s through the
//!   `EventSink` port; nothing in the core ever consumes them.

pub mod entities;
pub mod errors;
pub mod events;

pub use entities::*;
pub use errors::*;
pub use events::*;
