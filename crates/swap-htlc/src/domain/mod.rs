//! # Domain Layer
//!
//! Records, state machines, guards and the error taxonomy.

pub mod arena;
pub mod entities;
pub mod errors;
pub mod guards;
pub mod secure_secret;
pub mod value_objects;

pub use arena::SwapArena;
pub use entities::{
    EscrowRecord, InboundReceipt, OutboundSwapIntent, PredefinedSwapRecord, SwapRecord,
};
pub use errors::{AssetError, SwapError, TransportError};
pub use guards::*;
pub use secure_secret::SwapSecret;
pub use value_objects::{
    PredefinedTerms, ReceiptState, RelayTerms, SharedSecretTerms, SwapState,
};
