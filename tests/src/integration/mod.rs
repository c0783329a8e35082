//! # Integration Tests
//!
//! Cross-domain behaviour exercised through the node runtime.

pub mod properties;
pub mod relay;
