//! # Swap Test Suite
//!
//! Unified test crate for the swap workspace.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Funded multi-domain devnet on a manual clock
//! │
//! └── integration/
//!     ├── scenarios.rs  # End-to-end swaps per variant
//!     ├── properties.rs # Escrow, timelock and secret invariants
//!     └── relay.rs      # Router relay under lost, repeated and refused messages
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p swap-tests
//!
//! # By category
//! cargo test -p swap-tests integration::scenarios::
//! cargo test -p swap-tests integration::relay::
//!
//! # Benchmarks
//! cargo bench -p swap-tests
//! ```

pub mod fixtures;
pub mod integration;
