//! # Error Types
//!
//! Parsing errors for the textual forms of the primitive types.

use thiserror::Error;

/// Errors raised when parsing a hex-encoded identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded input had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        got: usize,
    },
}
