//! # Error Types
//!
//! Errors shared by every crate that parses identifiers from raw bytes.

use thiserror::Error;

/// Errors raised when building an identifier from untrusted bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    /// Byte slice has the wrong width for the identifier.
    #[error("Invalid {kind} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Identifier type name.
        kind: &'static str,
        /// Expected width in bytes.
        expected: usize,
        /// Actual width in bytes.
        actual: usize,
    },
}
