//! # Error Types: Shared Error Hierarchy
//!
//! Errors for the foundational crate. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations, and every variant
//! keeps its source error intact so callers can diagnose the root cause.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be represented as canonical JSON. Typical
    /// causes: a map with non-string keys, or a `Serialize` impl that
    /// reports an error.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
