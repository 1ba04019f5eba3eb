//! # Canonical Serialization: JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for the
//! byte-stable canonical dump form used across the Tomo Stack.
//!
//! ## Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which serializes via
//! `serde_jcs` for RFC 8785 (JSON Canonicalization Scheme) compliant output:
//! sorted keys, compact separators, deterministic byte sequence.
//!
//! Any function requiring canonical bytes must accept `&CanonicalBytes`, and
//! the only way to produce one is through this pipeline, so a "wrong
//! serialization path" cannot exist downstream.
//!
//! ## Numbers
//!
//! Model documents carry floating-point fields freely (pixel sizes, tilt
//! angles, dose rates). RFC 8785 prescribes ES6 number rendering, which is
//! deterministic for every finite `f64`, so floats pass through unchanged.
//! Non-finite values cannot occur: `serde_json::Number` holds finite values
//! only, and serializers reject NaN and infinities before this module runs.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by RFC 8785 canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted lexicographically by UTF-16 code unit.
/// - Separators are compact, with no trailing whitespace.
/// - Numbers use ES6 rendering, identical bytes for identical values.
///
/// These invariants are enforced by the constructor and cannot be violated
/// by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the ONLY way to construct `CanonicalBytes`; every canonical
    /// dump in the stack flows through this constructor.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (for example a map with non-string
    /// keys, or a `Serialize` impl that reports an error).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(obj)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume self and return the canonical text.
    ///
    /// The bytes are valid UTF-8 by construction (they came from a
    /// `String`), so this conversion cannot fail.
    pub fn into_string(self) -> String {
        // Safe reconstruction: the buffer was produced from String bytes.
        String::from_utf8(self.0).unwrap_or_default()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
