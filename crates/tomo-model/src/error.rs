//! # Error Types: the Model-Layer Taxonomy
//!
//! Every failure a model operation can hit maps to exactly one variant:
//! I/O, parse, or validation. Nothing is caught and suppressed, nothing is
//! retried, and every variant keeps its source error (or the structured
//! violation list) intact so the caller can diagnose the root cause.

use std::path::PathBuf;

use thiserror::Error;
use tomo_core::CanonicalizationError;

use crate::validate::Violations;

/// Error from a model operation.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Reading or writing a document file failed.
    #[error("io error for '{path}': {source}")]
    Io {
        /// Path of the file that could not be read or written.
        path: PathBuf,
        /// The underlying filesystem error, untouched.
        #[source]
        source: std::io::Error,
    },

    /// The document text is not syntactically valid JSON.
    #[error("malformed JSON: {0}")]
    JsonSyntax(#[source] serde_json::Error),

    /// The document text is not syntactically valid YAML.
    #[error("malformed YAML: {0}")]
    YamlSyntax(#[source] serde_yaml::Error),

    /// The YAML document parsed, but uses a construct with no JSON
    /// equivalent: a non-string mapping key, a tagged value, or a
    /// non-finite number.
    #[error("yaml document is outside the JSON-compatible subset: {0}")]
    YamlNotJsonCompatible(String),

    /// The model's declared schema could not be compiled into a validator.
    #[error("schema for model '{model}' is invalid: {reason}")]
    BadSchema {
        /// Name of the model whose schema failed to compile.
        model: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The document did not conform to the model's declared schema.
    #[error("validation failed for model '{model}':\n{violations}")]
    ValidationFailed {
        /// Name of the model that was validated against.
        model: String,
        /// Structured list of individual violations.
        violations: Violations,
    },

    /// The document passed schema validation but typed construction
    /// failed (a field value does not fit its declared Rust type, or an
    /// undeclared key survived into the typed layer).
    #[error("cannot construct model '{model}': {source}")]
    Construction {
        /// Name of the model being constructed.
        model: String,
        /// The deserializer's error, untouched.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a model instance to a document value failed.
    #[error("cannot serialize model: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Emitting YAML text from a document value failed.
    #[error("cannot emit YAML: {0}")]
    YamlEmit(#[source] serde_yaml::Error),

    /// Canonical byte production failed.
    #[error("canonicalization error: {0}")]
    Canonical(#[from] CanonicalizationError),
}
