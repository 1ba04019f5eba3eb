//! # tomo-model: Typed Model Documents
//!
//! This crate defines the model layer of the Tomo Stack: serde-typed
//! structs promoted to validated, schema-described documents with JSON and
//! YAML file import/export.
//!
//! ## Responsibilities
//!
//! - **Validated construction:** every load validates the raw document
//!   against the model's declared JSON Schema (Draft 2020-12) before typed
//!   construction. Unknown keys, missing required fields, and constraint
//!   failures surface as structured [`Violations`], never as silently
//!   dropped or defaulted data.
//!
//! - **File import/export:** [`Model::from_json_file`],
//!   [`Model::from_yaml_file`], [`Model::to_json_file`], and
//!   [`Model::to_yaml_file`] do synchronous whole-file reads and writes.
//!   Dumps are deterministic; the `Canonical` layout is additionally
//!   RFC 8785 byte-stable.
//!
//! - **Schema access:** [`Model::schema`] returns the declared structural
//!   schema as a nested mapping. The [`policy`] module audits that a
//!   schema locks `additionalProperties` at every object envelope.
//!
//! - **Runtime-only payloads:** [`ExcludedTensor`], [`ExcludedArray`],
//!   and [`ExcludedFrame`] mark fields that hold data on an instance but
//!   never appear in schema or serialized output.
//!
//! ## Design
//!
//! The trait carries the machinery; a model declares its fields once as a
//! struct and once as a schema document, and everything else has a
//! default. Errors follow a strict taxonomy (I/O, parse, validation) and
//! are propagated with sources intact: nothing is caught, translated, or
//! retried.

pub mod error;
pub mod excluded;
pub mod model;
pub mod policy;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use error::ModelError;
pub use excluded::{ExcludedArray, ExcludedFrame, ExcludedTensor};
pub use model::{DumpOptions, JsonLayout, Model};
pub use policy::{audit_model_strictness, audit_strictness, StrictnessFinding};
pub use validate::{Violation, Violations};
