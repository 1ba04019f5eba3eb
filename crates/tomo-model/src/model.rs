//! # Model Documents
//!
//! The [`Model`] trait turns a serde-typed struct into a model document:
//! a validated, schema-described record that can be loaded from and saved
//! to JSON or YAML files.
//!
//! ## Construction Pipeline
//!
//! Every load follows the same path: read the whole file, parse the text
//! into a JSON value (YAML documents are converted to the JSON value tree
//! first), validate the value against the model's declared schema, then
//! perform typed construction with serde. Each stage fails loudly with its
//! own [`ModelError`] variant and nothing is retried or defaulted.
//!
//! ## Strictness
//!
//! Implementors declare schemas with `additionalProperties: false` and
//! derive with `#[serde(deny_unknown_fields)]`. The schema check reports
//! unknown keys as structured violations; the serde check is the typed
//! backstop behind it. The [`crate::policy`] module audits the former.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tomo_core::CanonicalBytes;

use crate::error::ModelError;
use crate::validate;

/// How JSON text is laid out on dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonLayout {
    /// Single line, no extra whitespace. The default.
    #[default]
    Compact,
    /// Indented, human-oriented.
    Pretty,
    /// RFC 8785 canonical form: sorted keys, compact separators,
    /// byte-for-byte deterministic.
    Canonical,
}

/// Options forwarded to the dump step of `to_*` operations.
///
/// `exclude` drops the named top-level fields from the produced document;
/// it applies to both JSON and YAML output. `layout` applies to JSON text
/// only (YAML has a single emitter layout).
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// JSON text layout.
    pub layout: JsonLayout,
    /// Top-level field names to drop from the output document.
    pub exclude: BTreeSet<String>,
}

impl DumpOptions {
    /// Options producing indented JSON.
    pub fn pretty() -> Self {
        Self {
            layout: JsonLayout::Pretty,
            ..Self::default()
        }
    }

    /// Options producing RFC 8785 canonical JSON.
    pub fn canonical() -> Self {
        Self {
            layout: JsonLayout::Canonical,
            ..Self::default()
        }
    }

    /// Drop a top-level field from the output document.
    pub fn exclude_field(mut self, name: impl Into<String>) -> Self {
        self.exclude.insert(name.into());
        self
    }
}

/// A typed model document with schema-validated construction and
/// JSON/YAML file import/export.
///
/// Implementors provide [`Model::schema`]; everything else has a default.
/// The expected declaration shape:
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use serde_json::{json, Value};
/// use tomo_model::Model;
///
/// #[derive(Debug, Serialize, Deserialize)]
/// #[serde(deny_unknown_fields)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl Model for Point {
///     fn schema() -> Value {
///         json!({
///             "type": "object",
///             "additionalProperties": false,
///             "required": ["x", "y"],
///             "properties": {
///                 "x": {"type": "number"},
///                 "y": {"type": "number"}
///             }
///         })
///     }
/// }
///
/// # fn main() -> Result<(), tomo_model::ModelError> {
/// let p = Point::from_json_str(r#"{"x": 1.0, "y": 2.0}"#)?;
/// assert_eq!(p.x, 1.0);
/// assert!(Point::from_json_str(r#"{"x": 1.0, "y": 2.0, "q": 3}"#).is_err());
/// # Ok(())
/// # }
/// ```
pub trait Model: Serialize + DeserializeOwned {
    /// The declared JSON Schema document for this model's serialized form.
    ///
    /// This is the single source of structural truth: field names, types,
    /// constraints, and the strict `additionalProperties: false` envelope.
    /// Excluded payload fields never appear here. Pure, no I/O.
    fn schema() -> Value;

    /// Short name used in error context. Defaults to the unqualified type
    /// name.
    fn model_name() -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }

    /// Construct an instance from a parsed document value.
    ///
    /// Validates against [`Model::schema`] first, then performs typed
    /// construction.
    ///
    /// # Errors
    ///
    /// `BadSchema` if the declared schema cannot be compiled;
    /// `ValidationFailed` with structured violations if the document does
    /// not conform; `Construction` if typed deserialization rejects a
    /// schema-valid value.
    fn from_value(value: Value) -> Result<Self, ModelError> {
        let name = Self::model_name();
        let validator = validate::compile_validator(&Self::schema(), &name)?;
        validate::check_value(&validator, &value, &name)?;
        serde_json::from_value(value).map_err(|e| ModelError::Construction {
            model: name,
            source: e,
        })
    }

    /// Construct an instance from JSON text.
    fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text).map_err(ModelError::JsonSyntax)?;
        Self::from_value(value)
    }

    /// Construct an instance from YAML text.
    ///
    /// The document is parsed in the JSON-compatible subset; a tagged
    /// value is rejected rather than handed to any constructor.
    fn from_yaml_str(text: &str) -> Result<Self, ModelError> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(ModelError::YamlSyntax)?;
        let value = validate::yaml_to_json(yaml).map_err(ModelError::YamlNotJsonCompatible)?;
        Self::from_value(value)
    }

    /// Load an instance from a JSON file.
    ///
    /// Reads the whole file as UTF-8; the handle is closed on all exit
    /// paths. I/O errors carry the path and the untouched source error.
    fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(
            path = %path.display(),
            bytes = text.len(),
            "loaded JSON model document"
        );
        Self::from_json_str(&text)
    }

    /// Load an instance from a YAML file.
    fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(
            path = %path.display(),
            bytes = text.len(),
            "loaded YAML model document"
        );
        Self::from_yaml_str(&text)
    }

    /// Produce the document value for this instance.
    ///
    /// Excluded payload fields are absent by construction (`#[serde(skip)]`
    /// never emits them); `options.exclude` then drops any further named
    /// top-level fields. Key order in the value is deterministic.
    fn to_value(&self, options: &DumpOptions) -> Result<Value, ModelError> {
        let mut value = serde_json::to_value(self).map_err(ModelError::Serialize)?;
        if !options.exclude.is_empty() {
            if let Value::Object(ref mut map) = value {
                for key in &options.exclude {
                    map.remove(key);
                }
            }
        }
        Ok(value)
    }

    /// Dump this instance as JSON text, laid out per `options.layout`.
    fn to_json_string(&self, options: &DumpOptions) -> Result<String, ModelError> {
        let value = self.to_value(options)?;
        match options.layout {
            JsonLayout::Compact => serde_json::to_string(&value).map_err(ModelError::Serialize),
            JsonLayout::Pretty => {
                serde_json::to_string_pretty(&value).map_err(ModelError::Serialize)
            }
            JsonLayout::Canonical => Ok(CanonicalBytes::new(&value)?.into_string()),
        }
    }

    /// Dump this instance as YAML text.
    fn to_yaml_string(&self, options: &DumpOptions) -> Result<String, ModelError> {
        let value = self.to_value(options)?;
        serde_yaml::to_string(&value).map_err(ModelError::YamlEmit)
    }

    /// Save this instance to a JSON file, overwriting any existing file.
    ///
    /// Whole-file write, no streaming, no atomic rename. Given identical
    /// instance and options, the written bytes are identical every time.
    fn to_json_file<P: AsRef<Path>>(&self, path: P, options: &DumpOptions) -> Result<(), ModelError> {
        let path = path.as_ref();
        let text = self.to_json_string(options)?;
        fs::write(path, &text).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(
            path = %path.display(),
            bytes = text.len(),
            "wrote JSON model document"
        );
        Ok(())
    }

    /// Save this instance to a YAML file, overwriting any existing file.
    fn to_yaml_file<P: AsRef<Path>>(&self, path: P, options: &DumpOptions) -> Result<(), ModelError> {
        let path = path.as_ref();
        let text = self.to_yaml_string(options)?;
        fs::write(path, &text).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(
            path = %path.display(),
            bytes = text.len(),
            "wrote YAML model document"
        );
        Ok(())
    }
}
