//! # Schema Validation
//!
//! Runtime validation of model documents against their declared JSON
//! Schema (Draft 2020-12), plus the YAML-to-JSON value conversion that
//! runs before validation.
//!
//! ## Invariant
//!
//! Schema validation is a trust boundary. Documents that fail validation
//! are rejected with structured error information: the JSON Pointer path
//! to the violating field, the schema path that triggered the error, and
//! a human-readable message. Unknown keys and missing required fields both
//! surface here, never as silently dropped or defaulted data.
//!
//! ## Schema Resolution
//!
//! Model schemas are self-contained documents. Internal `$ref`s of the
//! form `#/definitions/<name>` or `#/$defs/<name>` are resolved by the
//! `jsonschema` crate natively; there is no cross-document registry and
//! no network retrieval.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::ModelError;

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the document.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compile a model's declared schema into a reusable validator.
///
/// # Errors
///
/// Returns `ModelError::BadSchema` if the schema document is not itself a
/// valid Draft 2020-12 schema.
pub fn compile_validator(schema: &Value, model: &str) -> Result<Validator, ModelError> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .build(schema)
        .map_err(|e| ModelError::BadSchema {
            model: model.to_string(),
            reason: e.to_string(),
        })
}

/// Validate a parsed document value against a compiled validator.
///
/// # Errors
///
/// Returns `ModelError::ValidationFailed` carrying every violation found,
/// not just the first.
pub fn check_value(
    validator: &Validator,
    instance: &Value,
    model: &str,
) -> Result<(), ModelError> {
    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ModelError::ValidationFailed {
            model: model.to_string(),
            violations: violations.into(),
        })
    }
}

/// Convert a parsed YAML document into the equivalent JSON value tree.
///
/// Model documents live in the JSON-compatible subset of YAML: null,
/// booleans, finite numbers, strings, sequences, and string-keyed
/// mappings. Everything outside that subset is an error rather than a
/// coercion. Mapping keys must already be strings because they name
/// declared fields, tagged values are refused the same way a safe parse
/// refuses custom constructors, and `.inf`/`.nan` have no JSON form.
pub fn yaml_to_json(yaml: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(b)),
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Number(n) => number_to_json(n),
        Yaml::Sequence(seq) => seq
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                let key = match key {
                    Yaml::String(s) => s,
                    other => {
                        return Err(format!(
                            "mapping key {other:?} is not a string; field names must be strings"
                        ))
                    }
                };
                out.insert(key, yaml_to_json(value)?);
            }
            Ok(Value::Object(out))
        }
        Yaml::Tagged(tagged) => Err(format!(
            "tag '{}' is not part of the JSON-compatible subset",
            tagged.tag
        )),
    }
}

/// Map a YAML number onto a JSON number, preferring the integer forms.
fn number_to_json(n: serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    match n.as_f64().and_then(serde_json::Number::from_f64) {
        Some(f) => Ok(Value::Number(f)),
        None => Err(format!("number {n} has no JSON representation")),
    }
}
