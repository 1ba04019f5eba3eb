//! # Schema Strictness Audit
//!
//! A model document is a closed record: every key must be declared, and
//! undeclared keys are construction errors. That only holds if the
//! declared schema locks its object envelopes with
//! `additionalProperties: false` (absent defaults to `true` in JSON
//! Schema, which silently accepts anything).
//!
//! This module audits a schema document and reports every object envelope
//! that fails to lock, with the JSON Pointer path to the offending spot.
//! Consumers typically call [`audit_model_strictness`] from their test
//! suites so a permissive schema cannot land unnoticed.

use serde_json::Value;

use crate::model::Model;

/// A finding about `additionalProperties` configuration.
#[derive(Debug, Clone)]
pub struct StrictnessFinding {
    /// JSON Pointer path to the `additionalProperties` position.
    pub json_path: String,
    /// Current value of `additionalProperties` at that position.
    pub current_value: String,
    /// Recommended action.
    pub recommendation: String,
}

impl std::fmt::Display for StrictnessFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  {}: {} -> {}",
            self.json_path, self.current_value, self.recommendation
        )
    }
}

/// Audit every object envelope in a schema document.
///
/// Returns one finding per object schema whose `additionalProperties` is
/// `true` or absent. An `additionalProperties` that is itself a schema is
/// accepted: it restricts rather than allows all. An empty result means
/// the schema enforces strict construction everywhere.
pub fn audit_strictness(schema: &Value) -> Vec<StrictnessFinding> {
    let mut findings = Vec::new();
    walk_object_schemas(schema, "", &mut findings);
    findings
}

/// Audit a model type's declared schema directly.
pub fn audit_model_strictness<M: Model>() -> Vec<StrictnessFinding> {
    audit_strictness(&M::schema())
}

fn walk_object_schemas(schema: &Value, path: &str, findings: &mut Vec<StrictnessFinding>) {
    let is_object_schema = schema.get("type") == Some(&Value::String("object".to_string()))
        || schema.get("properties").is_some();

    if is_object_schema {
        match schema.get("additionalProperties") {
            Some(Value::Bool(false)) => {}
            Some(Value::Object(_)) => {
                // A sub-schema restricts extra keys rather than allowing all.
            }
            Some(Value::Bool(true)) => {
                findings.push(StrictnessFinding {
                    json_path: format!("{path}/additionalProperties"),
                    current_value: "true".to_string(),
                    recommendation: "set to false for model envelopes".to_string(),
                });
            }
            None => {
                findings.push(StrictnessFinding {
                    json_path: format!("{path}/additionalProperties"),
                    current_value: "(absent, defaults to true)".to_string(),
                    recommendation: "set to false for model envelopes".to_string(),
                });
            }
            _ => {}
        }
    }

    if let Some(Value::Object(props)) = schema.get("properties") {
        for (name, sub) in props {
            walk_object_schemas(sub, &format!("{path}/properties/{name}"), findings);
        }
    }

    if let Some(items) = schema.get("items") {
        walk_object_schemas(items, &format!("{path}/items"), findings);
    }

    for key in ["definitions", "$defs"] {
        if let Some(Value::Object(defs)) = schema.get(key) {
            for (name, sub) in defs {
                walk_object_schemas(sub, &format!("{path}/{key}/{name}"), findings);
            }
        }
    }
}
