//! Integration test: a realistic tilt-series descriptor through the full
//! model lifecycle.
//!
//! Covers file import/export for both JSON and YAML, byte-level dump
//! determinism, the excluded-payload contract for all three marker kinds,
//! strict construction, and the error taxonomy at the file boundary.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tempfile::TempDir;
use tomo_model::{
    audit_model_strictness, DumpOptions, ExcludedArray, ExcludedFrame, ExcludedTensor, Model,
    ModelError,
};

/// Descriptor for a single tilt series as it moves through the pipeline.
///
/// The three `#[serde(skip)]` fields hold data that lives only in process
/// memory: the projection stack, the nominal tilt angles, and the per-frame
/// motion table. They are re-attached by the acquisition reader after any
/// load.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TiltSeries {
    run_id: String,
    pixel_size_a: f64,
    voltage_kv: f64,
    tilt_min_deg: f64,
    tilt_max_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    acquired_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    projections: ExcludedTensor<Vec<Vec<f32>>>,
    #[serde(skip)]
    tilt_angles: ExcludedArray<Vec<f64>>,
    #[serde(skip)]
    motion_table: ExcludedFrame<Vec<(u32, f64, f64)>>,
}

impl Model for TiltSeries {
    fn schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["run_id", "pixel_size_a", "voltage_kv", "tilt_min_deg", "tilt_max_deg"],
            "properties": {
                "run_id": {"type": "string", "minLength": 1},
                "pixel_size_a": {"type": "number", "exclusiveMinimum": 0.0},
                "voltage_kv": {"type": "number"},
                "tilt_min_deg": {"type": "number"},
                "tilt_max_deg": {"type": "number"},
                "acquired_at": {"type": "string"}
            }
        })
    }
}

fn sample() -> TiltSeries {
    TiltSeries {
        run_id: "ts_042".to_string(),
        pixel_size_a: 1.35,
        voltage_kv: 300.0,
        tilt_min_deg: -60.0,
        tilt_max_deg: 60.0,
        acquired_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
        projections: ExcludedTensor::empty(),
        tilt_angles: ExcludedArray::empty(),
        motion_table: ExcludedFrame::empty(),
    }
}

fn sample_with_payloads() -> TiltSeries {
    let mut ts = sample();
    ts.projections.set(vec![vec![0.0f32; 64]; 41]);
    ts.tilt_angles.set((-60..=60).step_by(3).map(f64::from).collect());
    ts.motion_table
        .set(vec![(0, 0.12, -0.07), (1, 0.09, 0.02), (2, -0.31, 0.18)]);
    ts
}

#[test]
fn test_json_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ts_042.json");

    let ts = sample();
    ts.to_json_file(&path, &DumpOptions::default()).unwrap();
    let back = TiltSeries::from_json_file(&path).unwrap();

    assert_eq!(back.run_id, ts.run_id);
    assert_eq!(back.pixel_size_a, ts.pixel_size_a);
    assert_eq!(back.voltage_kv, ts.voltage_kv);
    assert_eq!(back.tilt_min_deg, ts.tilt_min_deg);
    assert_eq!(back.tilt_max_deg, ts.tilt_max_deg);
    assert_eq!(back.acquired_at, ts.acquired_at);
}

#[test]
fn test_yaml_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ts_042.yaml");

    let ts = sample();
    ts.to_yaml_file(&path, &DumpOptions::default()).unwrap();
    let back = TiltSeries::from_yaml_file(&path).unwrap();

    assert_eq!(back.run_id, ts.run_id);
    assert_eq!(back.pixel_size_a, ts.pixel_size_a);
    assert_eq!(back.acquired_at, ts.acquired_at);
}

#[test]
fn test_json_dump_idempotent_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ts.json");

    let ts = sample();
    ts.to_json_file(&path, &DumpOptions::default()).unwrap();
    let first = std::fs::read(&path).unwrap();
    ts.to_json_file(&path, &DumpOptions::default()).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second, "two dumps of one instance must be byte-identical");
}

#[test]
fn test_yaml_dump_idempotent_bytes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ts.yaml");

    let ts = sample();
    ts.to_yaml_file(&path, &DumpOptions::default()).unwrap();
    let first = std::fs::read(&path).unwrap();
    ts.to_yaml_file(&path, &DumpOptions::default()).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_excluded_fields_absent_from_schema_and_dumps() {
    let ts = sample_with_payloads();

    let schema_text = TiltSeries::schema().to_string();
    let json_text = ts.to_json_string(&DumpOptions::default()).unwrap();
    let yaml_text = ts.to_yaml_string(&DumpOptions::default()).unwrap();

    for key in ["projections", "tilt_angles", "motion_table"] {
        assert!(!schema_text.contains(key), "schema leaked '{key}'");
        assert!(!json_text.contains(key), "JSON dump leaked '{key}'");
        assert!(!yaml_text.contains(key), "YAML dump leaked '{key}'");
    }
}

#[test]
fn test_excluded_payloads_are_process_local() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ts.json");

    let ts = sample_with_payloads();
    assert!(!ts.projections.is_empty());
    ts.to_json_file(&path, &DumpOptions::default()).unwrap();

    // Reload: declared fields survive, payloads come back empty and the
    // caller re-attaches them.
    let mut back = TiltSeries::from_json_file(&path).unwrap();
    assert!(back.projections.is_empty());
    assert!(back.tilt_angles.is_empty());
    assert!(back.motion_table.is_empty());

    back.tilt_angles.set(vec![-60.0, -57.0, -54.0]);
    assert_eq!(back.tilt_angles.get().map(Vec::len), Some(3));
}

#[test]
fn test_payloads_do_not_affect_dump_bytes() {
    let plain = sample();
    let loaded = sample_with_payloads();

    let a = plain.to_json_string(&DumpOptions::canonical()).unwrap();
    let b = loaded.to_json_string(&DumpOptions::canonical()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_canonical_dump_survives_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ts.json");

    let ts = sample_with_payloads();
    ts.to_json_file(&path, &DumpOptions::default()).unwrap();
    let back = TiltSeries::from_json_file(&path).unwrap();

    assert_eq!(
        ts.to_json_string(&DumpOptions::canonical()).unwrap(),
        back.to_json_string(&DumpOptions::canonical()).unwrap()
    );
}

#[test]
fn test_unknown_key_in_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extra.json");
    std::fs::write(
        &path,
        r#"{"run_id": "ts_1", "pixel_size_a": 1.0, "voltage_kv": 300.0,
           "tilt_min_deg": -60.0, "tilt_max_deg": 60.0, "detector": "K3"}"#,
    )
    .unwrap();

    let err = TiltSeries::from_json_file(&path).unwrap_err();
    match err {
        ModelError::ValidationFailed { violations, .. } => {
            let text = violations.to_string();
            assert!(text.contains("detector"), "violation should name the key: {text}");
        }
        other => panic!("Expected ValidationFailed, got: {other}"),
    }
}

#[test]
fn test_missing_required_field_identified() {
    let err = TiltSeries::from_json_str(
        r#"{"run_id": "ts_1", "pixel_size_a": 1.0, "voltage_kv": 300.0, "tilt_min_deg": -60.0}"#,
    )
    .unwrap_err();
    let text = err.to_string();
    assert!(
        text.contains("tilt_max_deg"),
        "error should identify the missing field: {text}"
    );
}

#[test]
fn test_constraint_violation_reported() {
    // pixel_size_a must be strictly positive.
    let err = TiltSeries::from_json_str(
        r#"{"run_id": "ts_1", "pixel_size_a": 0.0, "voltage_kv": 300.0,
            "tilt_min_deg": -60.0, "tilt_max_deg": 60.0}"#,
    )
    .unwrap_err();
    match err {
        ModelError::ValidationFailed { violations, .. } => {
            assert_eq!(violations.violations()[0].instance_path, "/pixel_size_a");
        }
        other => panic!("Expected ValidationFailed, got: {other}"),
    }
}

#[test]
fn test_truncated_json_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncated.json");
    std::fs::write(&path, r#"{"run_id": }"#).unwrap();

    let err = TiltSeries::from_json_file(&path).unwrap_err();
    assert!(
        matches!(err, ModelError::JsonSyntax(_)),
        "Expected JsonSyntax, got: {err}"
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does_not_exist.yaml");

    let err = TiltSeries::from_yaml_file(&path).unwrap_err();
    match err {
        ModelError::Io { path: p, source } => {
            assert!(p.ends_with("does_not_exist.yaml"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("Expected Io, got: {other}"),
    }
}

#[test]
fn test_yaml_file_loads_handwritten_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("handwritten.yaml");
    std::fs::write(
        &path,
        "run_id: ts_007\n\
         pixel_size_a: 2.7\n\
         voltage_kv: 200.0\n\
         tilt_min_deg: -45.0\n\
         tilt_max_deg: 45.0\n",
    )
    .unwrap();

    let ts = TiltSeries::from_yaml_file(&path).unwrap();
    assert_eq!(ts.run_id, "ts_007");
    assert_eq!(ts.pixel_size_a, 2.7);
    assert_eq!(ts.acquired_at, None);
    assert!(ts.projections.is_empty());
}

#[test]
fn test_schema_is_strict_everywhere() {
    let findings = audit_model_strictness::<TiltSeries>();
    assert!(
        findings.is_empty(),
        "descriptor schema must lock every envelope:\n{}",
        findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// The minimal two-field scenario: a point with required numeric fields.
mod point {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Point {
        x: f64,
        y: f64,
    }

    impl Model for Point {
        fn schema() -> Value {
            json!({
                "type": "object",
                "additionalProperties": false,
                "required": ["x", "y"],
                "properties": {
                    "x": {"type": "number"},
                    "y": {"type": "number"}
                }
            })
        }
    }

    #[test]
    fn test_point_roundtrip_and_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");

        let p = Point { x: 1.0, y: 2.0 };
        p.to_json_file(&path, &DumpOptions::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"x": 1.0, "y": 2.0}));

        let back = Point::from_json_file(&path).unwrap();
        assert_eq!(back, p);

        let schema = Point::schema();
        assert_eq!(schema["properties"]["x"]["type"], "number");
        assert_eq!(schema["properties"]["y"]["type"], "number");
        assert_eq!(schema["required"], json!(["x", "y"]));
    }
}
