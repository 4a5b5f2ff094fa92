//! Loading and validation of the WLASL-style JSON catalog.
//!
//! The catalog is a JSON array of gloss records, each carrying an
//! `instances` array. Instance records are loosely typed bags with
//! optional fields; only instances carrying every required field are
//! materialized into [`VideoInstance`]s, the rest are skipped with a
//! diagnostic.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::crop::Bbox;

/// Fatal catalog failures. Anything here aborts the whole run;
/// malformed individual records never surface as an error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One processable gloss instance: a frame range of one source video
/// plus the bounding box isolating the signer.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInstance {
    /// Target class label; also the output directory name.
    pub gloss: String,
    /// Original source URL. Informational only, never fetched.
    pub url: String,
    /// Identifier used to locate `<video_id>.mp4` and to build output
    /// filenames.
    pub video_id: String,
    pub bbox: Bbox,
    /// Declared source frame rate. Informational; extraction operates
    /// in frame-index space.
    pub fps: f64,
    /// First frame index (inclusive, zero-based decode order).
    pub frame_start: i64,
    /// Last frame index (inclusive), or `None` for "through the last
    /// frame". A stored `-1` is normalized to `None`.
    pub frame_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawGloss {
    gloss: Option<String>,
    #[serde(default)]
    instances: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawInstance {
    url: Option<String>,
    bbox: Option<Vec<i64>>,
    fps: Option<f64>,
    frame_start: Option<i64>,
    frame_end: Option<i64>,
    video_id: Option<String>,
}

/// Reads the catalog file. Only unreadable or unparseable input is
/// fatal; valid JSON that is not the expected array shape yields an
/// empty, logged catalog and the run proceeds (to completion, with
/// zero entries).
pub fn load_catalog(path: &Path) -> Result<Vec<Value>, CatalogError> {
    let file = File::open(path)?;
    let data: Value = serde_json::from_reader(BufReader::new(file))?;
    match data {
        Value::Array(records) => Ok(records),
        other => {
            log::warn!(
                "Catalog top level is {} rather than an array; no instances to process",
                json_type_name(&other)
            );
            Ok(Vec::new())
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Flattens raw gloss records into validated [`VideoInstance`]s.
///
/// A gloss record without `gloss`, or an instance missing any of
/// `url`, `bbox`, `fps`, `frame_start`, `video_id` (or with a bbox
/// that is not 4 integers), is skipped and logged. Never errors; an
/// entirely malformed catalog yields an empty vec.
pub fn extract_instances(records: &[Value]) -> Vec<VideoInstance> {
    let mut instances = Vec::new();

    for record in records {
        let raw: RawGloss = match serde_json::from_value(record.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("Skipping malformed gloss record: {e}");
                continue;
            }
        };
        let Some(gloss) = raw.gloss else {
            log::debug!("Skipping gloss record without a gloss label");
            continue;
        };

        for value in &raw.instances {
            match parse_instance(&gloss, value) {
                Some(instance) => instances.push(instance),
                None => log::debug!("Skipping incomplete instance under gloss {gloss:?}"),
            }
        }
    }

    instances
}

fn parse_instance(gloss: &str, value: &Value) -> Option<VideoInstance> {
    let raw: RawInstance = serde_json::from_value(value.clone()).ok()?;
    let bbox = Bbox::from_slice(&raw.bbox?)?;
    // frame_end is genuinely optional; -1 is the legacy "unbounded" sentinel.
    let frame_end = raw.frame_end.filter(|&end| end >= 0);
    Some(VideoInstance {
        gloss: gloss.to_string(),
        url: raw.url?,
        video_id: raw.video_id?,
        bbox,
        fps: raw.fps?,
        frame_start: raw.frame_start?,
        frame_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance_json() -> Value {
        json!({
            "url": "http://example.com/v1.mp4",
            "bbox": [10, 10, 100, 100],
            "fps": 25,
            "frame_start": 0,
            "frame_end": 4,
            "video_id": "v1"
        })
    }

    #[test]
    fn extracts_complete_instance() {
        let records = vec![json!({ "gloss": "hello", "instances": [instance_json()] })];
        let instances = extract_instances(&records);
        assert_eq!(instances.len(), 1);
        let inst = &instances[0];
        assert_eq!(inst.gloss, "hello");
        assert_eq!(inst.video_id, "v1");
        assert_eq!(inst.bbox, Bbox::new(10, 10, 100, 100));
        assert_eq!(inst.frame_start, 0);
        assert_eq!(inst.frame_end, Some(4));
    }

    #[test]
    fn skips_instance_missing_bbox() {
        let mut incomplete = instance_json();
        incomplete.as_object_mut().unwrap().remove("bbox");
        let records = vec![json!({ "gloss": "hello", "instances": [incomplete] })];
        assert!(extract_instances(&records).is_empty());
    }

    #[test]
    fn absent_frame_end_is_unbounded() {
        let mut inst = instance_json();
        inst.as_object_mut().unwrap().remove("frame_end");
        let records = vec![json!({ "gloss": "hello", "instances": [inst] })];
        let instances = extract_instances(&records);
        assert_eq!(instances[0].frame_end, None);
    }

    #[test]
    fn negative_frame_end_is_unbounded() {
        let mut inst = instance_json();
        inst["frame_end"] = json!(-1);
        let records = vec![json!({ "gloss": "hello", "instances": [inst] })];
        let instances = extract_instances(&records);
        assert_eq!(instances[0].frame_end, None);
    }

    #[test]
    fn skips_malformed_bbox_and_gloss_records() {
        let mut bad_bbox = instance_json();
        bad_bbox["bbox"] = json!([1, 2, 3]);
        let records = vec![
            json!({ "instances": [instance_json()] }),
            json!({ "gloss": "hi", "instances": [bad_bbox, instance_json()] }),
            json!("not an object"),
        ];
        let instances = extract_instances(&records);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].gloss, "hi");
    }

    #[test]
    fn object_top_level_yields_empty_catalog_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{}").unwrap();
        let records = load_catalog(&path).unwrap();
        assert!(records.is_empty());
        assert!(extract_instances(&records).is_empty());
    }

    #[test]
    fn invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[{").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn load_catalog_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
