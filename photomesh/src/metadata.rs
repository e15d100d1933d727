//! JSON metadata sidecar
//!
//! The probability table and the notes are placeholders until a real model
//! produces them. The backend stores the document as-is.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::geometry::MeshMeasures;
use crate::image_probe::PreviewDims;
use crate::resolve::{ModelSource, Resolution};

/// Fixed free-text note
pub const PLACEHOLDER_NOTES: &str = "Pipeline placeholder. Replace with ML output.";

/// Per-region damage probabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageProbabilities {
    pub head: f64,
    pub neck: f64,
    pub torso: f64,
    pub left_arm: f64,
    pub right_arm: f64,
    pub left_leg: f64,
    pub right_leg: f64,
}

/// Static table emitted until real inference is wired in
pub const PLACEHOLDER_PROBABILITIES: DamageProbabilities = DamageProbabilities {
    head: 0.12,
    neck: 0.05,
    torso: 0.41,
    left_arm: 0.18,
    right_arm: 0.22,
    left_leg: 0.09,
    right_leg: 0.07,
};

/// Geometry statistics; serializes to `{}` when no mesh was generated
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Measures {
    #[serde(flatten)]
    pub mesh: Option<MeshMeasures>,
}

/// The metadata document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub status: &'static str,
    pub notes: &'static str,
    pub preprocess_note: String,
    pub input_image_basename: String,
    pub resized_dims: Option<PreviewDims>,
    pub probabilities: DamageProbabilities,
    pub measures: Measures,
    pub model_source: ModelSource,
}

impl Metadata {
    pub fn new(
        input_image_basename: String,
        resized_dims: Option<PreviewDims>,
        resolution: &Resolution,
    ) -> Self {
        Self {
            status: "ok",
            notes: PLACEHOLDER_NOTES,
            preprocess_note: resolution.note(),
            input_image_basename,
            resized_dims,
            probabilities: PLACEHOLDER_PROBABILITIES,
            measures: Measures {
                mesh: resolution.measures.clone(),
            },
            model_source: resolution.source,
        }
    }
}

/// Write `metadata` as pretty-printed JSON
pub fn write_metadata(metadata: &Metadata, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create metadata file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, metadata).context("Failed to serialize metadata")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn test_document_without_mesh() {
        let resolution = Resolution {
            source: ModelSource::BundledFallback,
            notes: vec!["Used fallback Model1.glb".to_string()],
            measures: None,
        };
        let meta = Metadata::new(
            "photo.jpg".to_string(),
            Some(PreviewDims {
                width: 100,
                height: 50,
            }),
            &resolution,
        );

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "ok",
                "notes": PLACEHOLDER_NOTES,
                "preprocess_note": "Used fallback Model1.glb",
                "input_image_basename": "photo.jpg",
                "resized_dims": { "width": 100, "height": 50 },
                "probabilities": {
                    "head": 0.12,
                    "neck": 0.05,
                    "torso": 0.41,
                    "left_arm": 0.18,
                    "right_arm": 0.22,
                    "left_leg": 0.09,
                    "right_leg": 0.07
                },
                "measures": {},
                "model_source": "bundled_fallback"
            })
        );
    }

    #[test]
    fn test_document_with_mesh_measures() {
        let resolution = Resolution {
            source: ModelSource::Generated,
            notes: Vec::new(),
            measures: Some(MeshMeasures {
                vertex_count: 8,
                triangle_count: 12,
                bbox_min: [0.0, 0.0, 0.0],
                bbox_max: [1.0, 0.5, 0.25],
                bbox_size: [1.0, 0.5, 0.25],
            }),
        };
        let meta = Metadata::new("x.png".to_string(), None, &resolution);
        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(value["resized_dims"], Value::Null);
        assert_eq!(value["measures"]["vertex_count"], 8);
        assert_eq!(value["measures"]["bbox_max"], json!([1.0, 0.5, 0.25]));
        assert_eq!(value["model_source"], "generated");
    }

    #[test]
    fn test_write_metadata_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let resolution = Resolution::default();
        let meta = Metadata::new("x.png".to_string(), None, &resolution);

        assert!(write_metadata(&meta, &dir.path().join("nope/meta.json")).is_err());

        let path = dir.path().join("meta.json");
        write_metadata(&meta, &path).unwrap();
        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["model_source"], "none");
    }
}
