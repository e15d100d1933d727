//! CLI integration tests
//!
//! These run the real binary the way the backend does and check the exit
//! status together with what ends up on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_case::test_case;

/// A scratch workspace with an input photo and an empty asset directory
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        let ws = Self { dir };
        ws.write_png("photo.png", 64, 32);
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.path(name);
        image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
            .save(&path)
            .unwrap();
        path
    }

    fn out_glb(&self) -> PathBuf {
        self.path("work/output.glb")
    }

    fn out_json(&self) -> PathBuf {
        self.path("work/output.json")
    }

    /// Command with the backend's standard flags and an isolated asset dir
    fn command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_photomesh"));
        cmd.env_remove("RUST_LOG")
            .env_remove("PHOTOMESH_ASSET_DIR")
            .arg("--input")
            .arg(input)
            .arg("--out_glb")
            .arg(self.out_glb())
            .arg("--out_json")
            .arg(self.out_json())
            .arg("--asset-dir")
            .arg(self.path("assets"))
            .arg("--headless");
        cmd
    }

    fn metadata(&self) -> Value {
        let text = fs::read_to_string(self.out_json()).expect("metadata should be written");
        serde_json::from_str(&text).expect("metadata should be valid JSON")
    }
}

fn assert_close(value: &Value, expected: [f64; 3]) {
    let actual: Vec<f64> = value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_f64().expect("number"))
        .collect();
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_missing_input_exits_2_without_outputs() {
    let ws = Workspace::new();

    ws.command(&ws.path("missing.jpg"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input image not found"));

    assert!(!ws.out_glb().exists());
    assert!(!ws.out_json().exists());
}

#[test]
fn test_unreadable_input_exits_2() {
    let ws = Workspace::new();
    let input = ws.path("broken.png");
    fs::write(&input, b"this is not a png").unwrap();

    ws.command(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unreadable"));

    assert!(!ws.out_json().exists());
}

#[test]
fn test_supplied_glb_is_copied_verbatim() {
    let ws = Workspace::new();
    let model = ws.path("scan.glb");
    // Content is never parsed on this path
    let bytes = b"glTF\x02\x00\x00\x00opaque payload".to_vec();
    fs::write(&model, &bytes).unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(&model)
        .assert()
        .success();

    assert_eq!(fs::read(ws.out_glb()).unwrap(), bytes);
    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "raw_copy");
    assert_eq!(meta["preprocess_note"], "Raw GLB copied as-is.");
    assert_eq!(meta["measures"], serde_json::json!({}));
}

#[test]
fn test_bundled_fallback_is_copied_verbatim() {
    let ws = Workspace::new();
    let bytes = b"bundled fallback model".to_vec();
    fs::write(ws.path("assets/Model1.glb"), &bytes).unwrap();

    ws.command(&ws.path("photo.png")).assert().success();

    assert_eq!(fs::read(ws.out_glb()).unwrap(), bytes);
    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "bundled_fallback");
    assert_eq!(meta["preprocess_note"], "Used fallback Model1.glb");
}

#[test]
fn test_missing_glb_model_falls_back_to_bundled() {
    let ws = Workspace::new();
    fs::write(ws.path("assets/Custom.glb"), b"custom").unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(ws.path("gone.glb"))
        .arg("--fallback-name")
        .arg("Custom.glb")
        .assert()
        .success();

    assert_eq!(fs::read(ws.out_glb()).unwrap(), b"custom");
    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "bundled_fallback");
    assert_eq!(
        meta["preprocess_note"],
        "Raw GLB copy failed. | Used fallback Custom.glb"
    );
}

#[test]
fn test_generated_box_is_valid_glb() {
    let ws = Workspace::new();

    ws.command(&ws.path("photo.png")).assert().success();

    let bytes = fs::read(ws.out_glb()).unwrap();
    let (document, _buffers, _images) = gltf::import_slice(&bytes).expect("valid GLB");
    let prim = document
        .meshes()
        .next()
        .and_then(|m| m.primitives().next())
        .expect("one primitive");
    assert!(prim.get(&gltf::Semantic::Normals).is_some());

    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "generated");
    assert_eq!(
        meta["preprocess_note"],
        "No model path provided, using primitive box."
    );
    assert_eq!(meta["measures"]["vertex_count"], 8);
    assert_eq!(meta["measures"]["triangle_count"], 12);
    assert_close(&meta["measures"]["bbox_size"], [1.0, 0.3, 0.2]);
}

#[test]
fn test_obj_model_is_converted() {
    let ws = Workspace::new();
    let model = ws.path("tetra.obj");
    fs::write(
        &model,
        "v 0 0 0\nv 2 0 0\nv 0 2 0\nv 0 0 2\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n",
    )
    .unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(&model)
        .assert()
        .success();

    let bytes = fs::read(ws.out_glb()).unwrap();
    assert!(gltf::import_slice(&bytes).is_ok());

    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "generated");
    assert_eq!(meta["preprocess_note"], "");
    assert_eq!(meta["measures"]["vertex_count"], 4);
    assert_eq!(meta["measures"]["triangle_count"], 4);
    assert_close(&meta["measures"]["bbox_max"], [2.0, 2.0, 2.0]);
}

#[test]
fn test_invalid_mesh_model_switches_to_box() {
    let ws = Workspace::new();
    let model = ws.path("points.obj");
    fs::write(&model, "v 0 0 0\nv 1 0 0\n").unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(&model)
        .assert()
        .success();

    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "generated");
    assert_eq!(meta["measures"]["vertex_count"], 8);
    assert!(
        meta["preprocess_note"]
            .as_str()
            .unwrap()
            .contains("primitive box")
    );
}

#[test_case(50, 32, 16 ; "default half size")]
#[test_case(10, 6, 3 ; "floors fractions")]
#[test_case(1, 1, 1 ; "clamps to one pixel")]
#[test_case(200, 128, 64 ; "upscales")]
fn test_preview_dimensions(scale: u32, width: u64, height: u64) {
    let ws = Workspace::new();

    ws.command(&ws.path("photo.png"))
        .arg("--scale")
        .arg(scale.to_string())
        .assert()
        .success();

    let meta = ws.metadata();
    assert_eq!(meta["resized_dims"]["width"], width);
    assert_eq!(meta["resized_dims"]["height"], height);
}

#[test]
fn test_negative_scale_clamps_to_one_pixel() {
    let ws = Workspace::new();

    ws.command(&ws.path("photo.png"))
        .arg("--scale")
        .arg("-20")
        .assert()
        .success();

    let meta = ws.metadata();
    assert_eq!(meta["resized_dims"]["width"], 1);
    assert_eq!(meta["resized_dims"]["height"], 1);
}

#[test]
fn test_huge_scale_still_writes_metadata() {
    let ws = Workspace::new();

    ws.command(&ws.path("photo.png"))
        .arg("--scale")
        .arg("1000000")
        .assert()
        .success();

    let meta = ws.metadata();
    assert_eq!(meta["resized_dims"]["width"], 640_000);
    assert_eq!(meta["resized_dims"]["height"], 320_000);
    assert!(ws.out_glb().exists());
}

#[test]
fn test_clean_welds_normalizes_and_turns_mesh() {
    let ws = Workspace::new();
    let model = ws.path("square.stl");
    fs::write(
        &model,
        "solid sq
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 2 0 0
vertex 2 2 0
endloop
endfacet
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 2 2 0
vertex 0 2 0
endloop
endfacet
endsolid sq
",
    )
    .unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(&model)
        .arg("--clean")
        .assert()
        .success();

    let bytes = fs::read(ws.out_glb()).unwrap();
    assert!(gltf::import_slice(&bytes).is_ok());

    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "generated");
    assert_eq!(meta["measures"]["vertex_count"], 4);
    assert_eq!(meta["measures"]["triangle_count"], 2);
    // Unit extent after normalizing; the quarter turn moves the square into YZ
    assert_close(&meta["measures"]["bbox_size"], [0.0, 1.0, 1.0]);
    assert_close(&meta["measures"]["bbox_min"], [0.0, -0.5, -0.5]);
}

#[test]
fn test_non_finite_obj_switches_to_box() {
    let ws = Workspace::new();
    let model = ws.path("nan.obj");
    fs::write(&model, "v nan 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(&model)
        .assert()
        .success();

    let bytes = fs::read(ws.out_glb()).unwrap();
    assert!(gltf::import_slice(&bytes).is_ok());

    let meta = ws.metadata();
    assert_eq!(meta["model_source"], "generated");
    assert_eq!(meta["measures"]["vertex_count"], 8);
    assert!(
        meta["preprocess_note"]
            .as_str()
            .unwrap()
            .starts_with("Failed to load model:")
    );
}

#[test]
fn test_model_at_output_path_is_not_truncated() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path("work")).unwrap();
    fs::write(ws.out_glb(), b"existing model").unwrap();

    ws.command(&ws.path("photo.png"))
        .arg("--model")
        .arg(ws.out_glb())
        .assert()
        .success();

    let meta = ws.metadata();
    assert_ne!(meta["model_source"], "raw_copy");
    assert!(
        meta["preprocess_note"]
            .as_str()
            .unwrap()
            .starts_with("Raw GLB copy failed.")
    );
    assert!(!fs::read(ws.out_glb()).unwrap().is_empty());
}

#[test]
fn test_metadata_fields() {
    let ws = Workspace::new();

    ws.command(&ws.path("photo.png")).assert().success();

    let meta = ws.metadata();
    assert_eq!(meta["status"], "ok");
    assert_eq!(meta["input_image_basename"], "photo.png");
    assert!(meta["notes"].is_string());
    let probabilities = meta["probabilities"].as_object().unwrap();
    for region in [
        "head",
        "neck",
        "torso",
        "left_arm",
        "right_arm",
        "left_leg",
        "right_leg",
    ] {
        let p = probabilities[region].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p), "{region} = {p}");
    }
}

#[test]
fn test_final_size_is_logged() {
    let ws = Workspace::new();

    ws.command(&ws.path("photo.png"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Final GLB size:"))
        .stderr(predicate::str::contains("GLB ready at:"));
}
