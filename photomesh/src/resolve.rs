//! Model resolution: decide which GLB bytes end up at the output path
//!
//! Three tiers are tried strictly in order and the first one that writes
//! the output wins:
//!
//! 1. copy a caller-supplied `.glb` verbatim
//! 2. copy the bundled fallback model verbatim
//! 3. generate a mesh (the supplied non-GLB model, else a box) and export it
//!
//! A failing tier is logged and the next one runs. Running out of tiers is
//! reported in the [`Resolution`], never as an error.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::capability::Capability;
use crate::config::{CLEAN_ROTATION_Y, PLACEHOLDER_BOX, StageConfig};
use crate::geometry::{GeometryEngine, MeshHandle, MeshMeasures};
use crate::utils::has_extension;

/// Which tier produced the output model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    RawCopy,
    BundledFallback,
    Generated,
    #[default]
    None,
}

/// Outcome of model resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub source: ModelSource,
    /// Human-readable notes collected along the way
    pub notes: Vec<String>,
    /// Statistics of the generated mesh, tier 3 only
    pub measures: Option<MeshMeasures>,
}

impl Resolution {
    pub fn wrote_model(&self) -> bool {
        self.source != ModelSource::None
    }

    /// All notes joined into a single line
    pub fn note(&self) -> String {
        self.notes.join(" | ")
    }

    fn push_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        if !note.is_empty() {
            self.notes.push(note);
        }
    }
}

/// Run the fallback chain for one invocation
pub fn resolve_model(
    config: &StageConfig,
    geometry: &Capability<Box<dyn GeometryEngine>>,
) -> Resolution {
    let mut resolution = Resolution::default();

    // Tier 1: caller-supplied GLB
    if let Some(model) = config.model.as_deref().filter(|m| is_glb(m)) {
        match copy_verbatim(model, &config.out_glb) {
            Ok(bytes) => {
                log::info!("Copied {} ({bytes} bytes) as-is", model.display());
                resolution.source = ModelSource::RawCopy;
                resolution.push_note("Raw GLB copied as-is.");
                return resolution;
            }
            Err(e) => {
                log::warn!("Raw GLB copy failed: {e:#}");
                resolution.push_note("Raw GLB copy failed.");
            }
        }
    }

    // Tier 2: bundled fallback
    if config.fallback_asset.is_file() {
        match copy_verbatim(&config.fallback_asset, &config.out_glb) {
            Ok(bytes) => {
                log::info!(
                    "Copied bundled fallback {} ({bytes} bytes)",
                    config.fallback_asset.display()
                );
                resolution.source = ModelSource::BundledFallback;
                resolution.push_note(format!("Used fallback {}", config.fallback_name()));
                return resolution;
            }
            Err(e) => log::warn!("Fallback copy failed: {e:#}"),
        }
    } else {
        log::debug!(
            "No bundled fallback at {}",
            config.fallback_asset.display()
        );
    }

    // Tier 3: generated mesh
    match geometry.get() {
        Ok(engine) => generate(engine.as_ref(), config, &mut resolution),
        Err(reason) => {
            log::warn!("Geometry engine not available; cannot write GLB. ({reason})");
            resolution.push_note("Geometry engine unavailable, GLB will not be produced.");
        }
    }

    resolution
}

fn is_glb(path: &Path) -> bool {
    has_extension(path, "glb")
}

fn copy_verbatim(src: &Path, dst: &Path) -> Result<u64> {
    if !src.is_file() {
        anyhow::bail!("{} does not exist", src.display());
    }
    // Copying a file onto itself truncates it
    if is_same_file(src, dst) {
        anyhow::bail!("{} and {} are the same file", src.display(), dst.display());
    }
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Load the supplied mesh if it is usable, otherwise build the placeholder box
fn load_or_box(
    engine: &dyn GeometryEngine,
    model: Option<&Path>,
    resolution: &mut Resolution,
) -> Result<Box<dyn MeshHandle>> {
    match model {
        Some(path) if path.exists() && !is_glb(path) => match engine.load_mesh(path) {
            Ok(mesh) if mesh.has_triangles() => return Ok(mesh),
            Ok(_) => resolution.push_note("Provided model invalid, switching to primitive box."),
            Err(e) => {
                log::warn!("{e:#}");
                resolution.push_note(format!("Failed to load model: {e:#}"));
            }
        },
        Some(path) if !path.exists() => {
            resolution.push_note(format!(
                "Model {} not found, using primitive box.",
                path.display()
            ));
        }
        Some(_) => {}
        None => resolution.push_note("No model path provided, using primitive box."),
    }

    let (width, height, depth) = PLACEHOLDER_BOX;
    engine
        .create_box(width, height, depth)
        .context("Failed to create primitive")
}

fn generate(engine: &dyn GeometryEngine, config: &StageConfig, resolution: &mut Resolution) {
    let mut mesh = match load_or_box(engine, config.model.as_deref(), resolution) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::warn!("{e:#}");
            resolution.push_note(format!("{e:#}"));
            return;
        }
    };

    if config.clean {
        match mesh.clean() {
            Ok(report) => log::debug!("Cleanup removed {report:?}"),
            Err(e) => resolution.push_note(format!("cleanup warn: {e:#}")),
        }
        if let Err(e) = mesh.normalize() {
            resolution.push_note(format!("normalize warn: {e:#}"));
        }
        if let Err(e) = mesh.rotate_y(CLEAN_ROTATION_Y) {
            resolution.push_note(format!("rotate warn: {e:#}"));
        }
    }

    if let Err(e) = mesh.compute_vertex_normals() {
        log::warn!("Vertex normals failed: {e:#}");
        resolution.push_note(format!("normals warn: {e:#}"));
    }

    resolution.measures = Some(mesh.measures());

    match mesh.export_glb(&config.out_glb) {
        Ok(true) => resolution.source = ModelSource::Generated,
        Ok(false) => log::warn!(
            "GLB exporter returned false for {}",
            config.out_glb.display()
        ),
        Err(e) => log::warn!("{e:#}"),
    }
}
