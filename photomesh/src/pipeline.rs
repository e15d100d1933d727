//! One invocation of the stage, from input validation to the metadata file

use std::path::Path;

use crate::capability::Capabilities;
use crate::config::StageConfig;
use crate::error::StageError;
use crate::image_probe::PreviewDims;
use crate::metadata::{Metadata, write_metadata};
use crate::resolve::{Resolution, resolve_model};
use crate::utils::{ensure_parent_dir, format_bytes};

/// What a completed run produced
#[derive(Debug)]
pub struct StageReport {
    pub resized_dims: Option<PreviewDims>,
    pub resolution: Resolution,
    pub metadata_written: bool,
}

/// Run the stage
///
/// Only a missing or undecodable input image is an error. Every other
/// failure is logged and shows up in the report instead.
pub fn run(config: &StageConfig, caps: &Capabilities) -> Result<StageReport, StageError> {
    if !config.input.exists() {
        return Err(StageError::InputMissing(config.input.clone()));
    }
    log::debug!("Capabilities: {}", caps.describe());
    if config.headless {
        log::debug!("Headless mode");
    }

    for out in [&config.out_glb, &config.out_json] {
        if let Err(e) = ensure_parent_dir(out) {
            log::warn!("Failed to create directory for {}: {e}", out.display());
        }
    }

    let resized_dims = inspect_image(config, caps)?;

    let resolution = resolve_model(config, &caps.geometry);
    if resolution.wrote_model() {
        log_final_size(&config.out_glb);
    }

    let metadata = Metadata::new(config.input_basename(), resized_dims, &resolution);
    let metadata_written = match write_metadata(&metadata, &config.out_json) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed writing JSON: {e:#}");
            false
        }
    };

    if resolution.wrote_model() {
        log::info!("GLB ready at: {}", config.out_glb.display());
    } else {
        log::error!("No GLB could be produced, and no fallback found.");
    }

    Ok(StageReport {
        resized_dims,
        resolution,
        metadata_written,
    })
}

fn inspect_image(
    config: &StageConfig,
    caps: &Capabilities,
) -> Result<Option<PreviewDims>, StageError> {
    let inspector = match caps.image.get() {
        Ok(inspector) => inspector,
        Err(reason) => {
            log::warn!("Image decoder not available, skipping resize. ({reason})");
            return Ok(None);
        }
    };

    let dims = inspector
        .preview(&config.input, config.scale)
        .map_err(|e| StageError::InputUnreadable {
            path: config.input.clone(),
            reason: format!("{e:#}"),
        })?;
    log::info!("Preview size at {}%: {}x{}", config.scale, dims.width, dims.height);
    Ok(Some(dims))
}

fn log_final_size(path: &Path) {
    if let Ok(meta) = path.metadata() {
        log::info!("Final GLB size: {}", format_bytes(meta.len()));
    }
}
