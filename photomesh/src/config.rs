//! Stage configuration, resolved once at startup

use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Name of the bundled fallback model
pub const DEFAULT_FALLBACK_NAME: &str = "Model1.glb";

/// Directory name of bundled assets, next to the executable
pub const ASSET_DIR_NAME: &str = "assets";

/// Box dimensions (width, height, depth) of the generated placeholder
pub const PLACEHOLDER_BOX: (f32, f32, f32) = (1.0, 0.3, 0.2);

/// Turn about +Y applied after `--clean` normalization, matching the
/// orientation of earlier sample models
pub const CLEAN_ROTATION_Y: f32 = -std::f32::consts::FRAC_PI_2;

/// Everything one invocation of the stage needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    pub input: PathBuf,
    pub out_glb: PathBuf,
    pub out_json: PathBuf,
    pub model: Option<PathBuf>,
    pub scale: u32,
    pub headless: bool,
    pub clean: bool,
    /// Full path of the bundled fallback model
    pub fallback_asset: PathBuf,
}

impl StageConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let asset_dir = cli.asset_dir.clone().unwrap_or_else(default_asset_dir);
        Self {
            input: cli.input.clone(),
            out_glb: cli.out_glb.clone(),
            out_json: cli.out_json.clone(),
            model: cli.model.clone(),
            scale: clamp_scale(cli.scale),
            headless: cli.headless,
            clean: cli.clean,
            fallback_asset: asset_dir.join(&cli.fallback_name),
        }
    }

    /// File name of the bundled fallback, for notes and logs
    pub fn fallback_name(&self) -> String {
        file_name_of(&self.fallback_asset)
    }

    pub fn input_basename(&self) -> String {
        file_name_of(&self.input)
    }
}

/// Percentages below zero act as zero; the preview is floored to 1x1 anyway
fn clamp_scale(percent: i64) -> u32 {
    u32::try_from(percent.max(0)).unwrap_or(u32::MAX)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `assets/` next to the running executable, or relative to the working directory
fn default_asset_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ASSET_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(ASSET_DIR_NAME))
}
