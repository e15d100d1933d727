//! Command-line arguments
//!
//! The flag names are part of the contract with the calling backend, hence
//! the underscores in `--out_glb` and `--out_json`.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_FALLBACK_NAME;

#[derive(Parser, Debug)]
#[command(name = "photomesh")]
#[command(about = "Image to 3D pipeline stage: writes a GLB model and a JSON metadata sidecar", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to input image (jpg/png)
    #[arg(long)]
    pub input: PathBuf,

    /// Output GLB path
    #[arg(long = "out_glb")]
    pub out_glb: PathBuf,

    /// Output JSON metadata path
    #[arg(long = "out_json")]
    pub out_json: PathBuf,

    /// Path to an existing GLB or other mesh (OBJ, STL)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Resize percent for preview/metadata (negative values clamp to a 1x1 preview)
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    pub scale: i64,

    /// Do not open any windows
    #[arg(long)]
    pub headless: bool,

    /// Directory holding the bundled fallback model [default: <executable dir>/assets]
    #[arg(long, env = "PHOTOMESH_ASSET_DIR")]
    pub asset_dir: Option<PathBuf>,

    /// File name of the bundled fallback model
    #[arg(long, default_value = DEFAULT_FALLBACK_NAME)]
    pub fallback_name: String,

    /// Clean up and normalize a generated mesh before export
    #[arg(long)]
    pub clean: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}
