//! Hard failures of the pipeline stage
//!
//! Everything not listed here is best-effort: it is logged and the stage
//! carries on with the next fallback.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a missing or unreadable input image
pub const EXIT_INPUT_ERROR: u8 = 2;

/// Errors that abort the stage with a non-zero exit status
#[derive(Error, Debug)]
pub enum StageError {
    /// The input image path does not exist
    #[error("Input image not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// The input image exists but could not be decoded
    #[error("Image not found or unreadable: {}: {reason}", path.display())]
    InputUnreadable { path: PathBuf, reason: String },
}

impl StageError {
    /// Process exit status the calling backend sees for this error
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InputMissing(_) | Self::InputUnreadable { .. } => EXIT_INPUT_ERROR,
        }
    }
}
