//! Error types for the geometry library

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors that can occur while building, reading or exporting meshes
#[derive(Error, Debug)]
pub enum GeometryError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The mesh has no triangles to operate on
    #[error("Mesh has no triangles")]
    EmptyMesh,

    /// A triangle references a vertex that does not exist
    #[error("Triangle {triangle} references vertex {index}, but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Primitive dimensions must be positive and finite
    #[error("Invalid primitive dimension {name}: {value}")]
    InvalidDimension { name: &'static str, value: f32 },

    /// The file extension does not map to a supported reader
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The file could not be parsed as the expected format
    #[error("Failed to parse {format} data: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Invalid magic bytes in a GLB header
    #[error("Invalid GLB magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },

    /// Unsupported GLB container version
    #[error("Unsupported GLB version: expected 2, found {0}")]
    UnsupportedVersion(u32),

    /// The glTF JSON chunk could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Buffer grew past the 32-bit lengths GLB can describe
    #[error("GLB payload too large: {0} bytes")]
    TooLarge(usize),
}

impl GeometryError {
    pub(crate) fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }
}
