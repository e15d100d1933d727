//! Mesh readers for the non-container formats a base model may come in

#[cfg(feature = "obj")]
pub mod obj;
pub mod stl;

use crate::error::{GeometryError, Result};
use crate::mesh::TriangleMesh;
use std::path::Path;

/// Mesh formats that can be read into a [`TriangleMesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// Wavefront OBJ
    Obj,
    /// STL, ASCII or binary
    Stl,
}

impl MeshFormat {
    /// Guess the format from a file extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Short name used in parse errors
    pub const fn name(self) -> &'static str {
        match self {
            Self::Obj => "OBJ",
            Self::Stl => "STL",
        }
    }
}

/// Read a triangle mesh, picking the reader by file extension
pub fn read_triangle_mesh(path: &Path) -> Result<TriangleMesh> {
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| GeometryError::UnsupportedFormat(path.to_path_buf()))?;
    log::debug!("Reading {format:?} mesh from {}", path.display());

    let mesh = match format {
        #[cfg(feature = "obj")]
        MeshFormat::Obj => obj::read_obj(path)?,
        #[cfg(not(feature = "obj"))]
        MeshFormat::Obj => return Err(GeometryError::UnsupportedFormat(path.to_path_buf())),
        MeshFormat::Stl => stl::read_stl(&std::fs::read(path)?)?,
    };

    mesh.validate_indices()?;
    if let Some(index) = mesh.vertices.iter().position(|v| !v.is_finite()) {
        return Err(GeometryError::parse(
            format.name(),
            format!("vertex {index} has a non-finite coordinate"),
        ));
    }
    Ok(mesh)
}
