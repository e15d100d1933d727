//! Wavefront OBJ reader backed by `tobj`

use crate::error::{GeometryError, Result};
use crate::mesh::TriangleMesh;
use glam::Vec3;
use std::path::Path;

/// Load every object in an OBJ file into a single triangulated mesh
///
/// Materials are ignored. Normals are kept only when every object supplies them.
pub fn read_obj(path: &Path) -> Result<TriangleMesh> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, _materials) =
        tobj::load_obj(path, &options).map_err(|e| GeometryError::parse("OBJ", e.to_string()))?;

    let mut mesh = TriangleMesh::default();
    let mut all_normals = true;
    for model in &models {
        let m = &model.mesh;
        let base = mesh.vertices.len() as u32;

        mesh.vertices
            .extend(m.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
        mesh.triangles.extend(
            m.indices
                .chunks_exact(3)
                .map(|t| [base + t[0], base + t[1], base + t[2]]),
        );

        if m.normals.len() == m.positions.len() {
            mesh.normals
                .extend(m.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
        } else {
            all_normals = false;
        }
        log::trace!(
            "OBJ object '{}': {} vertices, {} triangles",
            model.name,
            m.positions.len() / 3,
            m.indices.len() / 3
        );
    }

    if !all_normals {
        mesh.normals.clear();
    }
    Ok(mesh)
}
