//! Procedurally generated placeholder shapes

use crate::error::{GeometryError, Result};
use crate::mesh::TriangleMesh;
use glam::Vec3;

/// Build an axis-aligned box spanning `(0, 0, 0)` to `(width, height, depth)`
///
/// The box has 8 shared corner vertices and 12 triangles wound so that every
/// face normal points away from the box center.
pub fn create_box(width: f32, height: f32, depth: f32) -> Result<TriangleMesh> {
    for (name, value) in [("width", width), ("height", height), ("depth", depth)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(GeometryError::InvalidDimension { name, value });
        }
    }

    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(width, 0.0, 0.0),
        Vec3::new(0.0, 0.0, depth),
        Vec3::new(width, 0.0, depth),
        Vec3::new(0.0, height, 0.0),
        Vec3::new(width, height, 0.0),
        Vec3::new(0.0, height, depth),
        Vec3::new(width, height, depth),
    ];

    let triangles = vec![
        // +Y
        [4, 7, 5],
        [4, 6, 7],
        // -X
        [0, 2, 4],
        [2, 6, 4],
        // -Y
        [0, 1, 2],
        [1, 3, 2],
        // +X
        [1, 5, 7],
        [1, 7, 3],
        // +Z
        [2, 3, 7],
        [2, 7, 6],
        // -Z
        [0, 4, 1],
        [1, 4, 5],
    ];

    Ok(TriangleMesh::new(vertices, triangles))
}
