//! Geometry engine seam used by the last fallback tier

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Mesh statistics reported under `measures` in the metadata sidecar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshMeasures {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
    pub bbox_size: [f32; 3],
}

/// Element counts removed by [`MeshHandle::clean`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub duplicated_vertices: usize,
    pub degenerate_triangles: usize,
    pub duplicated_triangles: usize,
    pub non_manifold_triangles: usize,
    pub unreferenced_vertices: usize,
}

/// A mesh owned by a [`GeometryEngine`]
pub trait MeshHandle {
    fn has_triangles(&self) -> bool;

    fn compute_vertex_normals(&mut self) -> Result<()>;

    /// Remove duplicated, degenerate and non-manifold elements
    fn clean(&mut self) -> Result<CleanupReport>;

    /// Scale to unit extent and center on the origin
    fn normalize(&mut self) -> Result<()>;

    /// Rotate about the Y axis through the origin
    fn rotate_y(&mut self, radians: f32) -> Result<()>;

    fn measures(&self) -> MeshMeasures;

    /// Write the mesh as GLB; `Ok(false)` means the exporter declined
    fn export_glb(&self, path: &Path) -> Result<bool>;
}

/// Loads or builds meshes
pub trait GeometryEngine {
    /// Read a non-container mesh file
    fn load_mesh(&self, path: &Path) -> Result<Box<dyn MeshHandle>>;

    /// Build a box spanning the origin to `(width, height, depth)`
    fn create_box(&self, width: f32, height: f32, depth: f32) -> Result<Box<dyn MeshHandle>>;
}

#[cfg(feature = "geometry")]
pub use self::native::NativeGeometry;

#[cfg(feature = "geometry")]
mod native {
    use super::{CleanupReport, GeometryEngine, MeshHandle, MeshMeasures};
    use anyhow::{Context, Result};
    use photomesh_geom::{TriangleMesh, create_box, glb, read_triangle_mesh};
    use std::path::Path;

    /// [`GeometryEngine`] backed by `photomesh-geom`
    pub struct NativeGeometry;

    impl GeometryEngine for NativeGeometry {
        fn load_mesh(&self, path: &Path) -> Result<Box<dyn MeshHandle>> {
            let mesh = read_triangle_mesh(path)
                .with_context(|| format!("Failed to read mesh: {}", path.display()))?;
            Ok(Box::new(mesh))
        }

        fn create_box(&self, width: f32, height: f32, depth: f32) -> Result<Box<dyn MeshHandle>> {
            Ok(Box::new(create_box(width, height, depth)?))
        }
    }

    impl MeshHandle for TriangleMesh {
        fn has_triangles(&self) -> bool {
            TriangleMesh::has_triangles(self)
        }

        fn compute_vertex_normals(&mut self) -> Result<()> {
            Ok(TriangleMesh::compute_vertex_normals(self)?)
        }

        fn clean(&mut self) -> Result<CleanupReport> {
            Ok(CleanupReport {
                duplicated_vertices: self.remove_duplicated_vertices(),
                degenerate_triangles: self.remove_degenerate_triangles(),
                duplicated_triangles: self.remove_duplicated_triangles(),
                non_manifold_triangles: self.remove_non_manifold_edges(),
                unreferenced_vertices: self.remove_unreferenced_vertices(),
            })
        }

        fn normalize(&mut self) -> Result<()> {
            Ok(TriangleMesh::normalize(self)?)
        }

        fn rotate_y(&mut self, radians: f32) -> Result<()> {
            TriangleMesh::rotate_y(self, radians);
            Ok(())
        }

        fn measures(&self) -> MeshMeasures {
            let stats = self.stats();
            MeshMeasures {
                vertex_count: stats.vertex_count,
                triangle_count: stats.triangle_count,
                bbox_min: stats.bbox_min,
                bbox_max: stats.bbox_max,
                bbox_size: stats.bbox_size,
            }
        }

        fn export_glb(&self, path: &Path) -> Result<bool> {
            glb::write_glb_file(self, path)
                .with_context(|| format!("Failed writing GLB: {}", path.display()))
        }
    }

}
