//! Indexed triangle mesh and the in-place operations the pipeline applies to it

use crate::error::{GeometryError, Result};
use glam::{Mat3, Vec3};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// An indexed triangle mesh
///
/// `normals` is either empty or holds exactly one entry per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Counter-clockwise vertex indices, one entry per triangle
    pub triangles: Vec<[u32; 3]>,
    /// Per-vertex normals
    pub normals: Vec<Vec3>,
}

/// Summary statistics of a mesh, as reported in the metadata sidecar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub bbox_min: [f32; 3],
    pub bbox_max: [f32; 3],
    pub bbox_size: [f32; 3],
}

impl TriangleMesh {
    /// Create a mesh without normals
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            normals: Vec::new(),
        }
    }

    pub fn has_triangles(&self) -> bool {
        !self.vertices.is_empty() && !self.triangles.is_empty()
    }

    pub fn has_vertex_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.vertices.len()
    }

    /// Component-wise minimum of all vertices, or zero for an empty mesh
    pub fn min_bound(&self) -> Vec3 {
        self.vertices
            .iter()
            .copied()
            .reduce(Vec3::min)
            .unwrap_or(Vec3::ZERO)
    }

    /// Component-wise maximum of all vertices, or zero for an empty mesh
    pub fn max_bound(&self) -> Vec3 {
        self.vertices
            .iter()
            .copied()
            .reduce(Vec3::max)
            .unwrap_or(Vec3::ZERO)
    }

    /// Mean of all vertex positions
    pub fn center(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec3>() / self.vertices.len() as f32
    }

    pub fn stats(&self) -> MeshStats {
        let min = self.min_bound();
        let max = self.max_bound();
        MeshStats {
            vertex_count: self.vertices.len(),
            triangle_count: self.triangles.len(),
            bbox_min: min.to_array(),
            bbox_max: max.to_array(),
            bbox_size: (max - min).to_array(),
        }
    }

    /// Check that every triangle index refers to an existing vertex
    pub fn validate_indices(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (triangle, indices) in self.triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Compute smooth per-vertex normals from the unit face normals
    ///
    /// Degenerate faces contribute nothing. Vertices not referenced by any
    /// face end up with a zero normal.
    pub fn compute_vertex_normals(&mut self) -> Result<()> {
        if !self.has_triangles() {
            return Err(GeometryError::EmptyMesh);
        }
        self.validate_indices()?;

        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for &[a, b, c] in &self.triangles {
            let (pa, pb, pc) = (
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            );
            let face = (pb - pa).cross(pc - pa).normalize_or_zero();
            normals[a as usize] += face;
            normals[b as usize] += face;
            normals[c as usize] += face;
        }
        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = normals;
        Ok(())
    }

    /// Merge vertices with bit-identical positions, returning how many were removed
    pub fn remove_duplicated_vertices(&mut self) -> usize {
        let keep_normals = self.has_vertex_normals();
        let mut seen: HashMap<[u32; 3], u32> = HashMap::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut normals = Vec::new();

        for (i, v) in self.vertices.iter().enumerate() {
            let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
            let next = vertices.len() as u32;
            let index = *seen.entry(key).or_insert_with(|| {
                vertices.push(*v);
                if keep_normals {
                    normals.push(self.normals[i]);
                }
                next
            });
            remap.push(index);
        }

        let removed = self.vertices.len() - vertices.len();
        self.remap_triangles(&remap);
        self.vertices = vertices;
        self.normals = normals;
        removed
    }

    /// Drop triangles that reference the same vertex more than once
    pub fn remove_degenerate_triangles(&mut self) -> usize {
        let before = self.triangles.len();
        self.triangles
            .retain(|&[a, b, c]| a != b && b != c && a != c);
        before - self.triangles.len()
    }

    /// Drop triangles that repeat the vertex set of an earlier triangle, in any order
    pub fn remove_duplicated_triangles(&mut self) -> usize {
        let before = self.triangles.len();
        let mut seen = HashSet::with_capacity(before);
        self.triangles.retain(|tri| {
            let mut key = *tri;
            key.sort_unstable();
            seen.insert(key)
        });
        before - self.triangles.len()
    }

    /// Drop vertices that no triangle references
    pub fn remove_unreferenced_vertices(&mut self) -> usize {
        let mut referenced = vec![false; self.vertices.len()];
        for &index in self.triangles.iter().flatten() {
            if let Some(slot) = referenced.get_mut(index as usize) {
                *slot = true;
            }
        }

        let keep_normals = self.has_vertex_normals();
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        for (i, used) in referenced.iter().enumerate() {
            if *used {
                remap[i] = vertices.len() as u32;
                vertices.push(self.vertices[i]);
                if keep_normals {
                    normals.push(self.normals[i]);
                }
            }
        }

        let removed = self.vertices.len() - vertices.len();
        self.remap_triangles(&remap);
        self.vertices = vertices;
        self.normals = normals;
        removed
    }

    /// Drop triangles until no edge is shared by more than two of them
    ///
    /// Around each over-shared edge the largest two triangles survive.
    /// Returns the number of triangles removed.
    pub fn remove_non_manifold_edges(&mut self) -> usize {
        let mut edges: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (t, &[a, b, c]) in self.triangles.iter().enumerate() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                edges.entry((u.min(v), u.max(v))).or_default().push(t);
            }
        }

        let mut doomed: HashSet<usize> = HashSet::new();
        for faces in edges.values() {
            let mut live: Vec<usize> = faces
                .iter()
                .copied()
                .filter(|t| !doomed.contains(t))
                .collect();
            if live.len() > 2 {
                live.sort_by(|&x, &y| self.triangle_area(x).total_cmp(&self.triangle_area(y)));
                doomed.extend(&live[..live.len() - 2]);
            }
        }

        let mut index = 0;
        self.triangles.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        doomed.len()
    }

    /// Rotate vertices and normals about the origin
    pub fn rotate(&mut self, rotation: Mat3) {
        for v in &mut self.vertices {
            *v = rotation * *v;
        }
        for n in &mut self.normals {
            *n = rotation * *n;
        }
    }

    /// Rotate about the Y axis through the origin, counter-clockwise seen from +Y
    pub fn rotate_y(&mut self, radians: f32) {
        self.rotate(Mat3::from_rotation_y(radians));
    }

    /// Scale the mesh to a unit maximum extent and move its center to the origin
    pub fn normalize(&mut self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(GeometryError::EmptyMesh);
        }

        let extent = (self.max_bound() - self.min_bound()).max_element();
        let center = self.center();
        if extent > 0.0 {
            let factor = extent.recip();
            for v in &mut self.vertices {
                *v = (*v - center) * factor + center;
            }
        }

        let center = self.center();
        for v in &mut self.vertices {
            *v -= center;
        }
        Ok(())
    }

    fn triangle_area(&self, triangle: usize) -> f32 {
        let corner = |i: u32| self.vertices.get(i as usize).copied().unwrap_or(Vec3::ZERO);
        let [a, b, c] = self.triangles[triangle];
        let (pa, pb, pc) = (corner(a), corner(b), corner(c));
        0.5 * (pb - pa).cross(pc - pa).length()
    }

    fn remap_triangles(&mut self, remap: &[u32]) {
        for tri in &mut self.triangles {
            for index in tri.iter_mut() {
                if let Some(&mapped) = remap.get(*index as usize) {
                    *index = mapped;
                }
            }
        }
    }
}
