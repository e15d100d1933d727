//! Geometry support for the photomesh pipeline stage.
//!
//! This crate provides the small set of mesh operations the pipeline needs
//! when it has to generate a model itself:
//!
//! - [`TriangleMesh`]: indexed triangles with optional per-vertex normals,
//!   bounds, statistics and cleanup routines
//! - [`primitive`]: procedurally generated boxes
//! - [`io`]: OBJ and STL readers
//! - [`glb`]: a binary glTF 2.0 exporter and header reader
//!
//! # Examples
//!
//! ```no_run
//! use photomesh_geom::{glb, primitive};
//! use std::path::Path;
//!
//! let mut mesh = primitive::create_box(1.0, 0.3, 0.2)?;
//! mesh.compute_vertex_normals()?;
//! let written = glb::write_glb_file(&mesh, Path::new("box.glb"))?;
//! assert!(written);
//! # Ok::<(), photomesh_geom::GeometryError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod glb;
pub mod io;
pub mod mesh;
pub mod primitive;

pub use error::{GeometryError, Result};
pub use glb::{GlbHeader, write_glb, write_glb_file};
pub use io::{MeshFormat, read_triangle_mesh};
pub use mesh::{MeshStats, TriangleMesh};
pub use primitive::create_box;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
