//! STL reader (ASCII and binary)
//!
//! STL stores each facet with its own three corners, so the resulting mesh
//! has `3 * facets` vertices. Run [`TriangleMesh::remove_duplicated_vertices`]
//! to weld them.

use crate::error::{GeometryError, Result};
use crate::mesh::TriangleMesh;
use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;
use std::io::{Cursor, Read};

/// Binary STL header size (free-form text)
pub const STL_HEADER_SIZE: usize = 80;

/// Size of one binary facet record: normal + 3 corners + attribute word
pub const STL_FACET_SIZE: usize = 50;

/// Parse STL bytes, detecting the binary or ASCII flavour
pub fn read_stl(data: &[u8]) -> Result<TriangleMesh> {
    if is_binary(data) {
        read_binary(data)
    } else if data.trim_ascii_start().starts_with(b"solid") {
        read_ascii(data)
    } else {
        Err(GeometryError::parse("STL", "neither ASCII nor binary layout"))
    }
}

/// Binary files may also start with "solid", so trust the facet count instead
fn is_binary(data: &[u8]) -> bool {
    if data.len() < STL_HEADER_SIZE + 4 {
        return false;
    }
    let count = u32::from_le_bytes([
        data[STL_HEADER_SIZE],
        data[STL_HEADER_SIZE + 1],
        data[STL_HEADER_SIZE + 2],
        data[STL_HEADER_SIZE + 3],
    ]) as usize;
    count
        .checked_mul(STL_FACET_SIZE)
        .and_then(|n| n.checked_add(STL_HEADER_SIZE + 4))
        == Some(data.len())
}

fn read_binary(data: &[u8]) -> Result<TriangleMesh> {
    let mut reader = Cursor::new(data);
    let mut header = [0u8; STL_HEADER_SIZE];
    reader.read_exact(&mut header)?;
    let count = reader.read_u32::<LittleEndian>()? as usize;

    let mut mesh = TriangleMesh::default();
    mesh.vertices.reserve(count * 3);
    mesh.triangles.reserve(count);
    for _ in 0..count {
        // Facet normals are recomputed later; skip the stored one
        read_vec3(&mut reader)?;
        let base = mesh.vertices.len() as u32;
        for _ in 0..3 {
            mesh.vertices.push(read_vec3(&mut reader)?);
        }
        let _attribute = reader.read_u16::<LittleEndian>()?;
        mesh.triangles.push([base, base + 1, base + 2]);
    }
    Ok(mesh)
}

fn read_vec3(reader: &mut impl Read) -> Result<Vec3> {
    Ok(Vec3::new(
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
    ))
}

fn read_ascii(data: &[u8]) -> Result<TriangleMesh> {
    let text =
        std::str::from_utf8(data).map_err(|e| GeometryError::parse("STL", e.to_string()))?;

    let mut mesh = TriangleMesh::default();
    let mut corners: Vec<Vec3> = Vec::with_capacity(3);
    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("vertex") => {
                let mut coords = [0.0f32; 3];
                for coord in &mut coords {
                    *coord = tokens
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| {
                            GeometryError::parse("STL", format!("bad vertex on line {}", line_no + 1))
                        })?;
                }
                corners.push(Vec3::from_array(coords));
            }
            Some("endloop") => {
                if corners.len() != 3 {
                    return Err(GeometryError::parse(
                        "STL",
                        format!(
                            "facet ending on line {} has {} vertices",
                            line_no + 1,
                            corners.len()
                        ),
                    ));
                }
                let base = mesh.vertices.len() as u32;
                mesh.vertices.append(&mut corners);
                mesh.triangles.push([base, base + 1, base + 2]);
            }
            _ => {}
        }
    }

    if mesh.triangles.is_empty() {
        return Err(GeometryError::parse("STL", "no facets found"));
    }
    Ok(mesh)
}
