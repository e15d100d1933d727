//! GLB (binary glTF 2.0) exporter
//!
//! A GLB file is a 12-byte header followed by two chunks:
//!
//! ```text
//! +--------+---------+--------+   +--------+--------+------------+   +--------+--------+-----------+
//! | "glTF" | version | length |   | length | "JSON" | json bytes |   | length | "BIN\0"| bin bytes |
//! +--------+---------+--------+   +--------+--------+------------+   +--------+--------+-----------+
//! ```
//!
//! The JSON chunk is padded with spaces and the BIN chunk with zeros so that
//! every chunk starts on a 4-byte boundary.

use crate::error::{GeometryError, Result};
use crate::mesh::TriangleMesh;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// GLB file magic
pub const GLB_MAGIC: [u8; 4] = *b"glTF";

/// The only container version defined by glTF 2.0
pub const GLB_VERSION: u32 = 2;

/// Header size (magic + version + length)
pub const GLB_HEADER_SIZE: usize = 12;

/// Chunk header size (length + type)
pub const CHUNK_HEADER_SIZE: usize = 8;

const CHUNK_JSON: [u8; 4] = *b"JSON";
const CHUNK_BIN: [u8; 4] = *b"BIN\0";

const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

/// Parsed GLB file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbHeader {
    pub version: u32,
    /// Total file length in bytes, header included
    pub length: u32,
}

impl GlbHeader {
    /// Read and validate a GLB header
    pub fn read(reader: &mut impl Read) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != GLB_MAGIC {
            return Err(GeometryError::InvalidMagic {
                expected: GLB_MAGIC,
                found: magic,
            });
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != GLB_VERSION {
            return Err(GeometryError::UnsupportedVersion(version));
        }
        let length = reader.read_u32::<LittleEndian>()?;
        Ok(Self { version, length })
    }

    pub fn write(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(&GLB_MAGIC)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u32::<LittleEndian>(self.length)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct Document {
    asset: Asset,
    scene: usize,
    scenes: Vec<Scene>,
    nodes: Vec<Node>,
    meshes: Vec<MeshEntry>,
    buffers: Vec<Buffer>,
    #[serde(rename = "bufferViews")]
    buffer_views: Vec<BufferView>,
    accessors: Vec<Accessor>,
}

#[derive(Serialize)]
struct Asset {
    version: &'static str,
    generator: String,
}

#[derive(Serialize)]
struct Scene {
    nodes: Vec<usize>,
}

#[derive(Serialize)]
struct Node {
    mesh: usize,
}

#[derive(Serialize)]
struct MeshEntry {
    primitives: Vec<Primitive>,
}

#[derive(Serialize)]
struct Primitive {
    attributes: BTreeMap<&'static str, usize>,
    indices: usize,
    mode: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    byte_length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    target: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    buffer_view: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<[f32; 3]>,
}

/// Accumulates the BIN chunk and the views/accessors describing it
#[derive(Default)]
struct BinBuilder {
    data: Vec<u8>,
    views: Vec<BufferView>,
    accessors: Vec<Accessor>,
}

impl BinBuilder {
    fn push_vec3(&mut self, values: &[Vec3], with_bounds: bool) -> Result<usize> {
        let offset = self.data.len();
        for v in values {
            self.data.write_f32::<LittleEndian>(v.x)?;
            self.data.write_f32::<LittleEndian>(v.y)?;
            self.data.write_f32::<LittleEndian>(v.z)?;
        }
        let (min, max) = if with_bounds {
            let min = values.iter().copied().reduce(Vec3::min).unwrap_or(Vec3::ZERO);
            let max = values.iter().copied().reduce(Vec3::max).unwrap_or(Vec3::ZERO);
            (Some(min.to_array()), Some(max.to_array()))
        } else {
            (None, None)
        };
        Ok(self.finish_view(offset, TARGET_ARRAY_BUFFER, Accessor {
            buffer_view: 0,
            component_type: COMPONENT_FLOAT,
            count: values.len(),
            kind: "VEC3",
            min,
            max,
        }))
    }

    fn push_indices(&mut self, triangles: &[[u32; 3]]) -> Result<usize> {
        let offset = self.data.len();
        for &index in triangles.iter().flatten() {
            self.data.write_u32::<LittleEndian>(index)?;
        }
        Ok(self.finish_view(offset, TARGET_ELEMENT_ARRAY_BUFFER, Accessor {
            buffer_view: 0,
            component_type: COMPONENT_UNSIGNED_INT,
            count: triangles.len() * 3,
            kind: "SCALAR",
            min: None,
            max: None,
        }))
    }

    fn finish_view(&mut self, offset: usize, target: u32, mut accessor: Accessor) -> usize {
        accessor.buffer_view = self.views.len();
        self.views.push(BufferView {
            buffer: 0,
            byte_offset: offset,
            byte_length: self.data.len() - offset,
            target,
        });
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

fn to_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| GeometryError::TooLarge(len))
}

/// Serialize `mesh` as a single-node, single-primitive GLB
pub fn write_glb(mesh: &TriangleMesh, writer: &mut impl Write) -> Result<()> {
    if !mesh.has_triangles() {
        return Err(GeometryError::EmptyMesh);
    }
    mesh.validate_indices()?;

    let mut bin = BinBuilder::default();
    let mut attributes = BTreeMap::new();
    attributes.insert("POSITION", bin.push_vec3(&mesh.vertices, true)?);
    if mesh.has_vertex_normals() {
        attributes.insert("NORMAL", bin.push_vec3(&mesh.normals, false)?);
    }
    let indices = bin.push_indices(&mesh.triangles)?;

    let document = Document {
        asset: Asset {
            version: "2.0",
            generator: format!("photomesh-geom {}", crate::VERSION),
        },
        scene: 0,
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![Node { mesh: 0 }],
        meshes: vec![MeshEntry {
            primitives: vec![Primitive {
                attributes,
                indices,
                mode: MODE_TRIANGLES,
            }],
        }],
        buffers: vec![Buffer {
            byte_length: bin.data.len(),
        }],
        buffer_views: bin.views,
        accessors: bin.accessors,
    };

    let json = serde_json::to_vec(&document)?;
    let json_len = padded_len(json.len());
    let bin_len = padded_len(bin.data.len());
    let total = GLB_HEADER_SIZE + CHUNK_HEADER_SIZE * 2 + json_len + bin_len;

    GlbHeader {
        version: GLB_VERSION,
        length: to_u32(total)?,
    }
    .write(writer)?;

    writer.write_u32::<LittleEndian>(to_u32(json_len)?)?;
    writer.write_all(&CHUNK_JSON)?;
    writer.write_all(&json)?;
    writer.write_all(&b"   "[..json_len - json.len()])?;

    writer.write_u32::<LittleEndian>(to_u32(bin_len)?)?;
    writer.write_all(&CHUNK_BIN)?;
    writer.write_all(&bin.data)?;
    writer.write_all(&[0u8; 3][..bin_len - bin.data.len()])?;

    log::debug!(
        "GLB: {} vertices, {} triangles, {total} bytes",
        mesh.vertices.len(),
        mesh.triangles.len()
    );
    Ok(())
}

/// Export `mesh` to `path`
///
/// Returns `Ok(false)` without touching the file system when the mesh has no
/// triangles to write.
pub fn write_glb_file(mesh: &TriangleMesh, path: &Path) -> Result<bool> {
    if !mesh.has_triangles() {
        log::warn!("Mesh has no triangles, not writing {}", path.display());
        return Ok(false);
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_glb(mesh, &mut writer)?;
    writer.flush()?;
    Ok(true)
}
