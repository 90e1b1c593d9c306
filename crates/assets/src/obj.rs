use std::path::Path;

use crate::AssetError;

/// One interleaved mesh vertex: position, normal, texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side triangle mesh with 16-bit indices, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuMesh {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl CpuMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Load a triangulated OBJ. Materials are ignored; textures come from the
/// manifest, not from MTL files.
pub fn load_obj_mesh(path: &Path, name: &str) -> Result<CpuMesh, AssetError> {
    let input = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let load_opts = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj_buf(&mut input.as_bytes(), &load_opts, |_| {
        Ok((Vec::new(), Default::default()))
    })
    .map_err(|e| AssetError::ObjParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if models.is_empty() {
        return Err(AssetError::ObjParse {
            path: path.to_path_buf(),
            message: "no meshes in file".into(),
        });
    }

    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u16> = Vec::new();
    for m in models {
        let mesh = m.mesh;
        let vcount = mesh.positions.len() / 3;
        let start = vertices.len();
        for i in 0..vcount {
            let pos = [
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ];
            let nrm = if mesh.normals.len() >= 3 * (i + 1) {
                [
                    mesh.normals[3 * i],
                    mesh.normals[3 * i + 1],
                    mesh.normals[3 * i + 2],
                ]
            } else {
                // Fallback: all up
                [0.0, 1.0, 0.0]
            };
            // OBJ puts the UV origin bottom-left; the texture origin is top-left.
            let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                [mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(MeshVertex { pos, nrm, uv });
        }
        if mesh.indices.is_empty() {
            for i in 0..vcount {
                let idx = u16::try_from(start + i).map_err(|_| AssetError::IndexOverflow {
                    path: path.to_path_buf(),
                })?;
                indices.push(idx);
            }
        } else {
            for &idx in &mesh.indices {
                let vv = start + idx as usize;
                let idx = u16::try_from(vv).map_err(|_| AssetError::IndexOverflow {
                    path: path.to_path_buf(),
                })?;
                indices.push(idx);
            }
        }
    }

    Ok(CpuMesh {
        name: name.to_string(),
        vertices,
        indices,
    })
}
