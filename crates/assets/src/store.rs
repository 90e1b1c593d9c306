use std::collections::BTreeMap;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::manifest::{AssetKind, Manifest, MANIFEST_FILE};
use crate::obj::{load_obj_mesh, CpuMesh};
use crate::texture::{load_texture, TextureData};
use crate::{AssetError, AssetId};

/// Content-addressed registry of everything loaded from the manifest.
///
/// Ids are hashes of the asset data, so re-registering identical content is
/// a no-op. Logical names from the manifest resolve per kind, which lets a
/// mesh and its texture share a name.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    meshes: BTreeMap<AssetId, CpuMesh>,
    textures: BTreeMap<AssetId, TextureData>,
    mesh_names: BTreeMap<String, AssetId>,
    texture_names: BTreeMap<String, AssetId>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every manifest entry from `dir`, in manifest order, failing on
    /// the first broken asset.
    pub fn load_manifest(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let manifest = Manifest::load(dir.join(MANIFEST_FILE))?;
        let total = manifest.assets.len();
        let mut store = Self::new();
        for (i, entry) in manifest.assets.iter().enumerate() {
            let path = dir.join(&entry.path);
            match entry.kind {
                AssetKind::Mesh => {
                    let mesh = load_obj_mesh(&path, &entry.name)?;
                    store.register_mesh(mesh);
                }
                AssetKind::Texture => {
                    let texture = load_texture(&path, &entry.name, entry.nearest, entry.repeat)?;
                    store.register_texture(texture);
                }
            }
            let done = i + 1;
            tracing::info!(
                asset = %entry.name,
                "loaded {done}/{total} ({}%)",
                done * 100 / total.max(1)
            );
        }
        Ok(store)
    }

    /// Register a mesh and return its content-addressed ID.
    pub fn register_mesh(&mut self, mesh: CpuMesh) -> AssetId {
        let id = mesh_hash(&mesh);
        self.mesh_names.insert(mesh.name.clone(), id);
        self.meshes.insert(id, mesh);
        id
    }

    /// Register a texture and return its content-addressed ID.
    pub fn register_texture(&mut self, texture: TextureData) -> AssetId {
        let id = texture_hash(&texture);
        self.texture_names.insert(texture.name.clone(), id);
        self.textures.insert(id, texture);
        id
    }

    pub fn mesh_id(&self, name: &str) -> Option<AssetId> {
        self.mesh_names.get(name).copied()
    }

    pub fn texture_id(&self, name: &str) -> Option<AssetId> {
        self.texture_names.get(name).copied()
    }

    pub fn get_mesh(&self, id: AssetId) -> Option<&CpuMesh> {
        self.meshes.get(&id)
    }

    pub fn get_texture(&self, id: AssetId) -> Option<&TextureData> {
        self.textures.get(&id)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (AssetId, &CpuMesh)> {
        self.meshes.iter().map(|(id, m)| (*id, m))
    }

    pub fn textures(&self) -> impl Iterator<Item = (AssetId, &TextureData)> {
        self.textures.iter().map(|(id, t)| (*id, t))
    }

    pub fn len(&self) -> usize {
        self.meshes.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.textures.is_empty()
    }
}

fn mesh_hash(mesh: &CpuMesh) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(mesh.name.as_bytes());
    for v in &mesh.vertices {
        for f in v.pos.iter().chain(v.nrm.iter()).chain(v.uv.iter()) {
            hasher.update(f.to_le_bytes());
        }
    }
    for idx in &mesh.indices {
        hasher.update(idx.to_le_bytes());
    }
    truncate_hash(hasher)
}

fn texture_hash(texture: &TextureData) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(texture.name.as_bytes());
    hasher.update(texture.width.to_le_bytes());
    hasher.update(texture.height.to_le_bytes());
    hasher.update(&texture.pixels);
    truncate_hash(hasher)
}

fn truncate_hash(hasher: Sha256) -> AssetId {
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}
