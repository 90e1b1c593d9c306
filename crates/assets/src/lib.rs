//! Asset loading for the skiff demo: a JSON manifest names every mesh and
//! texture, loaders pull them off disk, and a content-addressed store hands
//! out stable ids.
//!
//! The renderer consumes assets by handle or logical name, never by raw
//! file path.
//!
//! # Invariants
//! - Loading is all-or-nothing: the first failure aborts with the path that
//!   caused it, so a half-loaded scene never reaches the renderer.
//! - Ids are content hashes; identical data always maps to the same id.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod manifest;
mod obj;
mod store;
mod texture;

pub use manifest::{AssetKind, Manifest, ManifestEntry, MANIFEST_FILE};
pub use obj::{load_obj_mesh, CpuMesh, MeshVertex};
pub use store::AssetStore;
pub use texture::{load_texture, TextureData};

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Errors from asset operations. Every variant names the file it came from.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("manifest {} is not valid JSON: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse OBJ {}: {message}", .path.display())]
    ObjParse { path: PathBuf, message: String },
    #[error("OBJ {} has too many vertices for 16-bit indices", .path.display())]
    IndexOverflow { path: PathBuf },
    #[error("failed to decode texture {}: {source}", .path.display())]
    TextureDecode {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub fn crate_info() -> &'static str {
    "skiff-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }

    #[test]
    fn errors_name_the_offending_file() {
        let err = AssetError::ObjParse {
            path: PathBuf::from("models/hull.obj"),
            message: "truncated face".into(),
        };
        assert!(err.to_string().contains("hull.obj"));
    }
}
