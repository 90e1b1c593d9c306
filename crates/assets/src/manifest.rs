use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::AssetError;

/// File name the store looks for inside an asset directory.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Mesh,
    Texture,
}

/// One manifest line: a logical name, what it is, and where it lives
/// relative to the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub kind: AssetKind,
    pub path: String,
    /// Sample with nearest-neighbor filtering (pixel-art look). Textures only.
    #[serde(default)]
    pub nearest: bool,
    /// Tile outside the 0..1 UV range instead of clamping. Textures only.
    #[serde(default)]
    pub repeat: bool,
}

/// The list of everything the demo loads at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub assets: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| AssetError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_entries_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"assets": [
                {{"name": "hull", "kind": "mesh", "path": "models/hull.obj"}},
                {{"name": "hull", "kind": "texture", "path": "textures/hull.png", "nearest": true}}
            ]}}"#
        )
        .unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.assets.len(), 2);
        assert_eq!(manifest.assets[0].kind, AssetKind::Mesh);
        assert!(!manifest.assets[0].nearest);
        assert!(manifest.assets[1].nearest);
        assert!(!manifest.assets[1].repeat);
    }

    #[test]
    fn bad_json_reports_the_manifest_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Manifest::load(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::ManifestParse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }
}
