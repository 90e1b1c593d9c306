use std::path::Path;

use crate::AssetError;

/// Decoded RGBA8 texture plus its sampling hints from the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    pub nearest: bool,
    pub repeat: bool,
}

/// Decode an image file to RGBA8. Format is sniffed from the contents.
pub fn load_texture(
    path: &Path,
    name: &str,
    nearest: bool,
    repeat: bool,
) -> Result<TextureData, AssetError> {
    let image = image::open(path).map_err(|source| AssetError::TextureDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData {
        name: name.to_string(),
        width,
        height,
        pixels: rgba.into_raw(),
        nearest,
        repeat,
    })
}
