use std::path::Path;

use crate::AssetError;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Decode an image file. The format is detected from the file contents.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_bytes(path, &bytes)?;
        tracing::debug!(
            path = %path.display(),
            width = texture.width,
            height = texture.height,
            "loaded texture"
        );
        Ok(texture)
    }

    /// Decode an in-memory image. `origin` is only used for error reporting.
    pub fn from_bytes(origin: impl AsRef<Path>, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes).map_err(|source| AssetError::Image {
            path: origin.as_ref().to_path_buf(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Bytes per row of the RGBA8 data.
    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // 2x2 binary PPM: red, green / blue, white.
    fn ppm_2x2() -> Vec<u8> {
        let mut bytes = b"P6\n2 2\n255\n".to_vec();
        bytes.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]);
        bytes
    }

    #[test]
    fn decode_ppm_to_rgba() {
        let tex = TextureData::from_bytes("mem.ppm", &ppm_2x2()).unwrap();
        assert_eq!((tex.width, tex.height), (2, 2));
        assert_eq!(tex.rgba.len(), 16);
        assert_eq!(&tex.rgba[0..4], &[255, 0, 0, 255]);
        assert_eq!(&tex.rgba[12..16], &[255, 255, 255, 255]);
        assert_eq!(tex.bytes_per_row(), 8);
    }

    #[test]
    fn garbage_is_an_image_error() {
        let err = TextureData::from_bytes("junk.bin", b"definitely not an image").unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::Builder::new().suffix(".ppm").tempfile().unwrap();
        tmp.write_all(&ppm_2x2()).unwrap();
        let tex = TextureData::load(tmp.path()).unwrap();
        assert_eq!(tex.width, 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TextureData::load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
