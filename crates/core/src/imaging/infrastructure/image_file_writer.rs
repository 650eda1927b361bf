use std::path::Path;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::raster::Raster;

/// Encodes a raster with the `image` crate.
///
/// Formats without alpha support (JPEG) receive the RGB channels only.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn drops_alpha(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false)
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, raster: &Raster) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbaImage::from_raw(raster.width(), raster.height(), raster.data().to_vec())
            .ok_or("Failed to create image from raster data")?;

        if drops_alpha(path) {
            image::DynamicImage::ImageRgba8(img).to_rgb8().save(path)?;
        } else {
            img.save(path)?;
        }
        log::debug!("Encoded {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let raster = Raster::filled(100, 80, [50, 100, 200, 255]);
        ImageFileWriter::new().write(&path, &raster).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_png_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let raster = Raster::filled(50, 50, [50, 100, 200, 128]);
        ImageFileWriter::new().write(&path, &raster).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200, 128]);
    }

    #[test]
    fn test_jpeg_output_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let raster = Raster::filled(16, 16, [10, 20, 30, 255]);
        ImageFileWriter::new().write(&path, &raster).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (16, 16));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.png");
        ImageFileWriter::new()
            .write(&path, &Raster::filled(2, 2, [0, 0, 0, 255]))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_extension_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.unknownformat");
        assert!(ImageFileWriter::new()
            .write(&path, &Raster::filled(2, 2, [0, 0, 0, 255]))
            .is_err());
    }
}
