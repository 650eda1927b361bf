use std::path::Path;

use crate::shared::raster::Raster;

/// Encodes a raster to an image file; the format follows the path extension.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, raster: &Raster) -> Result<(), Box<dyn std::error::Error>>;
}
