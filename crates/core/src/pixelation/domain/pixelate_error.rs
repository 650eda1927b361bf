use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelateError {
    #[error("invalid raster: {width}x{height} has no pixels")]
    InvalidRaster { width: u32, height: u32 },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
