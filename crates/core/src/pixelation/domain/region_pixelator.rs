use crate::shared::raster::Raster;
use crate::shared::region::Region;

use super::pixelate_error::PixelateError;

/// Domain interface for obscuring regions of a raster with a block mosaic.
///
/// Implementations never mutate their input: every region is averaged from
/// the original pixels and written into a fresh output raster.
pub trait RegionPixelator: Send {
    fn pixelate(&self, raster: &Raster, regions: &[Region]) -> Result<Raster, PixelateError>;

    fn block_size(&self) -> u32;
}
