use ndarray::{s, ArrayView3, ArrayViewMut3, Axis};

use crate::pixelation::domain::pixelate_error::PixelateError;
use crate::pixelation::domain::region_pixelator::RegionPixelator;
use crate::shared::raster::{Raster, CHANNELS};
use crate::shared::region::{PixelRect, Region};

/// Mosaic pixelator: each region is cut into `block_size` squares anchored
/// at the region's own top-left corner, and every square is flattened to the
/// floor-average of the original pixels it covers.
///
/// Blocks that cross the raster edge or the region's right/bottom edge are
/// partial; they average only the pixels they actually contain.
#[derive(Clone, Debug)]
pub struct BlockPixelator {
    block_size: u32,
}

impl BlockPixelator {
    pub fn new(block_size: u32) -> Result<Self, PixelateError> {
        validate_block_size(block_size)?;
        Ok(Self { block_size })
    }
}

impl RegionPixelator for BlockPixelator {
    fn pixelate(&self, raster: &Raster, regions: &[Region]) -> Result<Raster, PixelateError> {
        pixelate(raster, regions, self.block_size)
    }

    fn block_size(&self) -> u32 {
        self.block_size
    }
}

/// Returns a copy of `raster` with every region replaced by a block mosaic.
///
/// Regions are clipped to the raster; degenerate ones (non-finite, zero or
/// negative extent, fully outside) are skipped. All averages are taken from
/// `raster` itself, so overlapping or adjacent regions never see each
/// other's output. Where regions overlap, the later one wins.
pub fn pixelate(
    raster: &Raster,
    regions: &[Region],
    block_size: u32,
) -> Result<Raster, PixelateError> {
    if raster.is_empty() || !raster.is_consistent() {
        return Err(PixelateError::InvalidRaster {
            width: raster.width(),
            height: raster.height(),
        });
    }
    validate_block_size(block_size)?;

    let mut output = raster.clone();
    if block_size == 1 {
        return Ok(output);
    }

    let source = raster.as_ndarray();
    let mut target = output.as_ndarray_mut();
    let mut applied = 0usize;
    for region in regions {
        let Some(rect) = region.clamp_to(raster.width(), raster.height()) else {
            log::debug!("Skipping empty region {region:?}");
            continue;
        };
        pixelate_rect(
            &source,
            &mut target,
            rect,
            region.grid_origin(),
            block_size as usize,
        );
        applied += 1;
    }
    log::debug!(
        "Pixelated {applied}/{} regions (block_size={block_size})",
        regions.len()
    );

    Ok(output)
}

fn validate_block_size(block_size: u32) -> Result<(), PixelateError> {
    if block_size == 0 {
        return Err(PixelateError::InvalidParameter(format!(
            "block size must be at least 1, got {block_size}"
        )));
    }
    Ok(())
}

/// Block spans along one axis: the grid starts at `origin` (possibly off the
/// raster) and every cell is clipped to `[lo, hi)`.
fn block_spans(origin: i64, lo: usize, hi: usize, block: usize) -> Vec<(usize, usize)> {
    let step = block as i64;
    // First cell that reaches `lo`, without walking the off-raster part.
    let skipped = (lo as i64 - origin).max(0) / step;
    let mut start = origin + skipped * step;
    let mut spans = Vec::new();
    while start < hi as i64 {
        let a = start.max(lo as i64) as usize;
        let b = (start + step).min(hi as i64) as usize;
        if a < b {
            spans.push((a, b));
        }
        start += step;
    }
    spans
}

fn pixelate_rect(
    source: &ArrayView3<'_, u8>,
    target: &mut ArrayViewMut3<'_, u8>,
    rect: PixelRect,
    (origin_x, origin_y): (i64, i64),
    block: usize,
) {
    let columns = block_spans(origin_x, rect.x, rect.right(), block);
    for (y0, y1) in block_spans(origin_y, rect.y, rect.bottom(), block) {
        for &(x0, x1) in &columns {
            let color = block_average(source.slice(s![y0..y1, x0..x1, ..]));
            for (c, &value) in color.iter().enumerate() {
                target.slice_mut(s![y0..y1, x0..x1, c]).fill(value);
            }
        }
    }
}

/// Per-channel floor mean over a non-empty `(rows, cols, CHANNELS)` block.
fn block_average(block: ArrayView3<'_, u8>) -> [u8; CHANNELS] {
    let count = (block.len_of(Axis(0)) * block.len_of(Axis(1))) as u64;
    let mut color = [0u8; CHANNELS];
    for (c, slot) in color.iter_mut().enumerate() {
        let sum: u64 = block
            .index_axis(Axis(2), c)
            .iter()
            .map(|&v| u64::from(v))
            .sum();
        *slot = (sum / count) as u8;
    }
    color
}
