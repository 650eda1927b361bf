use crate::pipeline::region_filter::is_usable;
use crate::pixelation::domain::pixelate_error::PixelateError;
use crate::pixelation::domain::region_pixelator::RegionPixelator;
use crate::pixelation::infrastructure::block_pixelator::BlockPixelator;
use crate::shared::raster::Raster;
use crate::shared::region::Region;

/// Stable handle for a region inside a [`RedactionSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(u32);

/// Editing state of the redaction tool: one base image, a live list of
/// regions, and a single block size shared by all of them.
///
/// Every [`render`](Self::render) recomputes the preview from the untouched
/// base raster, so edits never compound.
pub struct RedactionSession {
    base: Raster,
    regions: Vec<(RegionId, Region)>,
    pixelator: BlockPixelator,
    min_region_size: f64,
    next_id: u32,
}

impl RedactionSession {
    pub fn new(base: Raster, block_size: u32, min_region_size: f64) -> Result<Self, PixelateError> {
        if base.is_empty() {
            return Err(PixelateError::InvalidRaster {
                width: base.width(),
                height: base.height(),
            });
        }
        Ok(Self {
            base,
            regions: Vec::new(),
            pixelator: BlockPixelator::new(block_size)?,
            min_region_size,
            next_id: 0,
        })
    }

    pub fn base(&self) -> &Raster {
        &self.base
    }

    pub fn block_size(&self) -> u32 {
        self.pixelator.block_size()
    }

    /// Regions in drawing order.
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions.iter().map(|(id, r)| (*id, r))
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|(rid, _)| *rid == id).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Adds a drawn region. Selections not larger than the minimum size on
    /// both axes are discarded and yield `None`.
    pub fn add_region(&mut self, region: Region) -> Option<RegionId> {
        if !is_usable(&region, self.min_region_size) {
            log::debug!("Discarding undersized region {region:?}");
            return None;
        }
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.push((id, region));
        Some(id)
    }

    /// Drags a region by `(dx, dy)`. Returns `false` for unknown ids.
    pub fn move_region(&mut self, id: RegionId, dx: f64, dy: f64) -> bool {
        self.update(id, |r| r.translated(dx, dy))
    }

    /// Resizes a region from its top-left corner. The new extent never drops
    /// below the usable minimum.
    pub fn resize_region(&mut self, id: RegionId, width: f64, height: f64) -> bool {
        let floor = self.min_region_size + 1.0;
        self.update(id, |r| r.resized(width.max(floor), height.max(floor)))
    }

    pub fn remove_region(&mut self, id: RegionId) -> bool {
        let before = self.regions.len();
        self.regions.retain(|(rid, _)| *rid != id);
        self.regions.len() != before
    }

    pub fn clear_regions(&mut self) {
        self.regions.clear();
    }

    /// Changes the block size for every region.
    pub fn set_block_size(&mut self, block_size: u32) -> Result<(), PixelateError> {
        self.pixelator = BlockPixelator::new(block_size)?;
        Ok(())
    }

    /// Loads a new image. Existing regions belong to the old image and are
    /// dropped.
    pub fn replace_base(&mut self, base: Raster) -> Result<(), PixelateError> {
        if base.is_empty() {
            return Err(PixelateError::InvalidRaster {
                width: base.width(),
                height: base.height(),
            });
        }
        self.base = base;
        self.regions.clear();
        Ok(())
    }

    /// Pixelates all current regions over the base image.
    pub fn render(&self) -> Result<Raster, PixelateError> {
        let regions: Vec<Region> = self.regions.iter().map(|(_, r)| *r).collect();
        self.pixelator.pixelate(&self.base, &regions)
    }

    fn update(&mut self, id: RegionId, f: impl FnOnce(&Region) -> Region) -> bool {
        match self.regions.iter_mut().find(|(rid, _)| *rid == id) {
            Some((_, region)) => {
                *region = f(region);
                true
            }
            None => false,
        }
    }
}
