use crate::shared::region::Region;

/// Keeps regions large enough to be deliberate selections.
///
/// A region passes only when both its width and height are strictly greater
/// than `min_size`. Degenerate regions (non-finite or non-positive extent)
/// never pass, even with `min_size = 0`.
pub fn filter_usable_regions(regions: &[Region], min_size: f64) -> Vec<Region> {
    regions
        .iter()
        .filter(|r| is_usable(r, min_size))
        .copied()
        .collect()
}

pub fn is_usable(region: &Region, min_size: f64) -> bool {
    !region.is_degenerate() && region.width > min_size && region.height > min_size
}
