use ndarray::{ArrayView3, ArrayViewMut3};

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A decoded image: contiguous RGBA8 bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the pixelation layer
/// sees nothing but this buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Raster {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 4"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Builds a raster where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; CHANNELS]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * CHANNELS)
            .collect();
        Self::new(data, width, height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the raster has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Buffer length matches `width * height * 4`. Only checked in debug
    /// builds at construction, so consumers re-check before indexing.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * CHANNELS
    }

    /// Returns the RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; CHANNELS]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        let mut px = [0u8; CHANNELS];
        px.copy_from_slice(&self.data[idx..idx + CHANNELS]);
        Some(px)
    }

    /// Writes `rgba` at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; CHANNELS]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.offset(x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgba);
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Raster data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Raster data length must match dimensions")
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
