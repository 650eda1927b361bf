use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("invalid region '{0}': expected x,y,width,height")]
    Parse(String),
    #[error("failed to read regions file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed regions file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// A user-selected rectangle to obscure, in raster pixel coordinates.
///
/// Coordinates come straight from the selection layer and may be fractional,
/// negative, or extend past the raster; [`Region::clamp_to`] turns them into
/// the integer rectangle that is actually processed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer rectangle fully inside a raster. Never empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Non-finite geometry or a non-positive extent.
    pub fn is_degenerate(&self) -> bool {
        ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Clips the region to `[0, raster_width) x [0, raster_height)`.
    ///
    /// Edges are rounded to the nearest pixel boundary. Returns `None` for
    /// degenerate regions and for regions that fall entirely outside.
    pub fn clamp_to(&self, raster_width: u32, raster_height: u32) -> Option<PixelRect> {
        if self.is_degenerate() {
            return None;
        }
        let (x0, x1) = clamp_span(self.x, self.width, raster_width);
        let (y0, y1) = clamp_span(self.y, self.height, raster_height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Top-left corner rounded to the pixel grid, before any clipping.
    ///
    /// This is where a region's block grid is anchored, even when the corner
    /// lies outside the raster.
    pub fn grid_origin(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn resized(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..*self
        }
    }

    /// Loads a JSON array of `{x, y, width, height}` objects.
    pub fn load_all(path: &Path) -> Result<Vec<Region>, RegionError> {
        let json = fs::read_to_string(path).map_err(|source| RegionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| RegionError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}

fn clamp_span(start: f64, extent: f64, limit: u32) -> (usize, usize) {
    let limit = limit as f64;
    let lo = start.round().clamp(0.0, limit);
    let hi = (start + extent).round().clamp(0.0, limit);
    (lo as usize, hi as usize)
}

/// Parses `"x,y,width,height"`.
impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| RegionError::Parse(s.to_string()))?;
        match parts.as_slice() {
            [x, y, w, h] => Ok(Region::new(*x, *y, *w, *h)),
            _ => Err(RegionError::Parse(s.to_string())),
        }
    }
}
