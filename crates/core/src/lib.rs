//! Region pixelation for image redaction.
//!
//! The core transform lives in [`pixelation`]: given an RGBA [`shared::raster::Raster`],
//! a list of [`shared::region::Region`]s and a block size, every region is
//! replaced by a mosaic of floor-averaged blocks while everything else stays
//! byte-identical. [`imaging`] and [`pipeline`] wrap it with file I/O and the
//! editing state of an interactive redaction tool.

pub mod imaging;
pub mod pipeline;
pub mod pixelation;
pub mod shared;
