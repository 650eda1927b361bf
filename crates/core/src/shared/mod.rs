pub mod constants;
pub mod raster;
pub mod region;
pub mod settings;
