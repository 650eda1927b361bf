pub mod pixelate_error;
pub mod region_pixelator;
