pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Edge length, in source pixels, of each averaging block.
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// Regions must be strictly larger than this on both axes to be applied.
pub const MIN_REGION_SIZE: u32 = 10;

pub const SETTINGS_DIR_NAME: &str = "Pixelmask";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
