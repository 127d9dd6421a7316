/// Longest side of the working raster handed to the detector.
pub const DEFAULT_MAX_WORK_SIZE: u32 = 160;

/// Upper bound on `max_work_size`; sources are upscaled to it.
pub const MAX_WORK_SIZE_LIMIT: u32 = 4096;

/// Total angular sweep in radians (`-0.5 ..= 0.5`).
pub const DEFAULT_ROTATION_RANGE: f64 = 1.0;

/// Increment between scanned angles in radians.
pub const DEFAULT_ROTATION_STEP: f64 = 0.5;

/// Most angles one sweep may scan; each costs a rotation and a detector run.
pub const MAX_ROTATION_ANGLES: usize = 1024;

/// Hysteresis sensitivity in working-raster pixels.
pub const DEFAULT_RECT_CHANGE_THRESHOLD: f64 = 4.0;

pub const DEFAULT_TOP_N: usize = 1;

/// Gray level for pixels a rotation pulls in from outside the source.
pub const ROTATION_FILL: u8 = 0;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
