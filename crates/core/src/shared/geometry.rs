/// A 2D point in raster coordinates (x right, y down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pivot used for every rotation of a scan.
///
/// Always the geometric center of the working raster, so the forward
/// rotation and the inverse mapping agree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameCenter {
    pub origin_x: f64,
    pub origin_y: f64,
}

impl FrameCenter {
    pub fn new(origin_x: f64, origin_y: f64) -> Self {
        Self { origin_x, origin_y }
    }

    /// Half width, half height of a `width × height` surface.
    pub fn of_surface(width: u32, height: u32) -> Self {
        Self {
            origin_x: width as f64 / 2.0,
            origin_y: height as f64 / 2.0,
        }
    }
}
