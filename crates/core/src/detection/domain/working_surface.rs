use crate::shared::geometry::FrameCenter;
use crate::shared::rectangle::Rectangle;

/// Geometry of the downscaled raster the detector runs on.
///
/// Derived once per source size: the working raster keeps the source aspect
/// ratio with its longest side at `max_work_size`, and every rotation of the
/// sweep pivots about its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkingSurface {
    source_width: u32,
    source_height: u32,
    width: u32,
    height: u32,
}

impl WorkingSurface {
    pub fn new(source_width: u32, source_height: u32, max_work_size: u32) -> Self {
        let scale = f64::min(
            max_work_size as f64 / source_width.max(1) as f64,
            max_work_size as f64 / source_height.max(1) as f64,
        );
        let width = ((source_width as f64 * scale) as u32).max(1);
        let height = ((source_height as f64 * scale) as u32).max(1);
        Self {
            source_width,
            source_height,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    /// True when the source can be scanned without resampling.
    pub fn matches_source(&self) -> bool {
        self.width == self.source_width && self.height == self.source_height
    }

    pub fn center(&self) -> FrameCenter {
        FrameCenter::of_surface(self.width, self.height)
    }

    /// Factor from working-raster units to source pixels.
    pub fn display_scale(&self) -> f64 {
        self.source_width as f64 / self.width as f64
    }

    pub fn to_source(&self, rect: &Rectangle) -> Rectangle {
        rect.scaled(self.display_scale())
    }
}
