use serde::Serialize;

use crate::shared::geometry::Point;

/// A scored face box.
///
/// Coming out of a detector, `x`/`y` are the top-left corner in the raster
/// the detector saw and `angle` is 0. After the scanner has run, `x`/`y` are
/// in the canonical (unrotated) working raster and `angle` records the sweep
/// angle in radians that produced the box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
    pub angle: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
            angle: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Copy with the position replaced; size, score and angle are kept.
    pub fn with_position(&self, position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..*self
        }
    }

    pub fn with_angle(&self, angle: f64) -> Self {
        Self { angle, ..*self }
    }

    /// Scales geometry by `factor`, e.g. from working raster to source pixels.
    /// Confidence and angle are unaffected.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
            ..*self
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn iou(&self, other: &Rectangle) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}
