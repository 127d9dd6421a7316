use crate::shared::frame::Frame;
use crate::shared::rectangle::Rectangle;

/// Domain interface for a single-orientation (upright) face detector.
///
/// Returns rectangles in the coordinate space of the raster it was given,
/// with `angle` left at 0 and `confidence` already assigned. No ordering
/// is guaranteed. Implementations may keep per-call state, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>>;
}
