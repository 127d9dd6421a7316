use crate::shared::frame::Frame;
use crate::shared::geometry::FrameCenter;

/// Produces a view of a raster rotated about a pivot.
///
/// The result has the same dimensions as the input. A point with bearing
/// `θ` about `center` in the input appears at bearing `θ + angle` in the
/// view, which is the convention `coordinate_transformer::to_canonical`
/// inverts. Out-of-bounds pixels are filled at the implementation's choice.
pub trait RotatedViewProvider: Send {
    fn rotate(
        &self,
        frame: &Frame,
        angle: f64,
        center: FrameCenter,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
