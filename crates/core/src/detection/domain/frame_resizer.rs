use crate::shared::frame::Frame;

/// Scales a source frame down to the working raster size.
pub trait FrameResizer: Send {
    fn resize(
        &self,
        frame: &Frame,
        width: u32,
        height: u32,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
