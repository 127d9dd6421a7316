use image::imageops::FilterType;

use crate::detection::domain::frame_resizer::FrameResizer;
use crate::shared::frame::Frame;

/// Resamples frames with the `image` crate.
pub struct ImageFrameResizer {
    filter: FilterType,
}

impl ImageFrameResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ImageFrameResizer {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl FrameResizer for ImageFrameResizer {
    fn resize(
        &self,
        frame: &Frame,
        width: u32,
        height: u32,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if frame.dimensions() == (width, height) {
            return Ok(frame.clone());
        }

        let data = frame.data().to_vec();
        let resized = match frame.channels() {
            1 => {
                let img = image::GrayImage::from_raw(frame.width(), frame.height(), data)
                    .ok_or("gray frame buffer does not match its dimensions")?;
                image::imageops::resize(&img, width, height, self.filter).into_raw()
            }
            3 => {
                let img = image::RgbImage::from_raw(frame.width(), frame.height(), data)
                    .ok_or("RGB frame buffer does not match its dimensions")?;
                image::imageops::resize(&img, width, height, self.filter).into_raw()
            }
            c => return Err(format!("unsupported channel count: {c}").into()),
        };

        Ok(Frame::new(
            resized,
            width,
            height,
            frame.channels(),
            frame.index(),
        ))
    }
}
