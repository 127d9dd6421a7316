use crate::detection::domain::rotated_view_provider::RotatedViewProvider;
use crate::shared::constants::ROTATION_FILL;
use crate::shared::frame::Frame;
use crate::shared::geometry::FrameCenter;

/// CPU rotation with bilinear sampling.
///
/// Each destination pixel center is pulled back through the inverse
/// rotation (the same mapping as `to_canonical`) and sampled from the
/// source. Pixels whose preimage falls outside the source get `fill`.
pub struct BilinearRotatedViewProvider {
    fill: u8,
}

impl BilinearRotatedViewProvider {
    pub fn new(fill: u8) -> Self {
        Self { fill }
    }
}

impl Default for BilinearRotatedViewProvider {
    fn default() -> Self {
        Self::new(ROTATION_FILL)
    }
}

impl RotatedViewProvider for BilinearRotatedViewProvider {
    fn rotate(
        &self,
        frame: &Frame,
        angle: f64,
        center: FrameCenter,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Err("cannot rotate a frame without pixels".into());
        }
        if angle == 0.0 {
            return Ok(frame.clone());
        }

        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let channels = frame.channels() as usize;
        let src = frame.as_ndarray();

        let mut out = Frame::filled(
            frame.width(),
            frame.height(),
            frame.channels(),
            frame.index(),
            self.fill,
        );
        let mut dst = out.as_ndarray_mut();

        let (sin_a, cos_a) = angle.sin_cos();
        let max_x = width as f64 - 1.0;
        let max_y = height as f64 - 1.0;

        for y in 0..height {
            let py = y as f64 + 0.5 - center.origin_y;
            for x in 0..width {
                let px = x as f64 + 0.5 - center.origin_x;

                // Preimage in source index space (pixel centers at integers).
                let src_x = cos_a * px + sin_a * py + center.origin_x - 0.5;
                let src_y = -sin_a * px + cos_a * py + center.origin_y - 0.5;

                if !(-0.5..=max_x + 0.5).contains(&src_x) || !(-0.5..=max_y + 0.5).contains(&src_y)
                {
                    continue;
                }

                let src_x = src_x.clamp(0.0, max_x);
                let src_y = src_y.clamp(0.0, max_y);
                let x0 = src_x.floor() as usize;
                let y0 = src_y.floor() as usize;
                let x1 = (x0 + 1).min(width - 1);
                let y1 = (y0 + 1).min(height - 1);
                let fx = src_x - x0 as f64;
                let fy = src_y - y0 as f64;

                for c in 0..channels {
                    let value = src[[y0, x0, c]] as f64 * (1.0 - fx) * (1.0 - fy)
                        + src[[y0, x1, c]] as f64 * fx * (1.0 - fy)
                        + src[[y1, x0, c]] as f64 * (1.0 - fx) * fy
                        + src[[y1, x1, c]] as f64 * fx * fy;
                    dst[[y, x, c]] = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::coordinate_transformer::to_canonical;
    use crate::shared::geometry::Point;
    use std::f64::consts::PI;

    fn gradient(width: u32, height: u32) -> Frame {
        let data = (0..width * height).map(|i| (i % 251) as u8).collect();
        Frame::new(data, width, height, 1, 4)
    }

    fn brightest(frame: &Frame) -> (usize, usize) {
        let arr = frame.as_ndarray();
        let mut best = (0, 0);
        let mut best_value = 0;
        for ((y, x, _), &v) in arr.indexed_iter() {
            if v > best_value {
                best_value = v;
                best = (x, y);
            }
        }
        best
    }

    #[test]
    fn test_zero_angle_copies_frame() {
        let frame = gradient(9, 7);
        let view = BilinearRotatedViewProvider::default()
            .rotate(&frame, 0.0, FrameCenter::of_surface(9, 7))
            .unwrap();
        assert_eq!(view.data(), frame.data());
    }

    #[test]
    fn test_keeps_geometry_and_index() {
        let frame = Frame::filled(12, 8, 3, 11, 50);
        let view = BilinearRotatedViewProvider::default()
            .rotate(&frame, 0.4, FrameCenter::of_surface(12, 8))
            .unwrap();
        assert_eq!(view.dimensions(), (12, 8));
        assert_eq!(view.channels(), 3);
        assert_eq!(view.index(), 11);
    }

    #[test]
    fn test_half_turn_mirrors_corners() {
        let frame = gradient(3, 3);
        let view = BilinearRotatedViewProvider::default()
            .rotate(&frame, PI, FrameCenter::of_surface(3, 3))
            .unwrap();
        let src = frame.as_ndarray();
        let dst = view.as_ndarray();
        assert_eq!(dst[[2, 2, 0]], src[[0, 0, 0]]);
        assert_eq!(dst[[0, 0, 0]], src[[2, 2, 0]]);
        assert_eq!(dst[[1, 1, 0]], src[[1, 1, 0]]);
    }

    #[test]
    fn test_out_of_bounds_uses_fill() {
        let frame = Frame::filled(20, 4, 1, 0, 200);
        let view = BilinearRotatedViewProvider::new(7)
            .rotate(&frame, PI / 2.0, FrameCenter::of_surface(20, 4))
            .unwrap();
        // A quarter turn of a wide strip leaves the far left column empty.
        assert_eq!(view.as_ndarray()[[0, 0, 0]], 7);
    }

    #[test]
    fn test_matches_transformer_convention() {
        // A single bright pixel, rotated into a view, must map back to where
        // it started through to_canonical.
        let mut frame = Frame::filled(64, 48, 1, 0, 0);
        frame.as_ndarray_mut()[[12, 44, 0]] = 255;
        let center = FrameCenter::of_surface(64, 48);
        let angle = 0.5;

        let view = BilinearRotatedViewProvider::default()
            .rotate(&frame, angle, center)
            .unwrap();
        let (vx, vy) = brightest(&view);
        let back = to_canonical(
            Point::new(vx as f64 + 0.5, vy as f64 + 0.5),
            angle,
            center,
        );
        assert!((back.x - 44.5).abs() <= 1.0, "x mapped to {}", back.x);
        assert!((back.y - 12.5).abs() <= 1.0, "y mapped to {}", back.y);
    }

    #[test]
    fn test_empty_frame_is_error() {
        let frame = Frame::new(Vec::new(), 0, 0, 1, 0);
        assert!(BilinearRotatedViewProvider::default()
            .rotate(&frame, 0.3, FrameCenter::default())
            .is_err());
    }
}
