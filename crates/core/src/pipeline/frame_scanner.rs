use crate::detection::domain::coordinate_transformer::rectangle_to_canonical;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::rotated_view_provider::RotatedViewProvider;
use crate::detection::domain::rotation_plan::RotationPlan;
use crate::shared::frame::Frame;
use crate::shared::geometry::FrameCenter;
use crate::shared::rectangle::Rectangle;
use crate::shared::sweep_error::SweepError;

/// Runs an upright-only detector over every angle of a rotation plan.
///
/// Results are in canonical coordinates, tagged with their angle, and
/// ordered by angle (not by confidence). Overlapping boxes from different
/// angles are all kept; picking one is the ranker's job.
pub struct FrameScanner {
    provider: Box<dyn RotatedViewProvider>,
    detector: Box<dyn FaceDetector>,
}

impl FrameScanner {
    pub fn new(provider: Box<dyn RotatedViewProvider>, detector: Box<dyn FaceDetector>) -> Self {
        Self { provider, detector }
    }

    pub fn scan(&mut self, frame: &Frame, plan: &RotationPlan, center: FrameCenter) -> Vec<Rectangle> {
        scan(
            frame,
            plan,
            center,
            self.provider.as_ref(),
            self.detector.as_mut(),
        )
    }
}

/// Sweeps `plan` over `frame`. An angle whose rotation or detection fails
/// is logged and contributes nothing.
pub fn scan(
    frame: &Frame,
    plan: &RotationPlan,
    center: FrameCenter,
    provider: &dyn RotatedViewProvider,
    detector: &mut dyn FaceDetector,
) -> Vec<Rectangle> {
    let mut candidates = Vec::new();
    for angle in plan.angles() {
        match scan_angle(frame, angle, center, provider, detector) {
            Ok(rects) => {
                log::debug!(
                    "frame {}: {} detection(s) at {angle:+.3} rad",
                    frame.index(),
                    rects.len()
                );
                candidates.extend(rects);
            }
            Err(e) => log::warn!("frame {}: {e}; skipping angle", frame.index()),
        }
    }
    candidates
}

fn scan_angle(
    frame: &Frame,
    angle: f64,
    center: FrameCenter,
    provider: &dyn RotatedViewProvider,
    detector: &mut dyn FaceDetector,
) -> Result<Vec<Rectangle>, SweepError> {
    let view = provider
        .rotate(frame, angle, center)
        .map_err(|e| SweepError::DetectorUnavailable {
            angle,
            reason: format!("rotation failed: {e}"),
        })?;
    let detections = detector
        .detect(&view)
        .map_err(|e| SweepError::DetectorUnavailable {
            angle,
            reason: e.to_string(),
        })?;
    Ok(detections
        .iter()
        .map(|r| rectangle_to_canonical(r, angle, center))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::coordinate_transformer::to_canonical;
    use approx::assert_relative_eq;

    /// Returns the scripted detections of call `n` (cycling).
    struct ScriptedDetector {
        script: Vec<Result<Vec<Rectangle>, String>>,
        calls: usize,
    }

    impl FaceDetector for ScriptedDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>> {
            let result = self.script[self.calls % self.script.len()].clone();
            self.calls += 1;
            result.map_err(|e| e.into())
        }
    }

    struct IdentityProvider;

    impl RotatedViewProvider for IdentityProvider {
        fn rotate(
            &self,
            frame: &Frame,
            _angle: f64,
            _center: FrameCenter,
        ) -> Result<Frame, Box<dyn std::error::Error>> {
            Ok(frame.clone())
        }
    }

    struct BrokenProvider;

    impl RotatedViewProvider for BrokenProvider {
        fn rotate(
            &self,
            _frame: &Frame,
            _angle: f64,
            _center: FrameCenter,
        ) -> Result<Frame, Box<dyn std::error::Error>> {
            Err("no GPU".into())
        }
    }

    fn frame() -> Frame {
        Frame::filled(160, 120, 1, 0, 0)
    }

    fn scanner(script: Vec<Result<Vec<Rectangle>, String>>) -> FrameScanner {
        FrameScanner::new(
            Box::new(IdentityProvider),
            Box::new(ScriptedDetector { script, calls: 0 }),
        )
    }

    #[test]
    fn test_accumulates_in_angle_order_with_tags() {
        let plan = RotationPlan::generate(1.0, 0.5).unwrap();
        let center = FrameCenter::of_surface(160, 120);
        let face = Rectangle::new(100.0, 70.0, 24.0, 24.0, 0.8);
        let mut scanner = scanner(vec![
            Ok(vec![face]),
            Ok(vec![face, face]),
            Ok(vec![face]),
        ]);

        let rects = scanner.scan(&frame(), &plan, center);
        let angles: Vec<f64> = rects.iter().map(|r| r.angle).collect();
        assert_eq!(angles, vec![-0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_positions_are_mapped_to_canonical() {
        let plan = RotationPlan::generate(1.0, 1.0).unwrap();
        let center = FrameCenter::of_surface(160, 120);
        let face = Rectangle::new(100.0, 70.0, 24.0, 24.0, 0.8);
        let mut scanner = scanner(vec![Ok(vec![face])]);

        let rects = scanner.scan(&frame(), &plan, center);
        assert_eq!(rects.len(), 2);
        let expected = to_canonical(face.position(), -0.5, center);
        assert_relative_eq!(rects[0].x, expected.x);
        assert_relative_eq!(rects[0].y, expected.y);
        assert_relative_eq!(rects[0].width, 24.0);
        assert_relative_eq!(rects[0].confidence, 0.8);
    }

    #[test]
    fn test_upright_angle_leaves_position_untouched() {
        let plan = RotationPlan::generate(0.0, 0.5).unwrap();
        let face = Rectangle::new(13.0, 17.0, 24.0, 24.0, 0.8);
        let mut scanner = scanner(vec![Ok(vec![face])]);
        let rects = scanner.scan(&frame(), &plan, FrameCenter::of_surface(160, 120));
        assert_eq!(rects, vec![face]);
    }

    #[test]
    fn test_empty_angles_contribute_nothing() {
        let plan = RotationPlan::generate(1.0, 0.5).unwrap();
        let mut scanner = scanner(vec![Ok(vec![])]);
        assert!(scanner
            .scan(&frame(), &plan, FrameCenter::default())
            .is_empty());
    }

    #[test]
    fn test_failing_detector_skips_only_that_angle() {
        let plan = RotationPlan::generate(1.0, 0.5).unwrap();
        let face = Rectangle::new(80.0, 60.0, 24.0, 24.0, 0.8);
        let mut scanner = scanner(vec![
            Err("session lost".into()),
            Ok(vec![face]),
            Ok(vec![face]),
        ]);
        let rects = scanner.scan(&frame(), &plan, FrameCenter::of_surface(160, 120));
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].angle, 0.0);
        assert_eq!(rects[1].angle, 0.5);
    }

    #[test]
    fn test_failing_rotation_skips_angle() {
        let plan = RotationPlan::generate(1.0, 0.5).unwrap();
        let mut detector = ScriptedDetector {
            script: vec![Ok(vec![Rectangle::new(0.0, 0.0, 1.0, 1.0, 1.0)])],
            calls: 0,
        };
        let rects = scan(&frame(), &plan, FrameCenter::default(), &BrokenProvider, &mut detector);
        assert!(rects.is_empty());
        assert_eq!(detector.calls, 0);
    }
}
