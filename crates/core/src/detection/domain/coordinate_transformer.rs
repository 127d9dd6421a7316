//! Polar-rotation mapping between a rotated view and the canonical frame.
//!
//! A box found in a view rotated by `angle` about `center` sits at bearing
//! `θ` in that view; in the unrotated frame it sits at bearing `θ - angle`
//! at the same radius.

use crate::shared::geometry::{FrameCenter, Point};
use crate::shared::rectangle::Rectangle;

/// Maps a point from a view rotated by `angle` back to the canonical frame,
/// as an offset from `center`.
pub fn to_canonical_offset(point: Point, angle: f64, center: FrameCenter) -> Point {
    let dx = point.x - center.origin_x;
    let dy = point.y - center.origin_y;
    if angle == 0.0 {
        return Point::new(dx, dy);
    }

    let radius = dx.hypot(dy);
    let rotated = bearing(dx, dy) - angle;
    Point::new(radius * rotated.cos(), radius * rotated.sin())
}

/// Maps a point from a view rotated by `angle` back to absolute canonical
/// coordinates.
pub fn to_canonical(point: Point, angle: f64, center: FrameCenter) -> Point {
    if angle == 0.0 {
        return point;
    }
    anchor(to_canonical_offset(point, angle, center), center)
}

/// Inverse of [`to_canonical`]: projects a canonical point into the view
/// rotated by `angle`.
pub fn to_rotated(point: Point, angle: f64, center: FrameCenter) -> Point {
    to_canonical(point, -angle, center)
}

/// Moves a detector rectangle from the rotated view into the canonical
/// frame and tags it with the angle it came from.
pub fn rectangle_to_canonical(rect: &Rectangle, angle: f64, center: FrameCenter) -> Rectangle {
    rect.with_position(to_canonical(rect.position(), angle, center))
        .with_angle(angle)
}

/// Re-adds the pivot to a center-relative offset.
pub fn anchor(offset: Point, center: FrameCenter) -> Point {
    Point::new(offset.x + center.origin_x, offset.y + center.origin_y)
}

/// Bearing of `(dx, dy)` about the pivot. A point on the pivot has no
/// bearing; it is taken as 0, which leaves it in place under any rotation.
fn bearing(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 && dy == 0.0 {
        0.0
    } else {
        dy.atan2(dx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_point_eq(actual: Point, expected: Point) {
        assert_relative_eq!(actual.x, expected.x, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(actual.y, expected.y, epsilon = 1e-9, max_relative = 1e-9);
    }

    #[rstest]
    #[case(Point::new(0.0, 0.0), FrameCenter::new(0.0, 0.0))]
    #[case(Point::new(12.5, -3.0), FrameCenter::new(80.0, 60.0))]
    #[case(Point::new(-40.0, 700.0), FrameCenter::new(1.5, 2.5))]
    fn test_zero_angle_is_identity(#[case] p: Point, #[case] c: FrameCenter) {
        assert_eq!(to_canonical(p, 0.0, c), p);
    }

    #[rstest]
    #[case(Point::new(100.0, 60.0), 0.5)]
    #[case(Point::new(10.0, 10.0), -0.5)]
    #[case(Point::new(0.0, 120.0), 1.3)]
    #[case(Point::new(80.0, 0.0), -2.9)]
    #[case(Point::new(-30.0, 75.0), PI)]
    #[case(Point::new(80.0, 61.0), 0.01)]
    fn test_round_trip(#[case] p: Point, #[case] angle: f64) {
        let c = FrameCenter::new(80.0, 60.0);
        let canonical = to_canonical(p, angle, c);
        assert_point_eq(to_rotated(canonical, angle, c), p);
    }

    #[test]
    fn test_quarter_turn_about_origin() {
        // (1, 0) seen in a view rotated by +π/2 came from bearing -π/2.
        let p = to_canonical(Point::new(1.0, 0.0), FRAC_PI_2, FrameCenter::default());
        assert_point_eq(p, Point::new(0.0, -1.0));
    }

    #[test]
    fn test_negative_x_half_plane_uses_correct_quadrant() {
        // Left of the pivot: a single-argument arctangent would land in the
        // wrong half plane without correction.
        let c = FrameCenter::new(50.0, 50.0);
        let p = to_canonical_offset(Point::new(40.0, 50.0), FRAC_PI_2, c);
        assert_point_eq(p, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_directly_above_pivot() {
        // dx == 0 is where the arctangent-of-ratio form breaks down.
        let c = FrameCenter::new(50.0, 50.0);
        let p = to_canonical_offset(Point::new(50.0, 40.0), -FRAC_PI_2, c);
        assert_point_eq(p, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_pivot_point_is_fixed() {
        let c = FrameCenter::new(80.0, 60.0);
        let p = to_canonical(Point::new(80.0, 60.0), 0.7, c);
        assert_point_eq(p, Point::new(80.0, 60.0));
        assert_eq!(
            to_canonical_offset(Point::new(80.0, 60.0), 0.7, c),
            Point::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_offset_and_absolute_differ_by_center() {
        let c = FrameCenter::new(80.0, 60.0);
        let p = Point::new(120.0, 30.0);
        let offset = to_canonical_offset(p, 0.4, c);
        assert_point_eq(anchor(offset, c), to_canonical(p, 0.4, c));
    }

    #[test]
    fn test_radius_is_preserved() {
        let c = FrameCenter::new(80.0, 60.0);
        let p = Point::new(130.0, 20.0);
        let offset = to_canonical_offset(p, 0.9, c);
        assert_relative_eq!(offset.x.hypot(offset.y), 50.0_f64.hypot(40.0), epsilon = 1e-9);
    }

    #[test]
    fn test_rectangle_keeps_size_and_score() {
        let c = FrameCenter::new(80.0, 60.0);
        let rect = Rectangle::new(100.0, 60.0, 24.0, 24.0, 3.5);
        let mapped = rectangle_to_canonical(&rect, 0.5, c);
        assert_relative_eq!(mapped.angle, 0.5);
        assert_relative_eq!(mapped.width, 24.0);
        assert_relative_eq!(mapped.height, 24.0);
        assert_relative_eq!(mapped.confidence, 3.5);
        assert_point_eq(mapped.position(), to_canonical(rect.position(), 0.5, c));
    }
}
