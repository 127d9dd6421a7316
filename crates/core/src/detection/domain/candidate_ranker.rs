use std::cmp::Ordering;

use crate::shared::rectangle::Rectangle;

/// Returns up to `top_n` candidates, most confident first.
///
/// The sort is stable: equal confidences keep their input order. NaN
/// confidences rank below every number. The input is left untouched.
pub fn rank(rects: &[Rectangle], top_n: usize) -> Vec<Rectangle> {
    let mut ranked = rects.to_vec();
    ranked.sort_by(by_confidence_desc);
    ranked.truncate(top_n);
    ranked
}

fn by_confidence_desc(a: &Rectangle, b: &Rectangle) -> Ordering {
    match (a.confidence.is_nan(), b.confidence.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal),
    }
}
