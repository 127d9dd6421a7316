use crate::shared::rectangle::Rectangle;

/// How the change between the held and the new rectangle is scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChangeMetric {
    /// `2·|Δx| + |Δw| + |Δh|`. The horizontal offset counts twice and the
    /// vertical offset is ignored.
    #[default]
    Observed,
    /// `|Δx| + |Δy| + |Δw| + |Δh|`, which also damps vertical jitter.
    Symmetric,
}

impl ChangeMetric {
    pub fn delta(self, prev: &Rectangle, candidate: &Rectangle) -> f64 {
        let dx = (prev.x - candidate.x).abs();
        let dw = (prev.width - candidate.width).abs();
        let dh = (prev.height - candidate.height).abs();
        match self {
            ChangeMetric::Observed => dx + dx + dw + dh,
            ChangeMetric::Symmetric => dx + (prev.y - candidate.y).abs() + dw + dh,
        }
    }
}

/// Last rectangle handed to the renderer, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StabilizerState {
    previous: Option<Rectangle>,
}

impl StabilizerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Rectangle> {
        self.previous.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.previous.is_some()
    }

    /// Back to the empty state; the next candidate is adopted as is.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Binary hysteresis filter: either hold the previous rectangle or snap to
/// the new one, never blend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stabilizer {
    threshold: f64,
    metric: ChangeMetric,
}

impl Stabilizer {
    pub fn new(threshold: f64, metric: ChangeMetric) -> Self {
        Self { threshold, metric }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn stabilize(&self, candidate: Rectangle, state: &mut StabilizerState) -> Rectangle {
        let Some(prev) = state.previous else {
            state.previous = Some(candidate);
            return candidate;
        };

        let delta = self.metric.delta(&prev, &candidate);
        if delta < self.threshold {
            log::trace!("holding previous rectangle (delta {delta:.2})");
            prev
        } else {
            state.previous = Some(candidate);
            candidate
        }
    }
}

/// Stabilizes with the default [`ChangeMetric::Observed`] score.
pub fn stabilize(candidate: Rectangle, state: &mut StabilizerState, threshold: f64) -> Rectangle {
    Stabilizer::new(threshold, ChangeMetric::Observed).stabilize(candidate, state)
}
