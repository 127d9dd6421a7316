use crate::shared::constants::MAX_ROTATION_ANGLES;
use crate::shared::sweep_error::SweepError;

/// Absorbs division noise so aligned endpoints are not dropped
/// (e.g. `0.3 / 0.1 == 2.9999999999999996`).
const ALIGNMENT_EPSILON: f64 = 1e-9;

/// Ordered set of angles (radians) scanned for every frame.
///
/// Spans `-range/2 ..= +range/2` in increments of `step`. The last angle is
/// `+range/2` only when the range is a multiple of the step.
#[derive(Clone, Debug, PartialEq)]
pub struct RotationPlan {
    start: f64,
    step: f64,
    len: usize,
}

impl RotationPlan {
    pub fn generate(range: f64, step: f64) -> Result<Self, SweepError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(SweepError::InvalidConfig(format!(
                "rotation step must be > 0, got {step}"
            )));
        }
        if !range.is_finite() || range < 0.0 {
            return Err(SweepError::InvalidConfig(format!(
                "rotation range must be >= 0, got {range}"
            )));
        }

        let intervals = if range == 0.0 {
            0.0
        } else {
            (range / step + ALIGNMENT_EPSILON).floor()
        };
        let len = Some(intervals)
            .filter(|n| n.is_finite() && *n < MAX_ROTATION_ANGLES as f64)
            .and_then(|n| (n as usize).checked_add(1))
            .ok_or_else(|| {
                SweepError::InvalidConfig(format!(
                    "rotation range {range} with step {step} exceeds {MAX_ROTATION_ANGLES} angles"
                ))
            })?;

        Ok(Self {
            start: -range / 2.0,
            step,
            len,
        })
    }

    /// Fresh iterator over the angles; each call starts from the beginning.
    pub fn angles(&self) -> Angles {
        Angles {
            start: self.start,
            step: self.step,
            next: 0,
            len: self.len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true for a generated plan; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Lazy iterator over a [`RotationPlan`].
#[derive(Clone, Debug)]
pub struct Angles {
    start: f64,
    step: f64,
    next: usize,
    len: usize,
}

impl Iterator for Angles {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next >= self.len {
            return None;
        }
        let angle = self.start + self.step * self.next as f64;
        self.next += 1;
        Some(angle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Angles {}
