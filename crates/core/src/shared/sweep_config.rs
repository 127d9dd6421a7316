use crate::detection::domain::stabilizer::ChangeMetric;
use crate::shared::constants::{
    DEFAULT_MAX_WORK_SIZE, DEFAULT_RECT_CHANGE_THRESHOLD, DEFAULT_ROTATION_RANGE,
    DEFAULT_ROTATION_STEP, DEFAULT_TOP_N, MAX_WORK_SIZE_LIMIT,
};
use crate::shared::sweep_error::SweepError;

/// Immutable settings for one sweep session.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    /// Longest side of the working raster, in pixels.
    pub max_work_size: u32,
    /// Total angular sweep, radians.
    pub rotation_range: f64,
    /// Increment between scanned angles, radians.
    pub rotation_step: f64,
    /// Hysteresis sensitivity, in working-raster units.
    pub rect_change_threshold: f64,
    /// Candidates retained after ranking.
    pub top_n: usize,
    pub change_metric: ChangeMetric,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_work_size: DEFAULT_MAX_WORK_SIZE,
            rotation_range: DEFAULT_ROTATION_RANGE,
            rotation_step: DEFAULT_ROTATION_STEP,
            rect_change_threshold: DEFAULT_RECT_CHANGE_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            change_metric: ChangeMetric::default(),
        }
    }
}

impl SweepConfig {
    /// Rejects settings the sweep cannot run with.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.max_work_size == 0 || self.max_work_size > MAX_WORK_SIZE_LIMIT {
            return Err(SweepError::InvalidConfig(format!(
                "max_work_size must be in 1..={MAX_WORK_SIZE_LIMIT}, got {}",
                self.max_work_size
            )));
        }
        if !self.rotation_step.is_finite() || self.rotation_step <= 0.0 {
            return Err(SweepError::InvalidConfig(format!(
                "rotation_step must be a positive number, got {}",
                self.rotation_step
            )));
        }
        if !self.rotation_range.is_finite() || self.rotation_range < 0.0 {
            return Err(SweepError::InvalidConfig(format!(
                "rotation_range must be >= 0, got {}",
                self.rotation_range
            )));
        }
        if !self.rect_change_threshold.is_finite() || self.rect_change_threshold < 0.0 {
            return Err(SweepError::InvalidConfig(format!(
                "rect_change_threshold must be >= 0, got {}",
                self.rect_change_threshold
            )));
        }
        if self.top_n == 0 {
            return Err(SweepError::InvalidConfig("top_n must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_valid() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_work_size, 160);
        assert_eq!(config.top_n, 1);
        assert_eq!(config.change_metric, ChangeMetric::Observed);
    }

    #[rstest]
    #[case::zero_step(SweepConfig { rotation_step: 0.0, ..SweepConfig::default() })]
    #[case::negative_step(SweepConfig { rotation_step: -0.1, ..SweepConfig::default() })]
    #[case::nan_step(SweepConfig { rotation_step: f64::NAN, ..SweepConfig::default() })]
    #[case::negative_range(SweepConfig { rotation_range: -1.0, ..SweepConfig::default() })]
    #[case::infinite_range(SweepConfig { rotation_range: f64::INFINITY, ..SweepConfig::default() })]
    #[case::zero_work_size(SweepConfig { max_work_size: 0, ..SweepConfig::default() })]
    #[case::oversized_work_size(SweepConfig { max_work_size: MAX_WORK_SIZE_LIMIT + 1, ..SweepConfig::default() })]
    #[case::max_u32_work_size(SweepConfig { max_work_size: u32::MAX, ..SweepConfig::default() })]
    #[case::zero_top_n(SweepConfig { top_n: 0, ..SweepConfig::default() })]
    #[case::negative_threshold(SweepConfig { rect_change_threshold: -1.0, ..SweepConfig::default() })]
    fn test_rejects_invalid(#[case] config: SweepConfig) {
        assert!(matches!(
            config.validate(),
            Err(SweepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_work_size_limit_is_valid() {
        let config = SweepConfig {
            max_work_size: MAX_WORK_SIZE_LIMIT,
            ..SweepConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_range_is_valid() {
        let config = SweepConfig {
            rotation_range: 0.0,
            ..SweepConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
