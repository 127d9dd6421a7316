use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("detector unavailable at angle {angle:.3} rad: {reason}")]
    DetectorUnavailable { angle: f64, reason: String },
    #[error("frame {index} has no pixels")]
    EmptyFrame { index: usize },
}
