use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{self:?}")]
pub enum SeriesError {
    Empty,
    ZeroEpochPeriod,
    NonMonotonicTimestamps { index: usize },
    IrregularSpacing { index: usize, expected: u32, actual: i64 },
    LabelArityMismatch { index: usize, expected: usize, actual: usize },
    InvalidAcceleration { index: usize },
}
