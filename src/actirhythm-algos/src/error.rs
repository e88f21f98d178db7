use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{self:?}")]
pub enum AlgoError {
    DegenerateCircularMean,
    MalformedClockTime(String),
}
