#[macro_use]
extern crate log;

pub(crate) mod error;
pub use error::AlgoError;

pub(crate) mod signal;
pub use signal::{SignalSource, circadian_signal};

pub(crate) mod psd;
pub use psd::{PsdCalculator, PsdEstimate};

pub(crate) mod frequency;
pub use frequency::{FourierFrequencyCalculator, FrequencyEstimate};

pub(crate) mod stability;
pub use stability::{StabilityCalculator, StabilityEstimate};

pub(crate) mod amplitude;
pub use amplitude::{DayAmplitude, M10L5Calculator, M10L5Estimate};

pub(crate) mod summary;
pub use summary::{
    AnalysisOptions, CircadianAnalysis, MetricValue, NA_TOO_FEW_DAYS, RhythmSummary,
};

pub mod helpers;
