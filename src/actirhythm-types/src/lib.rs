pub(crate) mod error;
pub use error::SeriesError;

pub(crate) mod series;
pub use series::{EpochRecord, EpochSeries, SLEEP_LABEL};
