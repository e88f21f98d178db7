use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::SeriesError;

/// Label name whose imputed weight marks sleep epochs.
pub const SLEEP_LABEL: &str = "sleep";

/// One fixed-width slice of the wearable recording, as produced by the
/// upstream epoch-generation and imputation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Absolute local time of the epoch start; time zone resolved upstream.
    pub time: NaiveDateTime,
    /// Imputed movement intensity, non-negative.
    pub acc_imputed: f64,
    /// One `[0, 1]` weight per configured activity label, positionally
    /// parallel to the series' label set. The per-row argmax selects the
    /// dominant state.
    pub labels_imputed: Vec<f64>,
}

/// Validated, read-only epoch sequence.
///
/// Every estimator assumes strictly increasing timestamps with uniform
/// spacing of `epoch_period` seconds, so malformed input is rejected here
/// once instead of in each algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSeries {
    records: Vec<EpochRecord>,
    epoch_period: u32,
    labels: Vec<String>,
}

impl EpochSeries {
    pub fn new(
        records: Vec<EpochRecord>,
        epoch_period: u32,
        labels: Vec<String>,
    ) -> Result<Self, SeriesError> {
        if epoch_period == 0 {
            return Err(SeriesError::ZeroEpochPeriod);
        }

        if records.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, record) in records.iter().enumerate() {
            if record.labels_imputed.len() != labels.len() {
                return Err(SeriesError::LabelArityMismatch {
                    index,
                    expected: labels.len(),
                    actual: record.labels_imputed.len(),
                });
            }

            if !record.acc_imputed.is_finite() || record.acc_imputed < 0.0 {
                return Err(SeriesError::InvalidAcceleration { index });
            }
        }

        let expected = TimeDelta::seconds(i64::from(epoch_period));
        for (index, pair) in records.windows(2).enumerate() {
            let step = pair[1].time - pair[0].time;
            if step <= TimeDelta::zero() {
                return Err(SeriesError::NonMonotonicTimestamps { index: index + 1 });
            }
            if step != expected {
                return Err(SeriesError::IrregularSpacing {
                    index: index + 1,
                    expected: epoch_period,
                    actual: step.num_seconds(),
                });
            }
        }

        Ok(Self {
            records,
            epoch_period,
            labels,
        })
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// Epoch width in seconds.
    pub fn epoch_period(&self) -> u32 {
        self.epoch_period
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.records[0].time
    }

    pub fn end(&self) -> NaiveDateTime {
        self.records[self.records.len() - 1].time
    }

    /// Time covered by the series including the width of the final epoch,
    /// so a series of whole days measures an exact multiple of 24 hours.
    pub fn coverage(&self) -> TimeDelta {
        self.end() - self.start() + TimeDelta::seconds(i64::from(self.epoch_period))
    }

    /// Position of the `sleep` label, if one is configured.
    pub fn sleep_label_index(&self) -> Option<usize> {
        self.labels.iter().position(|label| label == SLEEP_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_records(accs: &[f64], epoch_period: u32) -> Vec<EpochRecord> {
        accs.iter()
            .enumerate()
            .map(|(i, &acc)| EpochRecord {
                time: base_time() + TimeDelta::seconds(i as i64 * i64::from(epoch_period)),
                acc_imputed: acc,
                labels_imputed: vec![],
            })
            .collect()
    }

    #[test]
    fn empty_series_rejected() {
        assert_eq!(
            EpochSeries::new(vec![], 30, vec![]),
            Err(SeriesError::Empty)
        );
    }

    #[test]
    fn zero_epoch_period_rejected() {
        let records = make_records(&[1.0], 30);
        assert_eq!(
            EpochSeries::new(records, 0, vec![]),
            Err(SeriesError::ZeroEpochPeriod)
        );
    }

    #[test]
    fn reversed_timestamps_rejected() {
        let mut records = make_records(&[1.0, 2.0], 30);
        records.swap(0, 1);
        assert_eq!(
            EpochSeries::new(records, 30, vec![]),
            Err(SeriesError::NonMonotonicTimestamps { index: 1 })
        );
    }

    #[test]
    fn gap_in_spacing_rejected() {
        let mut records = make_records(&[1.0, 2.0, 3.0], 30);
        records[2].time += TimeDelta::seconds(30);
        assert_eq!(
            EpochSeries::new(records, 30, vec![]),
            Err(SeriesError::IrregularSpacing {
                index: 2,
                expected: 30,
                actual: 60
            })
        );
    }

    #[test]
    fn label_arity_mismatch_rejected() {
        let records = make_records(&[1.0, 2.0], 30);
        assert_eq!(
            EpochSeries::new(records, 30, vec!["sleep".into()]),
            Err(SeriesError::LabelArityMismatch {
                index: 0,
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn negative_acceleration_rejected() {
        let records = make_records(&[1.0, -0.5], 30);
        assert_eq!(
            EpochSeries::new(records, 30, vec![]),
            Err(SeriesError::InvalidAcceleration { index: 1 })
        );
    }

    #[test]
    fn nan_acceleration_rejected() {
        let records = make_records(&[1.0, f64::NAN], 30);
        assert_eq!(
            EpochSeries::new(records, 30, vec![]),
            Err(SeriesError::InvalidAcceleration { index: 1 })
        );
    }

    #[test]
    fn coverage_includes_final_epoch() {
        // 2880 epochs of 30s cover exactly one day
        let series = EpochSeries::new(make_records(&vec![1.0; 2880], 30), 30, vec![]).unwrap();
        assert_eq!(series.coverage(), TimeDelta::days(1));
    }

    #[test]
    fn sleep_label_lookup() {
        let mut records = make_records(&[1.0], 30);
        records[0].labels_imputed = vec![0.0, 1.0];
        let series = EpochSeries::new(
            records,
            30,
            vec!["sedentary".into(), "sleep".into()],
        )
        .unwrap();
        assert_eq!(series.sleep_label_index(), Some(1));
    }

    #[test]
    fn record_serde_round_trip() {
        let record = EpochRecord {
            time: base_time(),
            acc_imputed: 0.25,
            labels_imputed: vec![0.9, 0.1],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: EpochRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
