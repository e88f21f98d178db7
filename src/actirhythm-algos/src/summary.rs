use std::collections::BTreeMap;
use std::fmt::{self, Display};

use actirhythm_types::EpochSeries;
use serde::Serialize;

use crate::amplitude::M10L5Calculator;
use crate::frequency::FourierFrequencyCalculator;
use crate::psd::PsdCalculator;
use crate::signal::SignalSource;
use crate::stability::StabilityCalculator;

/// Sentinel reported when the series is too short for a relative
/// amplitude.
pub const NA_TOO_FEW_DAYS: &str = "NA_too_few_days";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Float(f64),
    Text(String),
}

impl Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Float(value) => write!(f, "{value}"),
            MetricValue::Text(text) => f.write_str(text),
        }
    }
}

/// Append-only metric mapping handed back to the caller for persistence.
///
/// The first write of a key wins; estimators own disjoint key sets, so a
/// collision means a caller composed two producers without namespacing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RhythmSummary {
    metrics: BTreeMap<String, MetricValue>,
}

impl RhythmSummary {
    pub fn insert(&mut self, key: impl Into<String>, value: MetricValue) {
        let key = key.into();
        if self.metrics.contains_key(&key) {
            warn!("summary key `{key}` already present, keeping the first value");
            return;
        }
        self.metrics.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.metrics.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricValue)> {
        self.metrics.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Drive PSD and frequency estimation from the acceleration signal
    /// instead of the derived sleep indicator.
    pub fourier_with_acc: bool,
}

/// Runs every estimator over one series and accumulates their summary
/// keys. Estimators stay independent: one failing leaves the others'
/// keys in place.
pub struct CircadianAnalysis {
    options: AnalysisOptions,
}

impl CircadianAnalysis {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn summarize(&self, series: &EpochSeries) -> RhythmSummary {
        let mut summary = RhythmSummary::default();
        let source = SignalSource::from_acc_flag(self.options.fourier_with_acc);

        let psd = PsdCalculator::calculate(series, source);
        summary.insert("PSD", MetricValue::Float(psd.psd));

        let frequency = FourierFrequencyCalculator::calculate(series, source);
        summary.insert(
            "fourier-frequency",
            MetricValue::Float(frequency.cycles_per_day),
        );

        let stability = StabilityCalculator::calculate(series);
        summary.insert(
            "circadianRhythms_IS",
            MetricValue::Float(stability.interdaily_stability),
        );
        summary.insert(
            "circadianRhythms_IV",
            MetricValue::Float(stability.intradaily_variability),
        );

        match M10L5Calculator::calculate(series) {
            Ok(estimate) => {
                let rel_amp = match estimate.relative_amplitude {
                    Some(value) => MetricValue::Float(value),
                    None => MetricValue::Text(NA_TOO_FEW_DAYS.to_owned()),
                };
                summary.insert("circadianRhythms_M10L5_Rel_AMP", rel_amp);
                summary.insert("circadianRhythms_M10AVG", MetricValue::Float(estimate.m10_avg));
                summary.insert("circadianRhythms_L5AVG", MetricValue::Float(estimate.l5_avg));
                summary.insert(
                    "circadianRhythms_M10_Onset",
                    MetricValue::Text(estimate.m10_onset),
                );
                summary.insert(
                    "circadianRhythms_L5_Onset",
                    MetricValue::Text(estimate.l5_onset),
                );
            }
            Err(error) => warn!("M10/L5 estimation failed: {error}"),
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actirhythm_types::EpochRecord;
    use chrono::{NaiveDate, TimeDelta};
    use std::f64::consts::TAU;

    const EPOCH_PERIOD: u32 = 1800;
    const EPOCHS_PER_DAY: usize = 48;

    const ALL_KEYS: [&str; 9] = [
        "PSD",
        "fourier-frequency",
        "circadianRhythms_IS",
        "circadianRhythms_IV",
        "circadianRhythms_M10L5_Rel_AMP",
        "circadianRhythms_M10AVG",
        "circadianRhythms_L5AVG",
        "circadianRhythms_M10_Onset",
        "circadianRhythms_L5_Onset",
    ];

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn make_series(accs: Vec<f64>) -> EpochSeries {
        let base = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = accs
            .into_iter()
            .enumerate()
            .map(|(i, acc)| EpochRecord {
                time: base + TimeDelta::seconds(i as i64 * i64::from(EPOCH_PERIOD)),
                acc_imputed: acc,
                labels_imputed: vec![],
            })
            .collect();
        EpochSeries::new(records, EPOCH_PERIOD, vec![]).unwrap()
    }

    fn rhythmic_week() -> EpochSeries {
        let accs = (0..7 * EPOCHS_PER_DAY)
            .map(|i| 2.0 + (TAU * i as f64 / EPOCHS_PER_DAY as f64).sin())
            .collect();
        make_series(accs)
    }

    #[test]
    fn healthy_series_writes_all_keys() {
        init_logging();
        let summary = CircadianAnalysis::new(AnalysisOptions {
            fourier_with_acc: true,
        })
        .summarize(&rhythmic_week());

        for key in ALL_KEYS {
            assert!(summary.contains_key(key), "missing key {key}");
        }
        assert_eq!(summary.len(), ALL_KEYS.len());
    }

    #[test]
    fn degenerate_onsets_leave_other_metrics_intact() {
        init_logging();
        // Two days with peaks 12 hours apart: onset circular mean cancels
        let mut accs = Vec::new();
        for hour in 0..24 {
            accs.extend(std::iter::repeat_n(if hour < 10 { 4.0 } else { 0.2 }, 2));
        }
        for hour in 0..24 {
            accs.extend(std::iter::repeat_n(
                if (12..22).contains(&hour) { 4.0 } else { 0.2 },
                2,
            ));
        }
        let summary = CircadianAnalysis::new(AnalysisOptions::default()).summarize(&make_series(accs));

        assert!(summary.contains_key("PSD"));
        assert!(summary.contains_key("fourier-frequency"));
        assert!(summary.contains_key("circadianRhythms_IS"));
        assert!(summary.contains_key("circadianRhythms_IV"));
        assert!(!summary.contains_key("circadianRhythms_M10AVG"));
        assert!(!summary.contains_key("circadianRhythms_M10_Onset"));
    }

    #[test]
    fn short_series_reports_na_sentinel() {
        let summary = CircadianAnalysis::new(AnalysisOptions {
            fourier_with_acc: true,
        })
        .summarize(&make_series(vec![1.0; 8]));

        assert_eq!(
            summary.get("circadianRhythms_M10L5_Rel_AMP"),
            Some(&MetricValue::Text(NA_TOO_FEW_DAYS.to_owned()))
        );
    }

    #[test]
    fn first_write_wins_on_collision() {
        let mut summary = RhythmSummary::default();
        summary.insert("PSD", MetricValue::Float(1.0));
        summary.insert("PSD", MetricValue::Float(2.0));
        assert_eq!(summary.get("PSD"), Some(&MetricValue::Float(1.0)));
        assert_eq!(summary.len(), 1);
    }

    #[test]
    fn serializes_as_flat_table() {
        let summary = CircadianAnalysis::new(AnalysisOptions {
            fourier_with_acc: true,
        })
        .summarize(&rhythmic_week());

        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert!(json["PSD"].is_f64());
        assert!(json["circadianRhythms_M10_Onset"].is_string());
    }
}
