use actirhythm_types::EpochSeries;

/// Which per-epoch signal drives the Fourier estimators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignalSource {
    /// Imputed movement intensity, used as-is.
    Acceleration,
    /// ±1 indicator of the dominant imputed label being sleep.
    #[default]
    SleepIndicator,
}

impl SignalSource {
    /// Map the upstream `fourierWithAcc` flag onto a source.
    pub fn from_acc_flag(fourier_with_acc: bool) -> Self {
        if fourier_with_acc {
            Self::Acceleration
        } else {
            Self::SleepIndicator
        }
    }
}

/// Extract the analysis signal from the series.
pub fn circadian_signal(series: &EpochSeries, source: SignalSource) -> Vec<f64> {
    match source {
        SignalSource::Acceleration => series
            .records()
            .iter()
            .map(|record| record.acc_imputed)
            .collect(),
        SignalSource::SleepIndicator => sleep_indicator(series),
    }
}

/// +1 where the dominant imputed label is sleep, -1 elsewhere.
///
/// Centering on ±1 instead of 0/1 keeps the DC bin from swamping the
/// spectrum of a mostly-asleep or mostly-awake series.
fn sleep_indicator(series: &EpochSeries) -> Vec<f64> {
    let Some(sleep_index) = series.sleep_label_index() else {
        warn!("no `sleep` label configured, sleep indicator is uniformly -1");
        return vec![-1.0; series.len()];
    };

    series
        .records()
        .iter()
        .map(|record| {
            if dominant_label(&record.labels_imputed) == sleep_index {
                1.0
            } else {
                -1.0
            }
        })
        .collect()
}

/// Index of the first maximal weight; ties resolve to the earliest label.
fn dominant_label(weights: &[f64]) -> usize {
    let mut dominant = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight > weights[dominant] {
            dominant = index;
        }
    }
    dominant
}
