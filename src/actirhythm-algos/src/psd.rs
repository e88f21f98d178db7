use actirhythm_types::EpochSeries;
use rustfft::num_complex::Complex64;

use crate::signal::{SignalSource, circadian_signal};

pub struct PsdCalculator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsdEstimate {
    /// Squared magnitude of the normalized Fourier coefficient at one
    /// cycle per 24 hours.
    pub psd: f64,
}

impl PsdCalculator {
    /// Spectral power of the series at exactly the 24-hour period.
    ///
    /// The target frequency falls on a fractional bin index
    /// `k = n * epoch_period / 86400`, so the coefficient is evaluated by
    /// direct summation rather than through an FFT grid.
    pub fn calculate(series: &EpochSeries, source: SignalSource) -> PsdEstimate {
        let y = circadian_signal(series, source);
        let coefficient = dtft_coefficient(&y, day_cycles(series));
        PsdEstimate {
            psd: coefficient.norm_sqr(),
        }
    }
}

/// Number of 24-hour cycles covered by the series, generally non-integer.
pub(crate) fn day_cycles(series: &EpochSeries) -> f64 {
    series.len() as f64 * f64::from(series.epoch_period()) / 86_400.0
}

/// Normalized discrete-time Fourier coefficient of `y` at (possibly
/// fractional) bin index `k`:
/// `X(k) = (1/n) * sum_t y[t] * exp(-2*pi*i * k * t / n)`.
pub(crate) fn dtft_coefficient(y: &[f64], k: f64) -> Complex64 {
    let n = y.len() as f64;
    let mut sum = Complex64::new(0.0, 0.0);
    for (t, &value) in y.iter().enumerate() {
        let angle = -2.0 * std::f64::consts::PI * k * t as f64 / n;
        sum += value * Complex64::from_polar(1.0, angle);
    }
    sum / n
}
