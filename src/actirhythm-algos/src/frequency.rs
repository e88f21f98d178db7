use actirhythm_types::EpochSeries;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex64;

use crate::helpers::minimize::brent_min;
use crate::psd::{day_cycles, dtft_coefficient};
use crate::signal::{SignalSource, circadian_signal};

pub struct FourierFrequencyCalculator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEstimate {
    /// Dominant oscillation frequency in cycles per day.
    pub cycles_per_day: f64,
}

impl FourierFrequencyCalculator {
    /// Below this span the FFT peak seeding the refinement gets unreliable.
    const MIN_RELIABLE_DAYS: f64 = 2.0;

    /// Coarse-to-fine search for the frequency with the most spectral
    /// power: an FFT peak-pick gives the integer bin, then a bounded
    /// scalar minimization refines it to sub-bin precision.
    pub fn calculate(series: &EpochSeries, source: SignalSource) -> FrequencyEstimate {
        let cycles = day_cycles(series);
        if cycles < Self::MIN_RELIABLE_DAYS {
            warn!(
                "series covers {cycles:.2} days, dominant-frequency estimate is low-confidence"
            );
        }

        let y = circadian_signal(series, source);
        let k_max = Self::spectral_peak(&y);
        let k = Self::refine(&y, k_max);

        FrequencyEstimate {
            cycles_per_day: k / cycles,
        }
    }

    /// Integer bin index of the largest non-DC magnitude in the spectrum.
    pub(crate) fn spectral_peak(y: &[f64]) -> usize {
        if y.len() < 2 {
            return 1;
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(y.len());
        let mut buffer: Vec<Complex64> =
            y.iter().map(|&value| Complex64::new(value, 0.0)).collect();
        fft.process(&mut buffer);

        let mut k_max = 1;
        for (k, bin) in buffer.iter().enumerate().skip(2) {
            if bin.norm_sqr() > buffer[k_max].norm_sqr() {
                k_max = k;
            }
        }
        k_max
    }

    /// Minimize the negative DTFT magnitude over the bracket around the
    /// FFT peak.
    pub(crate) fn refine(y: &[f64], k_max: usize) -> f64 {
        let objective = |k: f64| -dtft_coefficient(y, k).norm();
        brent_min(objective, k_max as f64 - 1.0, k_max as f64 + 1.0)
    }
}
