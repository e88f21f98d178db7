use actirhythm_types::{EpochRecord, EpochSeries};
use chrono::{NaiveDate, NaiveDateTime, Timelike as _};

use crate::AlgoError;
use crate::helpers::circular::circular_mean_time;
use crate::helpers::clock::minutes_to_clock_string;

pub struct M10L5Calculator;

/// M10/L5 figures for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayAmplitude {
    pub date: NaiveDate,
    /// Mean rate of the most-active contiguous 10-hour window.
    pub m10: f64,
    pub m10_onset: NaiveDateTime,
    /// Mean rate of the least-active contiguous 5-hour window.
    pub l5: f64,
    pub l5_onset: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct M10L5Estimate {
    pub days: Vec<DayAmplitude>,
    /// Mean of the daily M10 rates.
    pub m10_avg: f64,
    /// Mean of the daily L5 rates.
    pub l5_avg: f64,
    /// `(M10 - L5) / (M10 + L5)`; `None` when the series covers no whole
    /// day and the statistic would be meaningless.
    pub relative_amplitude: Option<f64>,
    /// Circular mean of the daily M10 onset clock times.
    pub m10_onset: String,
    /// Circular mean of the daily L5 onset clock times.
    pub l5_onset: String,
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

struct DayWindow {
    mean_rate: f64,
    onset: NaiveDateTime,
}

impl M10L5Calculator {
    const TEN_HOURS_SECS: u32 = 10 * 3600;
    const FIVE_HOURS_SECS: u32 = 5 * 3600;

    /// Per-day sliding-window extremes of the activity signal, averaged
    /// across days, with circular-mean onset clock times.
    pub fn calculate(series: &EpochSeries) -> Result<M10L5Estimate, AlgoError> {
        let whole_days = series.coverage().num_seconds() / 86_400;
        if whole_days == 0 {
            warn!("series covers under one day, M10/L5 relative amplitude unavailable");
        }

        let ten = Self::window_epochs(Self::TEN_HOURS_SECS, series.epoch_period());
        let five = Self::window_epochs(Self::FIVE_HOURS_SECS, series.epoch_period());

        let mut days = Vec::new();
        for day in day_buckets(series.records()) {
            let m10 = Self::extreme_window(day, ten, Extreme::Max);
            let l5 = Self::extreme_window(day, five, Extreme::Min);
            days.push(DayAmplitude {
                date: day[0].time.date(),
                m10: m10.mean_rate,
                m10_onset: m10.onset,
                l5: l5.mean_rate,
                l5_onset: l5.onset,
            });
        }

        let count = days.len() as f64;
        let m10_avg = days.iter().map(|day| day.m10).sum::<f64>() / count;
        let l5_avg = days.iter().map(|day| day.l5).sum::<f64>() / count;
        let relative_amplitude =
            (whole_days > 0).then(|| (m10_avg - l5_avg) / (m10_avg + l5_avg));

        let m10_onset = Self::mean_onset(days.iter().map(|day| day.m10_onset))?;
        let l5_onset = Self::mean_onset(days.iter().map(|day| day.l5_onset))?;

        Ok(M10L5Estimate {
            days,
            m10_avg,
            l5_avg,
            relative_amplitude,
            m10_onset,
            l5_onset,
        })
    }

    fn window_epochs(window_secs: u32, epoch_period: u32) -> usize {
        (window_secs / epoch_period).max(1) as usize
    }

    /// Best window of `window` epochs by running sum, one-epoch steps.
    /// Days shorter than the window collapse to a single whole-day window.
    /// Ties keep the earliest onset.
    fn extreme_window(day: &[EpochRecord], window: usize, extreme: Extreme) -> DayWindow {
        let len = window.min(day.len());

        let mut sum: f64 = day[..len].iter().map(|record| record.acc_imputed).sum();
        let mut best_sum = sum;
        let mut best_start = 0;

        for start in 1..=(day.len() - len) {
            sum += day[start + len - 1].acc_imputed - day[start - 1].acc_imputed;
            let better = match extreme {
                Extreme::Max => sum > best_sum,
                Extreme::Min => sum < best_sum,
            };
            if better {
                best_sum = sum;
                best_start = start;
            }
        }

        DayWindow {
            mean_rate: best_sum / len as f64,
            onset: day[best_start].time,
        }
    }

    /// One representative clock time for a set of per-day onsets, truncated
    /// to whole minutes before averaging on the 24-hour circle.
    fn mean_onset(onsets: impl Iterator<Item = NaiveDateTime>) -> Result<String, AlgoError> {
        let clocks: Vec<String> = onsets
            .map(|onset| minutes_to_clock_string(onset.hour() * 60 + onset.minute()))
            .collect();
        circular_mean_time(&clocks)
    }
}

fn day_buckets(records: &[EpochRecord]) -> impl Iterator<Item = &[EpochRecord]> {
    records.chunk_by(|a, b| a.time.date() == b.time.date())
}
