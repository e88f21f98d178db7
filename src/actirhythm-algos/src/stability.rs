use actirhythm_types::EpochSeries;
use chrono::Timelike as _;

pub struct StabilityCalculator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityEstimate {
    /// IS: similarity of the hourly activity profile across days, ~0 for
    /// noise up to 1 for a perfectly repeating pattern. NaN when the
    /// series has no variance.
    pub interdaily_stability: f64,
    /// IV: fragmentation of activity between successive hours. NaN when
    /// the series has no variance.
    pub intradaily_variability: f64,
    /// Complete hours covered by the series.
    pub hours: i64,
}

impl StabilityCalculator {
    const HOURS_PER_DAY: usize = 24;

    /// Hourly-mean IS/IV following the standard actigraphy formulation.
    ///
    /// IS compares the pooled hour-of-day profile against the grand mean;
    /// IV compares successive elapsed-hour windows against the overall
    /// variance.
    pub fn calculate(series: &EpochSeries) -> StabilityEstimate {
        let hours = series.coverage().num_seconds() / 3600;
        if hours <= Self::HOURS_PER_DAY as i64 {
            warn!("series covers only {hours} hours, IS/IV need more than one day");
        }

        let records = series.records();
        let n = hours as f64;
        let grand_mean = records
            .iter()
            .map(|record| record.acc_imputed)
            .sum::<f64>()
            / records.len() as f64;

        // Hour-of-day buckets pooled across all days
        let mut bucket_sum = [0.0_f64; Self::HOURS_PER_DAY];
        let mut bucket_count = [0_usize; Self::HOURS_PER_DAY];
        for record in records {
            let hour = record.time.hour() as usize;
            bucket_sum[hour] += record.acc_imputed;
            bucket_count[hour] += 1;
        }

        let mut var_daily = 0.0;
        for hour in 0..Self::HOURS_PER_DAY {
            if bucket_count[hour] > 0 {
                let bucket_mean = bucket_sum[hour] / bucket_count[hour] as f64;
                var_daily += (bucket_mean - grand_mean).powi(2);
            }
        }
        var_daily *= n;

        // Non-overlapping 1-hour windows by elapsed position, not clock hour
        let window_means = Self::hourly_window_means(series);

        let mut total_var = 0.0;
        let mut total_hour_diff = 0.0;
        for (i, &mean) in window_means.iter().enumerate() {
            total_var += (mean - grand_mean).powi(2);
            if i > 0 {
                total_hour_diff += (mean - window_means[i - 1]).powi(2) * n;
            }
        }

        StabilityEstimate {
            interdaily_stability: var_daily / (total_var * Self::HOURS_PER_DAY as f64),
            intradaily_variability: total_hour_diff / (total_var * (n - 1.0)),
            hours,
        }
    }

    fn hourly_window_means(series: &EpochSeries) -> Vec<f64> {
        let start = series.start();
        let mut means = Vec::new();

        let mut current_window = 0;
        let mut sum = 0.0;
        let mut count = 0_usize;
        for record in series.records() {
            let window = (record.time - start).num_seconds() / 3600;
            if window != current_window {
                means.push(sum / count as f64);
                sum = 0.0;
                count = 0;
                current_window = window;
            }
            sum += record.acc_imputed;
            count += 1;
        }
        means.push(sum / count as f64);

        means
    }
}
