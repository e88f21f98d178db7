use chrono::{NaiveTime, Timelike as _};

use crate::AlgoError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Resultant vectors shorter than this carry no usable direction.
const MIN_RESULTANT: f64 = 1e-9;

/// Mean direction of a set of angles, in degrees.
///
/// Each angle becomes a unit vector on the circle; the result is the angle
/// of the averaged vector, in `(-180, 180]`. Fails when the vectors cancel
/// (e.g. `[0, 180]`) and the mean direction is undefined.
pub fn circular_mean_angle(degrees: &[f64]) -> Result<f64, AlgoError> {
    if degrees.is_empty() {
        return Err(AlgoError::DegenerateCircularMean);
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for &deg in degrees {
        let rad = deg.to_radians();
        sum_x += rad.cos();
        sum_y += rad.sin();
    }

    let n = degrees.len() as f64;
    let x = sum_x / n;
    let y = sum_y / n;

    if x.hypot(y) < MIN_RESULTANT {
        return Err(AlgoError::DegenerateCircularMean);
    }

    Ok(y.atan2(x).to_degrees())
}

/// Mean of `HH:MM:SS` clock times on the 24-hour circle.
///
/// A plain arithmetic mean puts 23:00 and 01:00 at noon; mapping each time
/// onto the circle first puts them at midnight where they belong.
pub fn circular_mean_time<S: AsRef<str>>(times: &[S]) -> Result<String, AlgoError> {
    let mut angles = Vec::with_capacity(times.len());
    for time in times {
        let seconds = parse_clock_seconds(time.as_ref())?;
        angles.push(seconds * 360.0 / SECONDS_PER_DAY);
    }

    let mean_angle = circular_mean_angle(&angles)?;
    let mut mean_seconds = mean_angle * SECONDS_PER_DAY / 360.0;
    if mean_seconds < 0.0 {
        mean_seconds += SECONDS_PER_DAY;
    }

    Ok(format_clock(mean_seconds))
}

fn parse_clock_seconds(time: &str) -> Result<f64, AlgoError> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .map_err(|_| AlgoError::MalformedClockTime(time.to_owned()))?;
    Ok(f64::from(parsed.num_seconds_from_midnight()))
}

fn format_clock(seconds: f64) -> String {
    let total = seconds.round() as u32 % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
