//! Summary statistics over a feed's measured fields.
//!
//! Missing values are counted but never averaged in as zero.

use serde::Serialize;

use crate::model::{HourlyMeasurement, Measured};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub samples: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

/// Summarise a sequence of measured values.
pub fn summarize_field<I>(values: I) -> FieldSummary
where
    I: IntoIterator<Item = Measured>,
{
    let mut samples = 0;
    let mut missing = 0;
    let mut total = 0.0;
    let mut max: Option<f64> = None;

    for v in values {
        match v {
            Measured::Present(x) => {
                samples += 1;
                total += x;
                max = Some(max.map_or(x, |m| m.max(x)));
            }
            Measured::Missing => missing += 1,
        }
    }

    FieldSummary {
        samples,
        missing,
        mean: (samples > 0).then(|| total / samples as f64),
        max,
    }
}

/// Wave height and wind speed summaries, in source units.
pub fn summarize_feed(measurements: &[HourlyMeasurement]) -> (FieldSummary, FieldSummary) {
    (
        summarize_field(measurements.iter().map(|m| m.wave_height_m)),
        summarize_field(measurements.iter().map(|m| m.wind_speed)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_are_excluded_from_mean() {
        let s = summarize_field([
            Measured::Present(1.0),
            Measured::Missing,
            Measured::Present(3.0),
        ]);
        assert_eq!(s.samples, 2);
        assert_eq!(s.missing, 1);
        assert_eq!(s.mean, Some(2.0));
        assert_eq!(s.max, Some(3.0));
    }

    #[test]
    fn test_all_missing_has_no_mean() {
        let s = summarize_field([Measured::Missing, Measured::Missing]);
        assert_eq!(s.samples, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.max, None);
    }

    #[test]
    fn test_zero_is_a_real_sample() {
        let s = summarize_field([Measured::Present(0.0), Measured::Present(0.0)]);
        assert_eq!(s.samples, 2);
        assert_eq!(s.mean, Some(0.0));
    }
}
