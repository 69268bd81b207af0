//! Three-tier hour rating (BAD / MEDIOCRE / GOOD) for forecast feeds.
//!
//! Rules are evaluated in order and the first match wins:
//!   1. GOOD if waves < 3 ft, wind < 15 mph and period >= 2 x height (meters)
//!   2. BAD if waves > 4 ft, wind > 18 mph or gusts > 25 mph
//!   3. MEDIOCRE otherwise
//!
//! The period-to-height ratio compares seconds against the
//! height in meters, not feet.

use crate::model::{ConditionsError, ForecastRating, SpeedUnit};
use crate::units::{ensure_physical, meters_to_feet};

pub const GOOD_WAVE_HEIGHT_MAX_FT: f64 = 3.0;
pub const GOOD_WIND_SPEED_MAX_MPH: f64 = 15.0;
pub const BAD_WAVE_HEIGHT_MIN_FT: f64 = 4.0;
pub const BAD_WIND_SPEED_MIN_MPH: f64 = 18.0;
pub const BAD_WIND_GUST_MIN_MPH: f64 = 25.0;
/// Minimum wave period, in seconds per meter of wave height, for a GOOD hour.
pub const GOOD_PERIOD_PER_HEIGHT_M: f64 = 2.0;

/// Rates one hour from already-converted values.
pub fn rate_hour(
    wave_height_ft: f64,
    wind_speed_mph: f64,
    wind_gust_mph: f64,
    wave_period_sec: f64,
    wave_height_m: f64,
) -> ForecastRating {
    if is_good(wave_height_ft, wind_speed_mph, wave_period_sec, wave_height_m) {
        ForecastRating::Good
    } else if is_bad(wave_height_ft, wind_speed_mph, wind_gust_mph) {
        ForecastRating::Bad
    } else {
        ForecastRating::Mediocre
    }
}

/// Rates one hour from raw forecast units (meters, seconds, km/h).
pub fn rate_raw(
    wave_height_m: f64,
    wave_period_sec: f64,
    wind_speed_kmh: f64,
    wind_gust_kmh: f64,
) -> Result<ForecastRating, ConditionsError> {
    let wave_height_ft = meters_to_feet(wave_height_m)?;
    let wave_period_sec = ensure_physical("wave_period_sec", wave_period_sec)?;
    let wind_speed_mph = SpeedUnit::KilometersPerHour.to_mph(wind_speed_kmh)?;
    let wind_gust_mph = SpeedUnit::KilometersPerHour.to_mph(wind_gust_kmh)?;
    Ok(rate_hour(
        wave_height_ft,
        wind_speed_mph,
        wind_gust_mph,
        wave_period_sec,
        wave_height_m,
    ))
}

fn is_good(wave_height_ft: f64, wind_speed_mph: f64, wave_period_sec: f64, wave_height_m: f64) -> bool {
    wave_height_ft < GOOD_WAVE_HEIGHT_MAX_FT
        && wind_speed_mph < GOOD_WIND_SPEED_MAX_MPH
        && wave_period_sec >= GOOD_PERIOD_PER_HEIGHT_M * wave_height_m
}

fn is_bad(wave_height_ft: f64, wind_speed_mph: f64, wind_gust_mph: f64) -> bool {
    wave_height_ft > BAD_WAVE_HEIGHT_MIN_FT
        || wind_speed_mph > BAD_WIND_SPEED_MIN_MPH
        || wind_gust_mph > BAD_WIND_GUST_MIN_MPH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calm_short_period_morning_is_good() {
        // 0.5 m -> 1.64 ft, 10 km/h -> 6.2 mph, 9 s >= 2 x 0.5
        assert_eq!(rate_raw(0.5, 9.0, 10.0, 12.0), Ok(ForecastRating::Good));
    }

    #[test]
    fn test_waves_over_four_feet_are_bad_regardless_of_wind() {
        // 1.5 m -> 4.92 ft
        assert_eq!(rate_raw(1.5, 12.0, 0.0, 0.0), Ok(ForecastRating::Bad));
        assert_eq!(rate_raw(1.5, 3.0, 5.0, 5.0), Ok(ForecastRating::Bad));
    }

    #[test]
    fn test_strong_wind_or_gust_is_bad() {
        // 30 km/h -> 18.6 mph
        assert_eq!(rate_raw(0.3, 8.0, 30.0, 30.0), Ok(ForecastRating::Bad));
        // Period 0.5 s fails the GOOD ratio; 45 km/h gusts -> 28 mph.
        assert_eq!(rate_raw(0.5, 0.5, 20.0, 45.0), Ok(ForecastRating::Bad));
    }

    #[test]
    fn test_gusts_do_not_block_a_good_hour() {
        // GOOD has no gust bound and is evaluated before BAD.
        assert_eq!(rate_hour(2.0, 10.0, 40.0, 8.0, 0.6), ForecastRating::Good);
    }

    #[test]
    fn test_between_good_and_bad_bounds_is_mediocre() {
        // 3.5 ft is neither < 3 nor > 4.
        assert_eq!(rate_hour(3.5, 10.0, 12.0, 8.0, 1.07), ForecastRating::Mediocre);
        // 16 mph wind: too windy for GOOD, not enough for BAD.
        assert_eq!(rate_hour(2.0, 16.0, 20.0, 8.0, 0.6), ForecastRating::Mediocre);
    }

    #[test]
    fn test_period_ratio_compares_against_meters() {
        // 2.9 ft = 0.884 m; period 2.0 s passes against meters (>= 1.77)
        // but would fail against feet (>= 5.8).
        assert_eq!(rate_hour(2.9, 5.0, 5.0, 2.0, 0.884), ForecastRating::Good);
        // Period below 2 x meters drops to MEDIOCRE.
        assert_eq!(rate_hour(2.9, 5.0, 5.0, 1.5, 0.884), ForecastRating::Mediocre);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(rate_hour(4.0, 18.0, 25.0, 1.0, 1.22), ForecastRating::Mediocre);
        assert_eq!(rate_hour(3.0, 5.0, 5.0, 9.0, 0.91), ForecastRating::Mediocre);
    }

    #[test]
    fn test_raising_wave_height_across_four_feet_only_worsens() {
        let mut previous_bad = false;
        for tenth in 0..30 {
            let meters = tenth as f64 * 0.1;
            let rating = rate_raw(meters, 9.0, 10.0, 12.0).unwrap();
            let bad = rating == ForecastRating::Bad;
            assert!(
                !(previous_bad && !bad),
                "rating improved from BAD at {:.1} m",
                meters
            );
            assert_eq!(bad, meters_to_feet(meters).unwrap() > 4.0);
            previous_bad = bad;
        }
    }

    #[test]
    fn test_invalid_raw_input_is_rejected() {
        assert!(rate_raw(-0.5, 9.0, 10.0, 12.0).is_err());
        assert!(rate_raw(0.5, f64::NAN, 10.0, 12.0).is_err());
    }
}
