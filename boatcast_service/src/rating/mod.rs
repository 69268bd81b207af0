/// Conditions rating engine.
///
/// Converts one hour's raw measurements into threshold units, rates the hour
/// with the rule set selected by the feed origin, and aggregates rated hours
/// into a day rating. Every function here is pure: no clock, no I/O, and no
/// state shared between hours.
///
/// Submodules:
/// - `forecast`: BAD / MEDIOCRE / GOOD rules for forecast feeds.
/// - `buoy`    : BAD / MEDIOCRE / GREAT rules for live buoy feeds.
/// - `daily`   : day aggregation.

pub mod buoy;
pub mod daily;
pub mod forecast;

pub use daily::rate_day;

use crate::model::{
    ConditionsError, HourRating, HourlyMeasurement, HourlyRating, RuleSet,
};
use crate::units::{ensure_physical, meters_to_feet};

/// One hour's values in threshold units, derived from a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertedHour {
    pub wave_height_m: f64,
    pub wave_height_ft: f64,
    pub wave_period_sec: f64,
    pub wind_speed_mph: f64,
    pub wind_gust_mph: f64,
}

impl ConvertedHour {
    /// Fails on the first missing or invalid field, in the order
    /// wave height, wave period, wind speed, wind gust.
    pub fn from_measurement(m: &HourlyMeasurement) -> Result<Self, ConditionsError> {
        let unit = m.origin.speed_unit();

        let wave_height_m = m.wave_height_m.require("wave_height_m")?;
        let wave_height_ft = meters_to_feet(wave_height_m)?;
        let wave_period_sec =
            ensure_physical("wave_period_sec", m.wave_period_sec.require("wave_period_sec")?)?;
        let wind_speed_mph = unit.to_mph(m.wind_speed.require("wind_speed")?)?;
        let wind_gust_mph = unit.to_mph(m.wind_gust.require("wind_gust")?)?;

        Ok(Self {
            wave_height_m,
            wave_height_ft,
            wave_period_sec,
            wind_speed_mph,
            wind_gust_mph,
        })
    }
}

/// Rates an hour with the rule set matching its feed origin.
pub fn classify_hour(m: &HourlyMeasurement) -> Result<HourRating, ConditionsError> {
    classify_hour_with(m.origin.rule_set(), m)
}

/// Rates an hour with an explicit rule set. Wind is still converted from
/// the unit the measurement's origin declares.
pub fn classify_hour_with(
    rule_set: RuleSet,
    m: &HourlyMeasurement,
) -> Result<HourRating, ConditionsError> {
    let c = ConvertedHour::from_measurement(m)?;

    let rating = match rule_set {
        RuleSet::Forecast => HourlyRating::Forecast(forecast::rate_hour(
            c.wave_height_ft,
            c.wind_speed_mph,
            c.wind_gust_mph,
            c.wave_period_sec,
            c.wave_height_m,
        )),
        RuleSet::Buoy => HourlyRating::Buoy(buoy::rate_hour(
            c.wave_height_ft,
            c.wave_period_sec,
            c.wind_speed_mph,
            c.wind_gust_mph,
        )),
    };

    Ok(HourRating {
        time: m.time,
        rating,
        wave_height_ft: c.wave_height_ft,
        wind_speed_mph: c.wind_speed_mph,
        wind_gust_mph: c.wind_gust_mph,
        wave_period_sec: c.wave_period_sec,
        precipitation_probability: m.precipitation_probability,
        visibility: m.visibility,
        rain: m.rain,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuoyRating, FeedOrigin, ForecastRating, Measured};
    use chrono::NaiveDate;

    fn measurement(origin: FeedOrigin, h: f64, p: f64, w: f64, g: f64) -> HourlyMeasurement {
        HourlyMeasurement::new(
            NaiveDate::from_ymd_opt(2025, 6, 14)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            origin,
            Measured::Present(h),
            Measured::Present(p),
            Measured::Present(w),
            Measured::Present(g),
        )
    }

    #[test]
    fn test_forecast_hour_keeps_converted_values() {
        let rated = classify_hour(&measurement(FeedOrigin::Forecast, 0.5, 9.0, 10.0, 12.0)).unwrap();
        assert_eq!(rated.rating, HourlyRating::Forecast(ForecastRating::Good));
        assert!((rated.wave_height_ft - 1.64042).abs() < 1e-4);
        assert!((rated.wind_speed_mph - 6.21371).abs() < 1e-4);
        assert!((rated.wind_gust_mph - 7.456452).abs() < 1e-4);
        assert_eq!(rated.wave_period_sec, 9.0);
    }

    #[test]
    fn test_origin_selects_unit_and_rule_set() {
        // 9 wind units: 5.6 mph as km/h, 20.1 mph as m/s.
        let forecast = classify_hour(&measurement(FeedOrigin::Forecast, 0.5, 9.0, 9.0, 9.0)).unwrap();
        let buoy = classify_hour(&measurement(FeedOrigin::Buoy, 0.5, 9.0, 9.0, 9.0)).unwrap();
        assert_eq!(forecast.rating, HourlyRating::Forecast(ForecastRating::Good));
        assert_eq!(buoy.rating, HourlyRating::Buoy(BuoyRating::Bad));
    }

    #[test]
    fn test_explicit_rule_set_overrides_origin_default() {
        let m = measurement(FeedOrigin::Forecast, 0.5, 9.0, 10.0, 12.0);
        let rated = classify_hour_with(RuleSet::Buoy, &m).unwrap();
        assert_eq!(rated.rating, HourlyRating::Buoy(BuoyRating::Great));
    }

    #[test]
    fn test_missing_wind_speed_is_an_error_not_calm() {
        let mut m = measurement(FeedOrigin::Buoy, 0.5, 9.0, 0.0, 1.0);
        assert!(classify_hour(&m).is_ok());

        m.wind_speed = Measured::Missing;
        assert_eq!(
            classify_hour(&m),
            Err(ConditionsError::MissingMeasurement { field: "wind_speed" })
        );
    }

    #[test]
    fn test_negative_wave_height_is_invalid() {
        let m = measurement(FeedOrigin::Forecast, -1.0, 9.0, 10.0, 12.0);
        assert!(matches!(
            classify_hour(&m),
            Err(ConditionsError::InvalidMeasurement { .. })
        ));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let m = measurement(FeedOrigin::Buoy, 1.1, 4.5, 6.0, 9.0);
        assert_eq!(classify_hour(&m), classify_hour(&m));
    }
}
