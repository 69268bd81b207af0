//! BAD / MEDIOCRE / GREAT hour rating for live buoy observations.
//!
//! Buoy wind is reported in m/s and converted with the 2.237 factor.
//! BAD is checked before GREAT; anything else is MEDIOCRE.
//!
//! Unlike the forecast rules, the GREAT period ratio compares the period in
//! seconds against the wave height in feet.

use crate::model::{BuoyRating, ConditionsError, SpeedUnit};
use crate::units::{ensure_physical, meters_to_feet};

pub const BAD_WAVE_HEIGHT_MIN_FT: f64 = 4.0;
/// Short-period chop: below this period, waves over `CHOP_WAVE_HEIGHT_MIN_FT` are BAD.
pub const CHOP_PERIOD_MAX_SEC: f64 = 5.0;
pub const CHOP_WAVE_HEIGHT_MIN_FT: f64 = 3.0;
/// Long-period swell: above this period, waves over `BAD_WAVE_HEIGHT_MIN_FT` are BAD.
pub const SWELL_PERIOD_MIN_SEC: f64 = 10.0;
pub const BAD_WIND_SPEED_MIN_MPH: f64 = 18.0;
pub const BAD_WIND_GUST_MIN_MPH: f64 = 25.0;

pub const GREAT_WAVE_HEIGHT_MAX_FT: f64 = 2.0;
pub const GREAT_PERIOD_MIN_SEC: f64 = 7.0;
pub const GREAT_WIND_SPEED_MAX_MPH: f64 = 10.0;
pub const GREAT_WIND_GUST_MAX_MPH: f64 = 15.0;
pub const GREAT_PERIOD_PER_HEIGHT_FT: f64 = 2.0;

/// Rates one hour from already-converted values.
pub fn rate_hour(
    wave_height_ft: f64,
    wave_period_sec: f64,
    wind_speed_mph: f64,
    wind_gust_mph: f64,
) -> BuoyRating {
    if is_bad(wave_height_ft, wave_period_sec, wind_speed_mph, wind_gust_mph) {
        BuoyRating::Bad
    } else if is_great(wave_height_ft, wave_period_sec, wind_speed_mph, wind_gust_mph) {
        BuoyRating::Great
    } else {
        BuoyRating::Mediocre
    }
}

/// Rates one hour from raw buoy units (meters, seconds, m/s).
pub fn rate_raw(
    wave_height_m: f64,
    wave_period_sec: f64,
    wind_speed_ms: f64,
    wind_gust_ms: f64,
) -> Result<BuoyRating, ConditionsError> {
    let wave_height_ft = meters_to_feet(wave_height_m)?;
    let wave_period_sec = ensure_physical("wave_period_sec", wave_period_sec)?;
    let wind_speed_mph = SpeedUnit::MetersPerSecond.to_mph(wind_speed_ms)?;
    let wind_gust_mph = SpeedUnit::MetersPerSecond.to_mph(wind_gust_ms)?;
    Ok(rate_hour(wave_height_ft, wave_period_sec, wind_speed_mph, wind_gust_mph))
}

fn is_bad(wave_height_ft: f64, wave_period_sec: f64, wind_speed_mph: f64, wind_gust_mph: f64) -> bool {
    let steep_chop = wave_period_sec < CHOP_PERIOD_MAX_SEC && wave_height_ft > CHOP_WAVE_HEIGHT_MIN_FT;
    let heavy_swell = wave_period_sec > SWELL_PERIOD_MIN_SEC && wave_height_ft > BAD_WAVE_HEIGHT_MIN_FT;

    wave_height_ft > BAD_WAVE_HEIGHT_MIN_FT
        || steep_chop
        || heavy_swell
        || wind_speed_mph > BAD_WIND_SPEED_MIN_MPH
        || wind_gust_mph > BAD_WIND_GUST_MIN_MPH
}

fn is_great(wave_height_ft: f64, wave_period_sec: f64, wind_speed_mph: f64, wind_gust_mph: f64) -> bool {
    wave_height_ft < GREAT_WAVE_HEIGHT_MAX_FT
        && wave_period_sec > GREAT_PERIOD_MIN_SEC
        && wind_speed_mph < GREAT_WIND_SPEED_MAX_MPH
        && wind_gust_mph < GREAT_WIND_GUST_MAX_MPH
        && wave_period_sec >= GREAT_PERIOD_PER_HEIGHT_FT * wave_height_ft
}
