//! Unit conversion for rating thresholds.
//!
//! Thresholds are expressed in feet and mph. Feeds report meters and either
//! km/h or m/s; the caller states which via `SpeedUnit`, magnitudes are never
//! used to guess.

use crate::model::{ConditionsError, SpeedUnit};

pub const FEET_PER_METER: f64 = 3.28084;
pub const MPH_PER_KMH: f64 = 0.621371;
pub const MPH_PER_MS: f64 = 2.237;

/// Rejects negative and non-finite values.
pub fn ensure_physical(quantity: &'static str, value: f64) -> Result<f64, ConditionsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConditionsError::InvalidMeasurement { quantity, value })
    }
}

pub fn meters_to_feet(meters: f64) -> Result<f64, ConditionsError> {
    Ok(ensure_physical("wave_height_m", meters)? * FEET_PER_METER)
}

pub fn kmh_to_mph(kmh: f64) -> Result<f64, ConditionsError> {
    Ok(ensure_physical("speed_kmh", kmh)? * MPH_PER_KMH)
}

pub fn ms_to_mph(ms: f64) -> Result<f64, ConditionsError> {
    Ok(ensure_physical("speed_ms", ms)? * MPH_PER_MS)
}

impl SpeedUnit {
    /// Converts a speed in this unit to mph.
    pub fn to_mph(self, value: f64) -> Result<f64, ConditionsError> {
        match self {
            SpeedUnit::KilometersPerHour => kmh_to_mph(value),
            SpeedUnit::MetersPerSecond => ms_to_mph(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_meters_to_feet() {
        assert!(approx(meters_to_feet(1.0).unwrap(), 3.28084));
        assert!(approx(meters_to_feet(0.0).unwrap(), 0.0));
    }

    #[test]
    fn test_speed_conversions_use_source_specific_factors() {
        assert!(approx(kmh_to_mph(10.0).unwrap(), 6.21371));
        assert!(approx(ms_to_mph(10.0).unwrap(), 22.37));
        assert!(approx(SpeedUnit::KilometersPerHour.to_mph(10.0).unwrap(), 6.21371));
        assert!(approx(SpeedUnit::MetersPerSecond.to_mph(10.0).unwrap(), 22.37));
    }

    #[test]
    fn test_negative_input_fails_instead_of_clamping() {
        let err = meters_to_feet(-0.1).unwrap_err();
        assert!(matches!(err, ConditionsError::InvalidMeasurement { quantity: "wave_height_m", .. }));
        assert!(kmh_to_mph(-1.0).is_err());
    }

    #[test]
    fn test_non_finite_input_fails() {
        assert!(ms_to_mph(f64::NAN).is_err());
        assert!(ms_to_mph(f64::INFINITY).is_err());
        assert!(ensure_physical("wave_period_sec", f64::NEG_INFINITY).is_err());
    }
}
