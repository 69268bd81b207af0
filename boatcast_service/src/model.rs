/// Core data types for the boating conditions service.
///
/// This module defines the shared domain model imported by all other modules:
/// measurements as they arrive from a feed, the ratings derived from them,
/// and the error types of the rating engine and its collaborators.
/// It contains no I/O.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Raw values
// ---------------------------------------------------------------------------

/// NDBC sentinel for a value the buoy did not report.
pub const MISSING_SENTINEL: &str = "MM";

/// A single physical value as reported by a feed.
///
/// `Missing` is an explicit state, distinct from `Present(0.0)`: a calm
/// reading of zero and an absent reading rate differently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measured {
    Present(f64),
    Missing,
}

impl Measured {
    /// Parses a raw column token. `"MM"` becomes `Missing`; any other
    /// non-numeric token is an error.
    pub fn from_raw(token: &str) -> Result<Measured, String> {
        let token = token.trim();
        if token == MISSING_SENTINEL {
            return Ok(Measured::Missing);
        }
        token
            .parse::<f64>()
            .map(Measured::Present)
            .map_err(|_| format!("unrecognised value '{}'", token))
    }

    /// Returns the value, or `MissingMeasurement` naming `field`.
    pub fn require(self, field: &'static str) -> Result<f64, ConditionsError> {
        match self {
            Measured::Present(v) => Ok(v),
            Measured::Missing => Err(ConditionsError::MissingMeasurement { field }),
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Measured::Present(v) => Some(v),
            Measured::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Measured::Missing)
    }
}

impl From<Option<f64>> for Measured {
    fn from(value: Option<f64>) -> Self {
        value.map(Measured::Present).unwrap_or(Measured::Missing)
    }
}

// ---------------------------------------------------------------------------
// Feed origin
// ---------------------------------------------------------------------------

/// Unit a feed reports wind speed and gust in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedUnit {
    KilometersPerHour,
    MetersPerSecond,
}

/// Which rule set rates an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// Three-tier BAD / MEDIOCRE / GOOD rules for forecast feeds.
    Forecast,
    /// BAD / MEDIOCRE / GREAT rules for live buoy feeds.
    Buoy,
}

/// The upstream feed that supplied a measurement. Determines both the
/// source speed unit and the default rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrigin {
    /// Open-Meteo weather + marine forecast (wind in km/h).
    Forecast,
    /// NDBC realtime buoy observations (wind in m/s).
    Buoy,
}

impl FeedOrigin {
    pub fn speed_unit(self) -> SpeedUnit {
        match self {
            FeedOrigin::Forecast => SpeedUnit::KilometersPerHour,
            FeedOrigin::Buoy => SpeedUnit::MetersPerSecond,
        }
    }

    pub fn rule_set(self) -> RuleSet {
        match self {
            FeedOrigin::Forecast => RuleSet::Forecast,
            FeedOrigin::Buoy => RuleSet::Buoy,
        }
    }
}

impl fmt::Display for FeedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedOrigin::Forecast => write!(f, "forecast"),
            FeedOrigin::Buoy => write!(f, "buoy"),
        }
    }
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// One hour of observed or forecast conditions at one location.
///
/// `time` is the civil date-time in the feed's own timezone (UTC for NDBC,
/// the location's configured zone for Open-Meteo). Wind fields are in the
/// unit given by `origin.speed_unit()`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyMeasurement {
    pub time: NaiveDateTime,
    pub origin: FeedOrigin,
    pub wave_height_m: Measured,
    pub wave_period_sec: Measured,
    pub wind_speed: Measured,
    pub wind_gust: Measured,
    // Display-only pass-through fields.
    pub precipitation_probability: Option<f64>,
    pub visibility: Option<f64>,
    pub rain: Option<f64>,
}

impl HourlyMeasurement {
    /// A measurement with no pass-through fields.
    pub fn new(
        time: NaiveDateTime,
        origin: FeedOrigin,
        wave_height_m: Measured,
        wave_period_sec: Measured,
        wind_speed: Measured,
        wind_gust: Measured,
    ) -> Self {
        Self {
            time,
            origin,
            wave_height_m,
            wave_period_sec,
            wind_speed,
            wind_gust,
            precipitation_probability: None,
            visibility: None,
            rain: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Hour rating produced by the forecast rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastRating {
    Bad,
    Mediocre,
    Good,
}

/// Hour rating produced by the buoy rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuoyRating {
    Bad,
    Mediocre,
    Great,
}

/// An hour rating tagged with the rule set that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HourlyRating {
    Forecast(ForecastRating),
    Buoy(BuoyRating),
}

impl HourlyRating {
    /// GOOD (forecast) or GREAT (buoy).
    pub fn is_favorable(self) -> bool {
        matches!(
            self,
            HourlyRating::Forecast(ForecastRating::Good) | HourlyRating::Buoy(BuoyRating::Great)
        )
    }

    pub fn is_bad(self) -> bool {
        matches!(
            self,
            HourlyRating::Forecast(ForecastRating::Bad) | HourlyRating::Buoy(BuoyRating::Bad)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            HourlyRating::Forecast(ForecastRating::Bad) | HourlyRating::Buoy(BuoyRating::Bad) => "BAD",
            HourlyRating::Forecast(ForecastRating::Mediocre)
            | HourlyRating::Buoy(BuoyRating::Mediocre) => "MEDIOCRE",
            HourlyRating::Forecast(ForecastRating::Good) => "GOOD",
            HourlyRating::Buoy(BuoyRating::Great) => "GREAT",
        }
    }
}

impl fmt::Display for HourlyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate rating for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayCondition {
    Bad,
    Mediocre,
    Good,
}

impl fmt::Display for DayCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayCondition::Bad => write!(f, "BAD"),
            DayCondition::Mediocre => write!(f, "MEDIOCRE"),
            DayCondition::Good => write!(f, "GOOD"),
        }
    }
}

/// The rating of a single hour together with the converted values that
/// produced it.
///
/// Converted values keep full precision; reports show them to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRating {
    #[serde(serialize_with = "serialize_hour_minute")]
    pub time: NaiveDateTime,
    pub rating: HourlyRating,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub wave_height_ft: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub wind_speed_mph: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub wind_gust_mph: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub wave_period_sec: f64,
    pub precipitation_probability: Option<f64>,
    pub visibility: Option<f64>,
    pub rain: Option<f64>,
}

/// All rated hours for one calendar day, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRating {
    pub date: NaiveDate,
    pub day_rating: DayCondition,
    /// Local sunrise and sunset, when the feed supplies them (forecasts only).
    #[serde(
        serialize_with = "serialize_sun_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub sunrise: Option<NaiveTime>,
    #[serde(
        serialize_with = "serialize_sun_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub sunset: Option<NaiveTime>,
    pub good_hours_count: usize,
    pub hours: Vec<HourRating>,
}

/// Sunrise and sunset for one civil date at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SunTimes {
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
}

fn serialize_hour_minute<S: Serializer>(time: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&time.format("%H:%M"))
}

fn serialize_sun_time<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => s.collect_str(&t.format("%H:%M")),
        None => s.serialize_none(),
    }
}

fn serialize_one_decimal<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((value * 10.0).round() / 10.0)
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the rating engine. All are deterministic input problems;
/// the caller decides whether to skip, log, or abort.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionsError {
    /// A field the rule set needs was reported as missing.
    MissingMeasurement { field: &'static str },
    /// A physical value was negative or not finite.
    InvalidMeasurement { quantity: &'static str, value: f64 },
    /// Day aggregation was asked to rate a day with no rated hours.
    EmptyInput { date: Option<NaiveDate> },
}

impl fmt::Display for ConditionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionsError::MissingMeasurement { field } => {
                write!(f, "Missing measurement: {}", field)
            }
            ConditionsError::InvalidMeasurement { quantity, value } => {
                write!(f, "Invalid measurement: {} = {}", quantity, value)
            }
            ConditionsError::EmptyInput { date: Some(date) } => {
                write!(f, "No rated hours for {}", date)
            }
            ConditionsError::EmptyInput { date: None } => write!(f, "No rated hours"),
        }
    }
}

impl std::error::Error for ConditionsError {}

/// Errors that can arise when fetching or parsing a feed.
#[derive(Debug, PartialEq)]
pub enum IngestError {
    /// Non-2xx HTTP response.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    Request(String),
    /// The response body did not have the expected shape.
    ParseError(String),
    /// The response parsed but contained no usable rows.
    NoDataAvailable(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::HttpError(code) => write!(f, "HTTP error: {}", code),
            IngestError::Request(msg) => write!(f, "Request failed: {}", msg),
            IngestError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            IngestError::NoDataAvailable(what) => write!(f, "No data available for {}", what),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => IngestError::HttpError(status.as_u16()),
            None => IngestError::Request(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
