/// Open-Meteo forecast client
///
/// Retrieves hourly wind forecasts from the weather API and hourly wave
/// forecasts from the marine API, then joins them on forecast hour.
/// Hours are requested in the location's own timezone and wind in km/h.
/// The weather request also carries daily sunrise and sunset.
///
/// API Documentation: https://open-meteo.com/en/docs
/// Marine API:        https://open-meteo.com/en/docs/marine-weather-api

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Url;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::config::{ForecastApiConfig, Location};
use crate::model::{FeedOrigin, HourlyMeasurement, IngestError, Measured, SunTimes};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

const WEATHER_VARIABLES: &str =
    "wind_speed_10m,wind_gusts_10m,precipitation_probability,visibility,rain";
const DAILY_WEATHER_VARIABLES: &str = "sunrise,sunset";
const MARINE_VARIABLES: &str = "wave_height,wave_period";

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    pub timezone: Option<String>,
    pub hourly: WeatherHourly,
    #[serde(default)]
    pub daily: Option<WeatherDaily>,
}

/// Column-oriented hourly series; `null` entries are unreported hours.
#[derive(Debug, Deserialize)]
pub struct WeatherHourly {
    pub time: Vec<String>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_gusts_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
    #[serde(default)]
    pub rain: Vec<Option<f64>>,
}

/// Daily series; sunrise and sunset are local `YYYY-MM-DDTHH:MM` strings.
#[derive(Debug, Deserialize)]
pub struct WeatherDaily {
    pub time: Vec<String>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct MarineResponse {
    pub hourly: MarineHourly,
}

#[derive(Debug, Deserialize)]
pub struct MarineHourly {
    pub time: Vec<String>,
    #[serde(default)]
    pub wave_height: Vec<Option<f64>>,
    #[serde(default)]
    pub wave_period: Vec<Option<f64>>,
}

// ============================================================================
// URL Construction
// ============================================================================

fn build_url(
    base_url: &str,
    location: &Location,
    hourly: &str,
    forecast_days: u32,
    extra: &[(&str, &str)],
) -> Result<Url, IngestError> {
    let mut params: Vec<(&str, String)> = vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("hourly", hourly.to_string()),
        ("timezone", location.timezone.clone()),
        ("forecast_days", forecast_days.to_string()),
    ];
    params.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));

    Url::parse_with_params(base_url, &params)
        .map_err(|e| IngestError::ParseError(format!("invalid URL '{}': {}", base_url, e)))
}

pub fn build_weather_url(
    base_url: &str,
    location: &Location,
    forecast_days: u32,
) -> Result<Url, IngestError> {
    build_url(
        base_url,
        location,
        WEATHER_VARIABLES,
        forecast_days,
        &[
            ("daily", DAILY_WEATHER_VARIABLES),
            ("wind_speed_unit", "kmh"),
        ],
    )
}

pub fn build_marine_url(
    base_url: &str,
    location: &Location,
    forecast_days: u32,
) -> Result<Url, IngestError> {
    build_url(base_url, location, MARINE_VARIABLES, forecast_days, &[])
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Merged hourly forecast plus the sun times of each forecast date.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFeed {
    pub hours: Vec<HourlyMeasurement>,
    pub sun_times: BTreeMap<NaiveDate, SunTimes>,
}

/// Fetch and merge weather and marine forecasts for one location.
pub fn fetch_forecast(
    client: &reqwest::blocking::Client,
    api: &ForecastApiConfig,
    location: &Location,
) -> Result<ForecastFeed, IngestError> {
    let weather_url = build_weather_url(&api.weather_url, location, api.forecast_days)?;
    let marine_url = build_marine_url(&api.marine_url, location, api.forecast_days)?;

    let weather_body =
        super::get_text_with_retry(client, weather_url.as_str(), api.retries, api.backoff_secs)?;
    let marine_body =
        super::get_text_with_retry(client, marine_url.as_str(), api.retries, api.backoff_secs)?;

    let weather = parse_weather(&weather_body)?;
    let marine = parse_marine(&marine_body)?;

    let hours = merge_forecast(&weather, &marine)?;
    if hours.is_empty() {
        return Err(IngestError::NoDataAvailable(location.name.clone()));
    }
    let sun_times = parse_sun_times(&weather)?;
    Ok(ForecastFeed { hours, sun_times })
}

pub fn parse_weather(body: &str) -> Result<WeatherResponse, IngestError> {
    serde_json::from_str(body)
        .map_err(|e| IngestError::ParseError(format!("weather response: {}", e)))
}

pub fn parse_marine(body: &str) -> Result<MarineResponse, IngestError> {
    serde_json::from_str(body)
        .map_err(|e| IngestError::ParseError(format!("marine response: {}", e)))
}

/// Join weather and marine series on forecast hour.
///
/// Only hours present in both series are kept, in weather-series order.
/// A `null` or absent entry becomes `Measured::Missing`.
pub fn merge_forecast(
    weather: &WeatherResponse,
    marine: &MarineResponse,
) -> Result<Vec<HourlyMeasurement>, IngestError> {
    let mut waves: HashMap<NaiveDateTime, (Measured, Measured)> = HashMap::new();
    for (i, raw) in marine.hourly.time.iter().enumerate() {
        let time = parse_time(raw)?;
        waves.insert(
            time,
            (
                column_value(&marine.hourly.wave_height, i),
                column_value(&marine.hourly.wave_period, i),
            ),
        );
    }

    let w = &weather.hourly;
    let mut hours = Vec::with_capacity(w.time.len());
    for (i, raw) in w.time.iter().enumerate() {
        let time = parse_time(raw)?;
        let Some(&(wave_height_m, wave_period_sec)) = waves.get(&time) else {
            continue;
        };

        let mut m = HourlyMeasurement::new(
            time,
            FeedOrigin::Forecast,
            wave_height_m,
            wave_period_sec,
            column_value(&w.wind_speed_10m, i),
            column_value(&w.wind_gusts_10m, i),
        );
        m.precipitation_probability = column_value(&w.precipitation_probability, i).value();
        m.visibility = column_value(&w.visibility, i).value();
        m.rain = column_value(&w.rain, i).value();
        hours.push(m);
    }

    Ok(hours)
}

/// Sunrise and sunset per date from the daily series. A response without
/// a daily block yields an empty map; a `null` entry stays `None`.
pub fn parse_sun_times(
    weather: &WeatherResponse,
) -> Result<BTreeMap<NaiveDate, SunTimes>, IngestError> {
    let Some(daily) = &weather.daily else {
        return Ok(BTreeMap::new());
    };

    let mut out = BTreeMap::new();
    for (i, raw) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|e| IngestError::ParseError(format!("forecast date '{}': {}", raw, e)))?;
        out.insert(
            date,
            SunTimes {
                sunrise: sun_time(&daily.sunrise, i)?,
                sunset: sun_time(&daily.sunset, i)?,
            },
        );
    }
    Ok(out)
}

fn sun_time(column: &[Option<String>], i: usize) -> Result<Option<NaiveTime>, IngestError> {
    match column.get(i) {
        Some(Some(raw)) => Ok(Some(parse_time(raw)?.time())),
        _ => Ok(None),
    }
}

fn parse_time(raw: &str) -> Result<NaiveDateTime, IngestError> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|e| IngestError::ParseError(format!("forecast time '{}': {}", raw, e)))
}

fn column_value(column: &[Option<f64>], i: usize) -> Measured {
    Measured::from(column.get(i).copied().flatten())
}

// ============================================================================
// Tests
// ============================================================================
