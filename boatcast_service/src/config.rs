/// Service configuration loader.
///
/// Loads forecast locations, buoy stations, feed endpoints, and report
/// paths from `boatcast.toml`. Coordinates live only here and are handed to
/// the fetchers explicitly; the rating engine takes no configuration.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Default path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "boatcast.toml";

/// Longest window the Open-Meteo APIs serve.
pub const MAX_FORECAST_DAYS: u32 = 16;

// ============================================================================
// TOML Configuration Structures
// ============================================================================

/// Root TOML structure
#[derive(Debug, Clone, Deserialize)]
pub struct BoatcastConfig {
    #[serde(default)]
    pub forecast: ForecastApiConfig,
    #[serde(default)]
    pub ndbc: NdbcConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub buoys: Vec<BuoyStation>,
}

/// A coastal location rated from forecast data.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Location {
    pub name: String,
    pub region: String,
    /// IANA zone the forecast hours are expressed in, e.g. "America/Puerto_Rico".
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// An NDBC buoy rated from live observations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BuoyStation {
    pub station_id: String,
    pub name: String,
}

/// Open-Meteo endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastApiConfig {
    pub weather_url: String,
    pub marine_url: String,
    pub forecast_days: u32,
    pub timeout_secs: u64,
    pub retries: u32,
    pub backoff_secs: f64,
}

impl Default for ForecastApiConfig {
    fn default() -> Self {
        Self {
            weather_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            marine_url: "https://marine-api.open-meteo.com/v1/marine".to_string(),
            forecast_days: MAX_FORECAST_DAYS,
            timeout_secs: 30,
            retries: 5,
            backoff_secs: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NdbcConfig {
    pub realtime_url: String,
}

impl Default for NdbcConfig {
    fn default() -> Self {
        Self {
            realtime_url: "https://www.ndbc.noaa.gov/data/realtime2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: String,
    pub all_json: String,
    pub good_json: String,
    pub html: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            all_json: "all_boating_conditions.json".to_string(),
            good_json: "good_boating_days.json".to_string(),
            html: "all_boating_conditions.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: true,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The file is not valid TOML or does not match the schema.
    Parse(String),
    /// The file parsed but a value is out of range or duplicated.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Read and validate a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BoatcastConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<BoatcastConfig, ConfigError> {
    let config: BoatcastConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl BoatcastConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.forecast_days == 0 || self.forecast.forecast_days > MAX_FORECAST_DAYS {
            return Err(ConfigError::Invalid(format!(
                "forecast_days must be 1..={}, got {}",
                MAX_FORECAST_DAYS, self.forecast.forecast_days
            )));
        }
        if !self.forecast.backoff_secs.is_finite() || self.forecast.backoff_secs < 0.0 {
            return Err(ConfigError::Invalid("backoff_secs must be non-negative".to_string()));
        }

        let mut names = HashSet::new();
        for loc in &self.locations {
            if loc.name.trim().is_empty() {
                return Err(ConfigError::Invalid("location name is empty".to_string()));
            }
            if !names.insert(loc.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate location '{}'", loc.name)));
            }
            if !(-90.0..=90.0).contains(&loc.latitude) {
                return Err(ConfigError::Invalid(format!(
                    "latitude {} out of range for '{}'",
                    loc.latitude, loc.name
                )));
            }
            if !(-180.0..=180.0).contains(&loc.longitude) {
                return Err(ConfigError::Invalid(format!(
                    "longitude {} out of range for '{}'",
                    loc.longitude, loc.name
                )));
            }
        }

        let mut ids = HashSet::new();
        for buoy in &self.buoys {
            if buoy.station_id.trim().is_empty() {
                return Err(ConfigError::Invalid("buoy station_id is empty".to_string()));
            }
            if !ids.insert(buoy.station_id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate buoy station '{}'",
                    buoy.station_id
                )));
            }
            // Reports are keyed by name across both feeds.
            if self.find_location(&buoy.name).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "buoy '{}' has the same name as a location",
                    buoy.name
                )));
            }
        }

        Ok(())
    }

    /// Looks up a location by name (case-insensitive).
    pub fn find_location(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a buoy by station id or name (case-insensitive).
    pub fn find_buoy(&self, name: &str) -> Option<&BuoyStation> {
        self.buoys.iter().find(|b| {
            b.station_id.eq_ignore_ascii_case(name) || b.name.eq_ignore_ascii_case(name)
        })
    }

    /// Resolves an optional `--location` filter against both lists.
    ///
    /// `None` selects everything. A name that matches neither a location
    /// nor a buoy is an error.
    pub fn select(&self, only: Option<&str>) -> Result<Selection<'_>, ConfigError> {
        let Some(name) = only else {
            return Ok(Selection {
                locations: self.locations.iter().collect(),
                buoys: self.buoys.iter().collect(),
            });
        };

        let selection = Selection {
            locations: self.find_location(name).into_iter().collect(),
            buoys: self.find_buoy(name).into_iter().collect(),
        };
        if selection.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "unknown location or buoy '{}'",
                name
            )));
        }
        Ok(selection)
    }
}

/// The locations and buoys a run will rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub locations: Vec<&'a Location>,
    pub buoys: Vec<&'a BuoyStation>,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.buoys.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [forecast]
        forecast_days = 7

        [report]
        output_dir = "reports"

        [[locations]]
        name = "San Juan"
        region = "Puerto Rico"
        timezone = "America/Puerto_Rico"
        latitude = 18.4669
        longitude = -66.0899

        [[locations]]
        name = "Aguadilla"
        region = "Puerto Rico"
        timezone = "America/Puerto_Rico"
        latitude = 18.376
        longitude = -67.280

        [[buoys]]
        station_id = "41056"
        name = "NDBC 41056"
    "#;

    #[test]
    fn test_sample_config_parses_with_defaults() {
        let config = parse_config(SAMPLE).expect("sample config should parse");
        assert_eq!(config.locations.len(), 2);
        assert_eq!(config.buoys[0].station_id, "41056");
        assert_eq!(config.forecast.forecast_days, 7);
        assert_eq!(config.forecast.retries, 5, "unset fields take defaults");
        assert_eq!(config.report.output_dir, "reports");
        assert_eq!(config.report.html, "all_boating_conditions.html");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_find_location_is_case_insensitive() {
        let config = parse_config(SAMPLE).unwrap();
        let loc = config.find_location("aguadilla").expect("Aguadilla configured");
        assert_eq!(loc.longitude, -67.280);
        assert!(config.find_location("Rincon").is_none());
    }

    #[test]
    fn test_out_of_range_latitude_is_rejected() {
        let bad = SAMPLE.replace("18.4669", "118.4669");
        assert!(matches!(parse_config(&bad), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_forecast_days_beyond_api_window_is_rejected() {
        let bad = SAMPLE.replace("forecast_days = 7", "forecast_days = 30");
        assert!(matches!(parse_config(&bad), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_location_is_rejected() {
        let bad = SAMPLE.replace("name = \"Aguadilla\"", "name = \"San Juan\"");
        assert!(matches!(parse_config(&bad), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_buoy_sharing_a_location_name_is_rejected() {
        let bad = SAMPLE.replace("name = \"NDBC 41056\"", "name = \"san juan\"");
        assert!(
            matches!(parse_config(&bad), Err(ConfigError::Invalid(_))),
            "a shared name would collide in the reports"
        );
    }

    #[test]
    fn test_select_without_filter_takes_everything() {
        let config = parse_config(SAMPLE).unwrap();
        let selection = config.select(None).unwrap();
        assert_eq!(selection.locations.len(), 2);
        assert_eq!(selection.buoys.len(), 1);
    }

    #[test]
    fn test_select_matches_locations_and_buoys() {
        let config = parse_config(SAMPLE).unwrap();

        let by_location = config.select(Some("AGUADILLA")).unwrap();
        assert_eq!(by_location.locations[0].name, "Aguadilla");
        assert!(by_location.buoys.is_empty());

        let by_station = config.select(Some("41056")).unwrap();
        assert!(by_station.locations.is_empty());
        assert_eq!(by_station.buoys[0].name, "NDBC 41056");

        let by_buoy_name = config.select(Some("ndbc 41056")).unwrap();
        assert_eq!(by_buoy_name.buoys.len(), 1);
    }

    #[test]
    fn test_select_unknown_name_is_invalid() {
        let config = parse_config(SAMPLE).unwrap();
        assert!(matches!(config.select(Some("nowhere")), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        assert!(matches!(parse_config("[[locations]\nname="), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        assert!(matches!(
            load_config("/nonexistent/boatcast.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
