use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use boatcast_service::analysis::{self, LocationConditions};
use boatcast_service::config::{self, BoatcastConfig, BuoyStation, ConfigError, Location, Selection};
use boatcast_service::ingest::{self, ndbc, open_meteo};
use boatcast_service::logging::{self, FeedSource, LogLevel};
use boatcast_service::model::FeedOrigin;
use boatcast_service::report;

/// Rate boating conditions from buoy observations and marine forecasts.
#[derive(Parser, Debug)]
#[command(name = "boatcast", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "BOATCAST_CONFIG", default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Which feeds to rate
    #[arg(long, value_enum, default_value_t = Feed::All)]
    feed: Feed,

    /// Output directory for reports (overrides [report].output_dir)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Only rate the named location or buoy (name or station id)
    #[arg(long)]
    location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Feed {
    Forecast,
    Buoy,
    All,
}

impl Feed {
    fn includes(self, origin: FeedOrigin) -> bool {
        match self {
            Feed::All => true,
            Feed::Forecast => origin == FeedOrigin::Forecast,
            Feed::Buoy => origin == FeedOrigin::Buoy,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = config::load_config(&args.config)?;

    let level = LogLevel::parse(&config.logging.level).unwrap_or(LogLevel::Info);
    if let Err(e) = logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    // Resolve the filter before fetching so a bad name never rewrites reports.
    let selection = select_for_feed(&config, args.feed, args.location.as_deref())?;

    let client = ingest::build_client(config.forecast.timeout_secs)?;
    let mut results = rate_forecast_locations(&client, &config, &selection.locations);
    results.extend(rate_buoys(&client, &config, &selection.buoys));

    let good = analysis::find_good_days(&results);
    println!("{}", report::summary::render(&results, &good));

    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.report.output_dir));
    let written = report::write_reports(&out_dir, &config.report, &results, &good)?;
    logging::info(
        FeedSource::Report,
        None,
        &format!("HTML report generated: {}", written.html.display()),
    );

    Ok(())
}

/// Resolve `--location` against the config and drop whatever `--feed`
/// excludes. Fails when nothing is left to rate.
fn select_for_feed<'a>(
    config: &'a BoatcastConfig,
    feed: Feed,
    only: Option<&str>,
) -> Result<Selection<'a>, ConfigError> {
    let mut selection = config.select(only)?;
    if !feed.includes(FeedOrigin::Forecast) {
        selection.locations.clear();
    }
    if !feed.includes(FeedOrigin::Buoy) {
        selection.buoys.clear();
    }

    if selection.is_empty() {
        let what = only.unwrap_or("the configuration");
        return Err(ConfigError::Invalid(format!(
            "nothing in {} to rate for --feed {:?}",
            what, feed
        )));
    }
    Ok(selection)
}

fn rate_forecast_locations(
    client: &reqwest::blocking::Client,
    config: &BoatcastConfig,
    locations: &[&Location],
) -> Vec<LocationConditions> {
    let mut results = Vec::new();
    let mut failed = 0;

    for loc in locations {
        logging::info(
            FeedSource::OpenMeteo,
            Some(loc.name.as_str()),
            &format!("Processing location: {}, {}", loc.name, loc.region),
        );
        match open_meteo::fetch_forecast(client, &config.forecast, loc) {
            Ok(feed) => results.push(
                analysis::rate_location(&loc.name, &loc.region, FeedOrigin::Forecast, feed.hours)
                    .with_sun_times(&feed.sun_times),
            ),
            Err(e) => {
                logging::log_fetch_failure(FeedSource::OpenMeteo, &loc.name, "forecast fetch", &e);
                failed += 1;
            }
        }
    }

    if !locations.is_empty() {
        logging::log_run_summary(FeedSource::OpenMeteo, locations.len(), results.len(), failed);
    }
    results
}

fn rate_buoys(
    client: &reqwest::blocking::Client,
    config: &BoatcastConfig,
    buoys: &[&BuoyStation],
) -> Vec<LocationConditions> {
    let mut results = Vec::new();
    let mut failed = 0;

    for buoy in buoys {
        logging::info(
            FeedSource::Ndbc,
            Some(buoy.station_id.as_str()),
            &format!("Processing station {}", buoy.station_id),
        );
        let fetched = ndbc::fetch_realtime(
            client,
            &config.ndbc.realtime_url,
            &buoy.station_id,
            config.forecast.retries,
            config.forecast.backoff_secs,
        );
        match fetched {
            Ok(hours) => {
                let (waves, wind) = analysis::statistics::summarize_feed(&hours);
                logging::info(
                    FeedSource::Ndbc,
                    Some(buoy.station_id.as_str()),
                    &format!(
                        "{} hours; mean wave height {} m, mean wind speed {} m/s",
                        hours.len(),
                        format_mean(waves.mean),
                        format_mean(wind.mean)
                    ),
                );
                results.push(analysis::rate_location(
                    &buoy.name,
                    &format!("station {}", buoy.station_id),
                    FeedOrigin::Buoy,
                    hours,
                ));
            }
            Err(e) => {
                logging::log_fetch_failure(FeedSource::Ndbc, &buoy.station_id, "realtime fetch", &e);
                failed += 1;
            }
        }
    }

    if !buoys.is_empty() {
        logging::log_run_summary(FeedSource::Ndbc, buoys.len(), results.len(), failed);
    }
    results
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map(|m| format!("{:.2}", m)).unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        [[locations]]
        name = "San Juan"
        region = "Puerto Rico"
        timezone = "America/Puerto_Rico"
        latitude = 18.4669
        longitude = -66.0899

        [[buoys]]
        station_id = "41056"
        name = "NDBC 41056"
    "#;

    #[test]
    fn test_unknown_location_fails_for_every_feed() {
        let config = config::parse_config(CONFIG).unwrap();
        for feed in [Feed::Forecast, Feed::Buoy, Feed::All] {
            assert!(
                matches!(select_for_feed(&config, feed, Some("nowhere")), Err(ConfigError::Invalid(_))),
                "--feed {:?} accepted an unknown name",
                feed
            );
        }
    }

    #[test]
    fn test_location_outside_requested_feed_fails() {
        let config = config::parse_config(CONFIG).unwrap();
        assert!(select_for_feed(&config, Feed::Buoy, Some("San Juan")).is_err());
        assert!(select_for_feed(&config, Feed::Forecast, Some("41056")).is_err());
    }

    #[test]
    fn test_feed_filter_keeps_matching_side() {
        let config = config::parse_config(CONFIG).unwrap();

        let buoys = select_for_feed(&config, Feed::Buoy, None).unwrap();
        assert!(buoys.locations.is_empty());
        assert_eq!(buoys.buoys.len(), 1);

        let one = select_for_feed(&config, Feed::All, Some("san juan")).unwrap();
        assert_eq!(one.locations.len(), 1);
        assert!(one.buoys.is_empty());
    }

    #[test]
    fn test_empty_config_has_nothing_to_rate() {
        let config = config::parse_config("").unwrap();
        assert!(select_for_feed(&config, Feed::All, None).is_err());
    }
}
