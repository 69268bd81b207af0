/// Feed clients for the boating conditions service.
///
/// Each submodule fetches one upstream feed and parses it into
/// `HourlyMeasurement`s tagged with the feed's origin:
/// - `ndbc`      : NDBC realtime2 buoy observations (wind in m/s).
/// - `open_meteo`: Open-Meteo weather + marine forecasts (wind in km/h).

pub mod ndbc;
pub mod open_meteo;

use std::thread;
use std::time::Duration;

use crate::model::IngestError;

/// Build the blocking HTTP client shared by all feeds.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::blocking::Client, IngestError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("boatcast_service/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(IngestError::from)
}

/// Transport failures and 5xx responses are worth another attempt;
/// 4xx and parse failures are not.
pub fn is_retryable(err: &IngestError) -> bool {
    match err {
        IngestError::Request(_) => true,
        IngestError::HttpError(code) => *code >= 500,
        IngestError::ParseError(_) | IngestError::NoDataAvailable(_) => false,
    }
}

/// Delay before retry number `attempt` (1-based).
pub fn backoff_delay(backoff_secs: f64, attempt: u32) -> Duration {
    let factor = 2f64.powi(attempt.saturating_sub(1) as i32);
    Duration::from_secs_f64(backoff_secs * factor)
}

/// GET `url` and return the body, retrying up to `retries` extra times.
pub fn get_text_with_retry(
    client: &reqwest::blocking::Client,
    url: &str,
    retries: u32,
    backoff_secs: f64,
) -> Result<String, IngestError> {
    let mut attempt = 0;
    loop {
        match get_text(client, url) {
            Ok(body) => return Ok(body),
            Err(err) if attempt < retries && is_retryable(&err) => {
                attempt += 1;
                tracing::debug!(%url, attempt, error = %err, "retrying request");
                thread::sleep(backoff_delay(backoff_secs, attempt));
            }
            Err(err) => return Err(err),
        }
    }
}

fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, IngestError> {
    let response = client.get(url).send()?;

    if !response.status().is_success() {
        return Err(IngestError::HttpError(response.status().as_u16()));
    }

    Ok(response.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_and_server_errors_are_retried() {
        assert!(is_retryable(&IngestError::Request("connection reset".into())));
        assert!(is_retryable(&IngestError::HttpError(503)));
        assert!(!is_retryable(&IngestError::HttpError(404)));
        assert!(!is_retryable(&IngestError::ParseError("bad".into())));
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(0.2, 1), Duration::from_secs_f64(0.2));
        assert_eq!(backoff_delay(0.2, 2), Duration::from_secs_f64(0.4));
        assert_eq!(backoff_delay(0.2, 3), Duration::from_secs_f64(0.8));
        assert_eq!(backoff_delay(0.0, 4), Duration::ZERO);
    }
}
