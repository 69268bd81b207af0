/// NDBC (National Data Buoy Center) realtime2 client
///
/// Retrieves the last 45 days of standard meteorological observations for a
/// buoy as whitespace-separated text, newest row first, times in UTC:
///
/// ```text
/// #YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS PTDY  TIDE
/// #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi  hPa    ft
/// 2025 06 14 13 50  90  4.0  5.0   0.6     9   6.1  85 1016.0  28.1  28.6  23.4   MM -0.5    MM
/// ```
///
/// Unreported values are written as `MM`.
///
/// Data description: https://www.ndbc.noaa.gov/faq/measdes.shtml

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeMap;

use crate::model::{FeedOrigin, HourlyMeasurement, IngestError, Measured};

/// Rows shorter than this are truncated and skipped.
const MIN_COLUMNS: usize = 19;

const COL_WSPD: usize = 6;
const COL_GST: usize = 7;
const COL_WVHT: usize = 8;
const COL_DPD: usize = 9;
const COL_VIS: usize = 16;

// ============================================================================
// Parsed rows
// ============================================================================

/// One 10-minute (or hourly) observation row.
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeRow {
    pub time: NaiveDateTime,
    pub wind_speed_ms: Measured,
    pub wind_gust_ms: Measured,
    pub wave_height_m: Measured,
    pub dominant_period_sec: Measured,
    pub visibility_nmi: Measured,
}

// ============================================================================
// API Client Functions
// ============================================================================

pub fn build_realtime_url(base_url: &str, station_id: &str) -> String {
    format!("{}/{}.txt", base_url.trim_end_matches('/'), station_id)
}

/// Fetch a buoy's realtime file and reduce it to hourly measurements.
pub fn fetch_realtime(
    client: &reqwest::blocking::Client,
    base_url: &str,
    station_id: &str,
    retries: u32,
    backoff_secs: f64,
) -> Result<Vec<HourlyMeasurement>, IngestError> {
    let url = build_realtime_url(base_url, station_id);
    let text = super::get_text_with_retry(client, &url, retries, backoff_secs)?;

    let rows = parse_realtime(&text)?;
    if rows.is_empty() {
        return Err(IngestError::NoDataAvailable(format!("buoy {}", station_id)));
    }

    Ok(collapse_to_hours(rows))
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse realtime2 text into rows, in file order.
pub fn parse_realtime(text: &str) -> Result<Vec<RealtimeRow>, IngestError> {
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_COLUMNS {
            continue;
        }

        let line_no = i + 1;
        let measured = |col: usize| {
            Measured::from_raw(fields[col])
                .map_err(|e| IngestError::ParseError(format!("line {}: {}", line_no, e)))
        };

        rows.push(RealtimeRow {
            time: parse_row_time(&fields, line_no)?,
            wind_speed_ms: measured(COL_WSPD)?,
            wind_gust_ms: measured(COL_GST)?,
            wave_height_m: measured(COL_WVHT)?,
            dominant_period_sec: measured(COL_DPD)?,
            visibility_nmi: measured(COL_VIS)?,
        });
    }

    Ok(rows)
}

fn parse_row_time(fields: &[&str], line_no: usize) -> Result<NaiveDateTime, IngestError> {
    let bad = || IngestError::ParseError(format!("line {}: invalid timestamp", line_no));
    let num = |i: usize| fields[i].parse::<u32>().map_err(|_| bad());

    let year = fields[0].parse::<i32>().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, num(1)?, num(2)?)
        .and_then(|d| d.and_hms_opt(num(3).ok()?, num(4).ok()?, 0))
        .ok_or_else(bad)
}

/// Reduce rows to one measurement per clock hour.
///
/// Wind is reported every 10 minutes but waves usually once or twice an
/// hour, so each field takes the most recent value present within the hour.
/// The measurement's time is the top of the hour. Output is chronological.
pub fn collapse_to_hours(mut rows: Vec<RealtimeRow>) -> Vec<HourlyMeasurement> {
    rows.sort_by_key(|r| r.time);

    let mut hours: BTreeMap<NaiveDateTime, HourlyMeasurement> = BTreeMap::new();
    for row in rows {
        let Some(hour_start) = row.time.date().and_hms_opt(row.time.hour(), 0, 0) else {
            continue;
        };

        let entry = hours.entry(hour_start).or_insert_with(|| {
            HourlyMeasurement::new(
                hour_start,
                FeedOrigin::Buoy,
                Measured::Missing,
                Measured::Missing,
                Measured::Missing,
                Measured::Missing,
            )
        });

        overwrite_if_present(&mut entry.wave_height_m, row.wave_height_m);
        overwrite_if_present(&mut entry.wave_period_sec, row.dominant_period_sec);
        overwrite_if_present(&mut entry.wind_speed, row.wind_speed_ms);
        overwrite_if_present(&mut entry.wind_gust, row.wind_gust_ms);
        if let Some(vis) = row.visibility_nmi.value() {
            entry.visibility = Some(vis);
        }
    }

    hours.into_values().collect()
}

fn overwrite_if_present(slot: &mut Measured, value: Measured) {
    if !value.is_missing() {
        *slot = value;
    }
}

// ============================================================================
// Tests
// ============================================================================
