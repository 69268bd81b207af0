/// Per-location rating pipeline for the boating conditions service.
///
/// Groups a feed's hourly measurements by civil date, rates each hour, and
/// aggregates each date. Hours that cannot be rated are logged and skipped,
/// never defaulted.
///
/// Submodules:
/// - `statistics`: summary statistics of a measured field.

pub mod statistics;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::logging;
use crate::model::{
    DayCondition, DayRating, FeedOrigin, HourRating, HourlyMeasurement, SunTimes,
};
use crate::rating::{classify_hour, rate_day};

/// All rated days for one location or buoy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationConditions {
    pub name: String,
    pub region: String,
    pub origin: FeedOrigin,
    pub days: Vec<DayRating>,
    /// Hours dropped for missing or invalid measurements.
    pub skipped_hours: usize,
}

impl LocationConditions {
    pub fn good_days(&self) -> impl Iterator<Item = &DayRating> {
        self.days.iter().filter(|d| d.day_rating == DayCondition::Good)
    }

    /// Copy sunrise and sunset onto each rated day that has an entry.
    pub fn with_sun_times(mut self, sun_times: &BTreeMap<NaiveDate, SunTimes>) -> Self {
        for day in &mut self.days {
            if let Some(sun) = sun_times.get(&day.date) {
                day.sunrise = sun.sunrise;
                day.sunset = sun.sunset;
            }
        }
        self
    }
}

/// Rate every hour of a location's feed and aggregate by date.
///
/// Dates come out in ascending order, hours chronologically within each.
/// A date whose hours were all skipped is logged and left out.
pub fn rate_location(
    name: &str,
    region: &str,
    origin: FeedOrigin,
    mut measurements: Vec<HourlyMeasurement>,
) -> LocationConditions {
    measurements.sort_by_key(|m| m.time);

    let mut by_date: BTreeMap<NaiveDate, Vec<HourRating>> = BTreeMap::new();
    let mut skipped_hours = 0;

    for m in &measurements {
        let hours = by_date.entry(m.time.date()).or_default();
        match classify_hour(m) {
            Ok(rated) => hours.push(rated),
            Err(e) => {
                logging::log_skipped_hour(name, &m.time, &e);
                skipped_hours += 1;
            }
        }
    }

    let mut days = Vec::with_capacity(by_date.len());
    for (date, hours) in by_date {
        match rate_day(date, hours) {
            Ok(day) => days.push(day),
            Err(e) => logging::warn(logging::FeedSource::Rating, Some(name), &e.to_string()),
        }
    }

    LocationConditions {
        name: name.to_string(),
        region: region.to_string(),
        origin,
        days,
        skipped_hours,
    }
}

/// Keep only GOOD days, each reduced to its favorable hours. Locations with
/// no GOOD day are dropped.
pub fn find_good_days(results: &[LocationConditions]) -> Vec<LocationConditions> {
    results
        .iter()
        .filter_map(|loc| {
            let days: Vec<DayRating> = loc
                .good_days()
                .map(|day| DayRating {
                    hours: day
                        .hours
                        .iter()
                        .filter(|h| h.rating.is_favorable())
                        .cloned()
                        .collect(),
                    ..day.clone()
                })
                .collect();

            if days.is_empty() {
                None
            } else {
                Some(LocationConditions {
                    days,
                    ..loc.clone()
                })
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
