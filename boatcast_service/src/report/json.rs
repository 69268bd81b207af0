//! JSON report documents.
//!
//! Shape: `{ "<location>": { "region", "origin", "skipped_hours",
//! "days": [ { "date", "day_rating", "good_hours_count", "hours": [...] } ] } }`

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::LocationConditions;
use crate::model::{DayRating, FeedOrigin};

#[derive(Debug, Serialize)]
struct LocationEntry<'a> {
    region: &'a str,
    origin: FeedOrigin,
    skipped_hours: usize,
    days: &'a [DayRating],
}

/// Render results as pretty-printed JSON keyed by location name.
pub fn render(results: &[LocationConditions]) -> Result<String, serde_json::Error> {
    let doc: BTreeMap<&str, LocationEntry<'_>> = results
        .iter()
        .map(|loc| {
            (
                loc.name.as_str(),
                LocationEntry {
                    region: &loc.region,
                    origin: loc.origin,
                    skipped_hours: loc.skipped_hours,
                    days: &loc.days,
                },
            )
        })
        .collect();

    serde_json::to_string_pretty(&doc)
}
