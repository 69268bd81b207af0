//! Plain-text console summary.

use chrono::{Duration, NaiveTime};
use std::fmt::Write;

use crate::analysis::LocationConditions;
use crate::model::HourRating;

/// Hourly ratings shown per day before eliding the rest.
const SAMPLE_HOURS: usize = 3;

/// Group favorable hours into runs of consecutive clock hours, formatted
/// as `"HH:MM"` for a single hour or `"HH:MM - HH:MM"` for a run.
pub fn favorable_windows(hours: &[HourRating]) -> Vec<String> {
    let mut runs: Vec<(&HourRating, &HourRating)> = Vec::new();

    for h in hours.iter().filter(|h| h.rating.is_favorable()) {
        match runs.last_mut() {
            Some((_, last)) if h.time - last.time == Duration::hours(1) => *last = h,
            _ => runs.push((h, h)),
        }
    }

    runs.into_iter()
        .map(|(first, last)| {
            if first.time == last.time {
                first.time.format("%H:%M").to_string()
            } else {
                format!("{} - {}", first.time.format("%H:%M"), last.time.format("%H:%M"))
            }
        })
        .collect()
}

/// Render the per-location summary followed by the good-days digest.
pub fn render(all: &[LocationConditions], good: &[LocationConditions]) -> String {
    let mut out = String::from("Boating Conditions Summary:\n");

    for loc in all {
        let _ = writeln!(out, "\n=== {} ({}) ===", loc.name, loc.origin);
        if loc.skipped_hours > 0 {
            let _ = writeln!(out, "  ({} hours skipped for missing data)", loc.skipped_hours);
        }
        for day in &loc.days {
            let _ = writeln!(out, "\n{}: {}", day.date, day.day_rating);
            if day.sunrise.is_some() || day.sunset.is_some() {
                let _ = writeln!(
                    out,
                    "  Sunrise: {}, Sunset: {}",
                    format_sun_time(day.sunrise),
                    format_sun_time(day.sunset)
                );
            }
            let _ = writeln!(out, "  Good hours: {}", day.good_hours_count);
            out.push_str("  Sample hourly ratings:\n");
            for h in day.hours.iter().take(SAMPLE_HOURS) {
                let _ = writeln!(
                    out,
                    "    {}: {} - Wave: {:.1}ft, Wind: {:.1}mph",
                    h.time.format("%H:%M"),
                    h.rating,
                    h.wave_height_ft,
                    h.wind_speed_mph
                );
            }
            if day.hours.len() > SAMPLE_HOURS {
                let _ = writeln!(out, "    ... and {} more hours", day.hours.len() - SAMPLE_HOURS);
            }
        }
    }

    if !good.is_empty() {
        out.push_str("\n\n=== GOOD BOATING DAYS ===\n");
        for loc in good {
            let _ = writeln!(out, "\n{}:", loc.name);
            for day in &loc.days {
                let windows = favorable_windows(&day.hours);
                let _ = writeln!(
                    out,
                    "  {}: {} - {} good hours ({})",
                    day.date,
                    day.day_rating,
                    day.good_hours_count,
                    windows.join(", ")
                );
            }
        }
    }

    out
}

fn format_sun_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
