//! HTML rating grid.
//!
//! One table per location: a column per date (MM-DD-YYYY), a day-rating row,
//! then one row per clock hour 00:00-23:00. Cells are coloured by rating;
//! hours without data are left blank.

use chrono::{NaiveDate, Timelike};
use std::collections::HashMap;
use std::fmt::Write;

use crate::analysis::LocationConditions;
use crate::model::{BuoyRating, DayCondition, ForecastRating, HourRating, HourlyRating};

const STYLES: &str = r#"<style>
    table { border-collapse: collapse; margin-bottom: 20px; width: 100%; }
    th { background-color: #f2f2f2; border: 1px solid #ddd; padding: 8px; text-align: center; }
    td { border: 1px solid #ddd; padding: 8px; text-align: center; }
    h2 { margin-top: 30px; color: #003366; }
    .good { background-color: #C6EFCE; font-weight: bold; }
    .great { background-color: #70AD47; font-weight: bold; color: white; }
    .mediocre { background-color: #FFEB9C; font-weight: bold; }
    .bad { background-color: #FFC7CE; color: #9C0006; }
</style>"#;

/// CSS class for an hour cell.
pub fn rating_class(rating: HourlyRating) -> &'static str {
    match rating {
        HourlyRating::Forecast(ForecastRating::Good) => "good",
        HourlyRating::Buoy(BuoyRating::Great) => "great",
        r if r.is_bad() => "bad",
        _ => "mediocre",
    }
}

fn day_class(condition: DayCondition) -> &'static str {
    match condition {
        DayCondition::Good => "good",
        DayCondition::Mediocre => "mediocre",
        DayCondition::Bad => "bad",
    }
}

/// Minimal escaping for text placed in element content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full report document.
pub fn render(results: &[LocationConditions]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(STYLES);
    html.push_str("\n</head>\n<body>\n<h1>Boating Conditions Report</h1>\n");

    for loc in results {
        render_location(&mut html, loc);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_location(html: &mut String, loc: &LocationConditions) {
    // Writing to a String cannot fail.
    let _ = writeln!(html, "<h2>{}, {} ({})</h2>", escape(&loc.name), escape(&loc.region), loc.origin);

    if loc.days.is_empty() {
        html.push_str("<p>No data found.</p>\n");
        return;
    }

    let dates: Vec<NaiveDate> = loc.days.iter().map(|d| d.date).collect();
    let cells: HashMap<(NaiveDate, u32), &HourRating> = loc
        .days
        .iter()
        .flat_map(|d| d.hours.iter().map(move |h| ((d.date, h.time.hour()), h)))
        .collect();

    html.push_str("<table>\n<tr><th>Time</th>");
    for date in &dates {
        let _ = write!(html, "<th>{}</th>", date.format("%m-%d-%Y"));
    }
    html.push_str("</tr>\n<tr><td><b>Day</b></td>");
    for day in &loc.days {
        let _ = write!(
            html,
            "<td class='{}'>{} ({})</td>",
            day_class(day.day_rating),
            day.day_rating,
            day.good_hours_count
        );
    }
    html.push_str("</tr>\n");

    for hour in 0..24 {
        let _ = write!(html, "<tr><td><b>{:02}:00</b></td>", hour);
        for date in &dates {
            match cells.get(&(*date, hour)) {
                Some(h) => {
                    let _ = write!(html, "<td class='{}'>{}</td>", rating_class(h.rating), h.rating);
                }
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n");
}
