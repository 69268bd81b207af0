/// Report rendering for the boating conditions service.
///
/// Renderers consume `LocationConditions` only through the documented
/// `DayRating` / `HourRating` fields and never re-rate anything.
///
/// Submodules:
/// - `json`   : full and good-days JSON documents.
/// - `html`   : hour-by-date rating grid per location.
/// - `summary`: plain-text console summary.

pub mod html;
pub mod json;
pub mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::LocationConditions;
use crate::config::ReportConfig;

/// Paths of the files written by `write_reports`.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReports {
    pub all_json: PathBuf,
    pub good_json: PathBuf,
    pub html: PathBuf,
}

/// Write the JSON and HTML reports into `output_dir`, creating it if needed.
/// Existing files are overwritten.
pub fn write_reports(
    output_dir: &Path,
    config: &ReportConfig,
    all: &[LocationConditions],
    good: &[LocationConditions],
) -> Result<WrittenReports, Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let written = WrittenReports {
        all_json: output_dir.join(&config.all_json),
        good_json: output_dir.join(&config.good_json),
        html: output_dir.join(&config.html),
    };

    fs::write(&written.all_json, json::render(all)?)?;
    fs::write(&written.good_json, json::render(good)?)?;
    fs::write(&written.html, html::render(all))?;

    Ok(written)
}
