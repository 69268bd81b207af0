//! Boating conditions service.
//!
//! Rates recreational boating conditions from NDBC buoy observations and
//! Open-Meteo marine/weather forecasts, then renders JSON, HTML, and console
//! reports. The rating engine (`units`, `rating`) is pure; feeds, config,
//! and reports sit around it.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod rating;
pub mod report;
pub mod units;
