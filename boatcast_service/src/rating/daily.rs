//! Day-level aggregation of hourly ratings.
//!
//!   - 3 or more favorable hours  -> GOOD
//!   - otherwise, every hour BAD  -> BAD
//!   - otherwise                  -> MEDIOCRE
//!
//! A day with no rated hours has no rating. It is rejected with
//! `EmptyInput` rather than falling through to "every hour BAD", which an
//! empty slice satisfies vacuously.

use chrono::NaiveDate;

use crate::model::{ConditionsError, DayCondition, DayRating, HourRating};

/// Favorable hours needed for a GOOD day.
pub const MIN_GOOD_HOURS: usize = 3;

/// Aggregates one day's hours, which must be non-empty and chronological.
pub fn day_condition(hours: &[HourRating]) -> Result<(DayCondition, usize), ConditionsError> {
    if hours.is_empty() {
        return Err(ConditionsError::EmptyInput { date: None });
    }

    let good_hours_count = hours.iter().filter(|h| h.rating.is_favorable()).count();

    let condition = if good_hours_count >= MIN_GOOD_HOURS {
        DayCondition::Good
    } else if hours.iter().all(|h| h.rating.is_bad()) {
        DayCondition::Bad
    } else {
        DayCondition::Mediocre
    };

    Ok((condition, good_hours_count))
}

/// Builds the `DayRating` for `date` from its rated hours.
pub fn rate_day(date: NaiveDate, hours: Vec<HourRating>) -> Result<DayRating, ConditionsError> {
    let (day_rating, good_hours_count) = day_condition(&hours)
        .map_err(|_| ConditionsError::EmptyInput { date: Some(date) })?;

    Ok(DayRating {
        date,
        day_rating,
        sunrise: None,
        sunset: None,
        good_hours_count,
        hours,
    })
}
