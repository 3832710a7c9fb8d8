//! Business-day arithmetic. Weekends are excluded; public holidays are a
//! display concern and are not subtracted here.

use crate::engine::error::{Result, WorkflowError};
use crate::model::HalfDayPeriod;
use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const WORK_DAYS_PER_WEEK: usize = 5;

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Business days in `start..=end`; zero when the range is inverted.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .count() as u32
}

/// Day count charged for a leave request.
pub fn leave_days(
    start: NaiveDate,
    end: NaiveDate,
    half_day: Option<HalfDayPeriod>,
) -> Result<f64> {
    if end < start {
        return Err(WorkflowError::InvalidDateRange(format!(
            "{start} is after {end}"
        )));
    }

    let days = match half_day {
        Some(_) if start != end => {
            return Err(WorkflowError::InvalidDateRange(
                "a half day must start and end on the same date".to_string(),
            ));
        }
        Some(_) if is_business_day(start) => 0.5,
        Some(_) => 0.0,
        None => business_days(start, end) as f64,
    };

    if days == 0.0 {
        return Err(WorkflowError::ZeroDays { start, end });
    }
    Ok(days)
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}

/// Monday to Friday of the week containing `date`.
pub fn week_dates(date: NaiveDate) -> [NaiveDate; WORK_DAYS_PER_WEEK] {
    let monday = week_start(date);
    std::array::from_fn(|i| monday + Days::new(i as u64))
}

/// ISO week label such as `S02`.
pub fn week_label(date: NaiveDate) -> String {
    format!("S{:02}", date.iso_week().week())
}

pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Days::new(1);
    while !is_business_day(next) {
        next = next + Days::new(1);
    }
    next
}
