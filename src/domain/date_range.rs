//! Resolution of loose date requests into a concrete window.
//!
//! Accepts ISO dates, "today"/"now", and relative ranges such as "1y", "6mo",
//! "2 weeks", "30d", "last one year" or "past month". Units are fixed-length:
//! a year is 365 days, a month 30, a week 7.

use crate::domain::error::QuantError;
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    range: Option<&str>,
    today: NaiveDate,
) -> Result<DateWindow, QuantError> {
    let end = match non_blank(end) {
        Some(text) => parse_date(text, today)
            .ok_or_else(|| QuantError::input("end date must be YYYY-MM-DD or 'today'"))?
            .min(today),
        None => today,
    };

    if let Some(text) = non_blank(range) {
        let days = range_to_days(text).ok_or_else(|| {
            QuantError::input("range must look like 1y, 6mo, 30d, or 'last one year'")
        })?;
        return Ok(DateWindow {
            start: days_before(end, days)?,
            end,
        });
    }

    let Some(text) = non_blank(start) else {
        return Err(QuantError::input("provide a start date or a range"));
    };
    if let Some(start) = parse_date(text, today) {
        if start > end {
            return Err(QuantError::input(format!(
                "start date {start} is after end date {end}"
            )));
        }
        return Ok(DateWindow { start, end });
    }
    match range_to_days(text) {
        Some(days) => Ok(DateWindow {
            start: days_before(end, days)?,
            end,
        }),
        None => Err(QuantError::input(
            "start date must be YYYY-MM-DD or a relative range",
        )),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let cleaned = text.trim();
    if cleaned.eq_ignore_ascii_case("today") || cleaned.eq_ignore_ascii_case("now") {
        return Some(today);
    }
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d").ok()
}

fn days_before(end: NaiveDate, days: u64) -> Result<NaiveDate, QuantError> {
    end.checked_sub_days(Days::new(days))
        .ok_or_else(|| QuantError::input(format!("range of {days} days is too large")))
}

/// Length in days of a relative range, or `None` when nothing recognizable.
fn range_to_days(text: &str) -> Option<u64> {
    let text = text.trim().to_lowercase().replace("one", "1");
    if text.is_empty() {
        return None;
    }

    let (count, unit) = match counted_unit(&text) {
        Some(found) => found,
        None => {
            let unit = ["year", "month", "week", "day"]
                .into_iter()
                .find(|word| text.contains(word))?;
            (1, unit)
        }
    };
    unit_days(unit).and_then(|days| days.checked_mul(count))
}

/// First `<digits><optional spaces><unit word>` pair whose unit is recognized.
fn counted_unit(text: &str) -> Option<(u64, &str)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        if !bytes[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }
        let digits_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let digits = &text[digits_start..pos];
        let mut unit_start = pos;
        while unit_start < bytes.len() && bytes[unit_start].is_ascii_whitespace() {
            unit_start += 1;
        }
        let mut unit_end = unit_start;
        while unit_end < bytes.len() && bytes[unit_end].is_ascii_alphabetic() {
            unit_end += 1;
        }
        let unit = &text[unit_start..unit_end];
        if unit_days(unit).is_some() {
            if let Ok(count) = digits.parse() {
                return Some((count, unit));
            }
        }
    }
    None
}

fn unit_days(unit: &str) -> Option<u64> {
    match unit.chars().next()? {
        'y' => Some(365),
        'm' => Some(30),
        'w' => Some(7),
        'd' => Some(1),
        _ => None,
    }
}
