//! Date and duration display filters.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta};
use tera::{Result, Value};

use crate::value::{as_float, is_truthy};

const ZERO_DURATION: &str = "00:00:00";

/// Format a duration as zero-padded `HH:MM:SS` from its whole seconds.
/// Hours are not capped at 24; negative durations floor like integer division.
pub fn format_hms(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let hours = total.div_euclid(3600);
    let minutes = total.rem_euclid(3600) / 60;
    let seconds = total.rem_euclid(60);
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn seconds_to_delta(seconds: f64) -> Option<TimeDelta> {
    if !seconds.is_finite() {
        return None;
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).trunc() as i64)
}

/// Parse `[-][D day[s], ]H:MM:SS[.ffffff]` (also `D H:MM:SS`).
fn parse_clock_duration(text: &str) -> Option<TimeDelta> {
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };

    let (days, clock) = match text.rsplit_once(' ') {
        Some((day_part, clock)) => {
            let day_part = day_part.trim_end_matches(',').trim();
            let day_part = day_part
                .strip_suffix("days")
                .or_else(|| day_part.strip_suffix("day"))
                .unwrap_or(day_part)
                .trim();
            (day_part.parse::<i64>().ok()?, clock)
        }
        None => (0, text),
    };

    let mut parts = clock.split(':');
    let (h, m, s) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        (Some(m), Some(s), None, None) => ("0", m, s),
        _ => return None,
    };
    let hours: i64 = h.parse().ok()?;
    let minutes: i64 = m.parse().ok()?;
    let seconds: f64 = s.parse().ok()?;
    if !(0..60).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let whole = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60)?;
    let total = whole as f64 + seconds;
    seconds_to_delta(if negative { -total } else { total })
}

pub(crate) fn parse_duration(value: &Value) -> Option<TimeDelta> {
    match value {
        Value::Number(_) => seconds_to_delta(as_float(value)?),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<f64>() {
                Ok(seconds) => seconds_to_delta(seconds),
                Err(_) => parse_clock_duration(s),
            }
        }
        _ => None,
    }
}

/// `duration_format`: seconds (or a `H:MM:SS`-style string) as `HH:MM:SS`.
pub fn duration_format(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    if !is_truthy(value) {
        return Ok(Value::String(ZERO_DURATION.to_string()));
    }
    let formatted = match parse_duration(value) {
        Some(delta) => format_hms(delta),
        None => {
            tracing::trace!(%value, "duration_format: not a duration");
            ZERO_DURATION.to_string()
        }
    };
    Ok(Value::String(formatted))
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive `YYYY-MM-DDTHH:MM:SS`.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = text.parse::<NaiveDate>() {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    text.parse::<NaiveDateTime>().ok().map(|dt| dt.date())
}

pub(crate) fn days_between(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// `days_left`: days from today until the date (negative once past).
pub fn days_left(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    if !is_truthy(value) {
        return Ok(Value::Null);
    }
    let Some(date) = value.as_str().and_then(parse_date) else {
        tracing::trace!(%value, "days_left: not a date");
        return Ok(Value::Null);
    };
    Ok(Value::from(days_between(date, Local::now().date_naive())))
}
