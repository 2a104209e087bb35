//! Time utilities for curfew
//!
//! Provides UTC offset arithmetic (offsets are expressed in fractional hours,
//! e.g. `5.5` for India), the calendar frame in which calendar fields are read
//! from an instant, and parsing/formatting helpers for epoch timestamps.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `CURFEW_MOCK_TIME` environment variable can be set
//! to override the current time used by [`now_epoch`]. This is useful for
//! trying out restrictions from the command line.
//!
//! Format: `YYYY-MM-DD HH:MM:SS`, read as UTC (e.g., `2020-12-31 11:00:00`)
//!
//! Example:
//! ```bash
//! CURFEW_MOCK_TIME="2020-12-31 11:00:00" curfew check --restriction backups
//! ```

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::{CurfewError, Result};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "CURFEW_MOCK_TIME";

/// Format accepted for human-readable instants
pub const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<i64>> = OnceLock::new();

fn get_mock_time_offset() -> Option<i64> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, INSTANT_FORMAT) {
                    Ok(naive_dt) => {
                        let offset = naive_dt.and_utc().timestamp() - Utc::now().timestamp();
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset,
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = INSTANT_FORMAT,
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Current time as UNIX epoch seconds, respecting mock time in debug builds.
pub fn now_epoch() -> i64 {
    let real_now = Utc::now().timestamp();
    match get_mock_time_offset() {
        Some(offset) => real_now.saturating_add(offset),
        None => real_now,
    }
}

/// Convert a UTC offset in fractional hours into whole seconds.
///
/// Rounds to the nearest second so that offsets such as `5.5` or `5.75`
/// land exactly on 19800 and 20700.
pub fn offset_hours_to_seconds(hours: f64) -> i64 {
    (hours * SECONDS_PER_HOUR as f64).round() as i64
}

/// Smallest UTC offset in use, in hours (Baker Island)
pub const MIN_UTC_OFFSET_HOURS: f64 = -12.0;

/// Largest UTC offset in use, in hours (Line Islands)
pub const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

/// Check that a UTC offset in hours is finite and within -12..=14.
pub fn check_offset_hours(hours: f64) -> Result<f64> {
    if !hours.is_finite() {
        return Err(CurfewError::invalid_offset(format!("{} is not a number", hours)));
    }
    if !(MIN_UTC_OFFSET_HOURS..=MAX_UTC_OFFSET_HOURS).contains(&hours) {
        return Err(CurfewError::invalid_offset(format!(
            "{} is outside {}..={} hours",
            hours, MIN_UTC_OFFSET_HOURS, MAX_UTC_OFFSET_HOURS
        )));
    }
    Ok(hours)
}

/// Parse an instant given as epoch seconds, RFC 3339, or `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn parse_instant(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(epoch) = s.parse::<i64>() {
        return Ok(epoch);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }

    NaiveDateTime::parse_from_str(s, INSTANT_FORMAT)
        .map(|naive| naive.and_utc().timestamp())
        .map_err(|_| CurfewError::invalid_instant(s))
}

/// Format an epoch instant as `YYYY-MM-DD HH:MM:SS±HH:MM` in the given frame.
pub fn format_instant(epoch: i64, frame: CalendarFrame) -> String {
    let Some(utc) = DateTime::from_timestamp(epoch, 0) else {
        return epoch.to_string();
    };

    match frame {
        CalendarFrame::Utc => utc.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
        CalendarFrame::Local => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S%:z")
            .to_string(),
        CalendarFrame::Fixed(offset) => utc
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S%:z")
            .to_string(),
    }
}

/// Calendar fields read from an instant.
///
/// `weekday` counts from Sunday (0) to Saturday (6). `iso_week` is the
/// ISO-8601 week number (1-53).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    pub month: u32,
    pub iso_week: u32,
    pub day: u32,
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
}

impl CalendarFields {
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            month: dt.month(),
            iso_week: dt.iso_week().week(),
            day: dt.day(),
            weekday: dt.weekday().num_days_from_sunday(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }
}

/// The zone in which calendar fields are read from an epoch instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CalendarFrame {
    #[default]
    Utc,
    /// Time zone of the running process
    Local,
    Fixed(FixedOffset),
}

impl CalendarFrame {
    /// Build a fixed frame from an offset in fractional hours.
    pub fn from_offset_hours(hours: f64) -> Option<Self> {
        if !hours.is_finite() {
            return None;
        }
        let secs = i32::try_from(offset_hours_to_seconds(hours)).ok()?;
        FixedOffset::east_opt(secs).map(Self::Fixed)
    }

    /// Calendar fields of `epoch` in this frame.
    ///
    /// Returns `None` if the instant is outside the representable date range.
    pub fn fields_at(&self, epoch: i64) -> Option<CalendarFields> {
        let utc = DateTime::from_timestamp(epoch, 0)?;
        let fields = match self {
            Self::Utc => CalendarFields::from_datetime(&utc),
            Self::Local => CalendarFields::from_datetime(&utc.with_timezone(&Local)),
            Self::Fixed(offset) => CalendarFields::from_datetime(&utc.with_timezone(offset)),
        };
        Some(fields)
    }
}

impl fmt::Display for CalendarFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::Local => write!(f, "local"),
            Self::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for CalendarFrame {
    type Err = CurfewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "utc" | "gmt" | "z" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => parse_fixed_offset(other)
                .map(Self::Fixed)
                .ok_or_else(|| CurfewError::invalid_calendar_frame(s)),
        }
    }
}

impl TryFrom<String> for CalendarFrame {
    type Error = CurfewError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CalendarFrame> for String {
    fn from(frame: CalendarFrame) -> Self {
        frame.to_string()
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH` into a fixed offset.
///
/// Hours run 0-23 and minutes 0-59, each written with one or two ASCII digits.
pub fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    if !rest.is_ascii() {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours = parse_offset_part(hours, 23)?;
    let minutes = parse_offset_part(minutes, 59)?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_offset_part(part: &str, max: i32) -> Option<i32> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok().filter(|&value| value <= max)
}
