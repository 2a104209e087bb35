//! Configuration validation

use crate::schema::{RawConfig, RawInterval, RawRestriction, RawValue};
use curfew_core::{Day, DayOfWeek, Dimension, Hour, Interval, Minute, Month, Unit, Week};
use curfew_util::{CalendarFrame, check_offset_hours};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Restriction '{restriction_id}': {message}")]
    RestrictionError {
        restriction_id: String,
        message: String,
    },

    #[error("Duplicate restriction ID: {0}")]
    DuplicateRestrictionId(String),

    #[error("Restriction ID cannot be empty")]
    EmptyRestrictionId,

    #[error("Restriction '{restriction_id}': invalid {dimension} interval '{value}': {message}")]
    InvalidInterval {
        restriction_id: String,
        dimension: Dimension,
        value: String,
        message: String,
    },

    #[error("Invalid reference offset for {context}: {message}")]
    InvalidOffset { context: String, message: String },

    #[error("Invalid calendar '{value}' for {context}")]
    InvalidCalendar { context: String, value: String },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(offset) = config.defaults.reference_offset
        && let Err(e) = check_offset_hours(offset)
    {
        errors.push(ValidationError::InvalidOffset {
            context: "defaults".into(),
            message: e.to_string(),
        });
    }

    if let Some(calendar) = &config.defaults.calendar
        && calendar.parse::<CalendarFrame>().is_err()
    {
        errors.push(ValidationError::InvalidCalendar {
            context: "defaults".into(),
            value: calendar.clone(),
        });
    }

    // Check for duplicate restriction IDs
    let mut seen_ids = HashSet::new();
    for restriction in &config.restrictions {
        if !seen_ids.insert(&restriction.id) {
            errors.push(ValidationError::DuplicateRestrictionId(
                restriction.id.clone(),
            ));
        }
    }

    for restriction in &config.restrictions {
        errors.extend(validate_restriction(restriction));
    }

    errors
}

fn validate_restriction(restriction: &RawRestriction) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let id = &restriction.id;

    if id.trim().is_empty() {
        errors.push(ValidationError::EmptyRestrictionId);
    }

    if let Some(offset) = restriction.reference_offset
        && let Err(e) = check_offset_hours(offset)
    {
        errors.push(ValidationError::InvalidOffset {
            context: format!("restriction '{}'", id),
            message: e.to_string(),
        });
    }

    if let Some(calendar) = &restriction.calendar
        && calendar.parse::<CalendarFrame>().is_err()
    {
        errors.push(ValidationError::InvalidCalendar {
            context: format!("restriction '{}'", id),
            value: calendar.clone(),
        });
    }

    if let Some(preset) = &restriction.preset {
        if parse_preset(preset).is_err() {
            errors.push(ValidationError::RestrictionError {
                restriction_id: id.clone(),
                message: format!("unknown preset '{}'", preset),
            });
        }
        if restriction.has_intervals() {
            errors.push(ValidationError::RestrictionError {
                restriction_id: id.clone(),
                message: "a preset cannot be combined with explicit intervals".into(),
            });
        }
    }

    errors.extend(validate_intervals::<Month>(id, Dimension::Month, &restriction.months));
    errors.extend(validate_intervals::<Week>(id, Dimension::Week, &restriction.weeks));
    errors.extend(validate_intervals::<Day>(
        id,
        Dimension::DayOfMonth,
        &restriction.days_of_month,
    ));
    errors.extend(validate_intervals::<DayOfWeek>(
        id,
        Dimension::DayOfWeek,
        &restriction.days_of_week,
    ));
    errors.extend(validate_intervals::<Hour>(id, Dimension::Hour, &restriction.hours));
    errors.extend(validate_intervals::<Minute>(id, Dimension::Minute, &restriction.minutes));

    errors
}

fn validate_intervals<T: UnitNames>(
    restriction_id: &str,
    dimension: Dimension,
    intervals: &[RawInterval],
) -> Vec<ValidationError> {
    intervals
        .iter()
        .filter_map(|raw| {
            parse_interval::<T>(raw)
                .err()
                .map(|message| ValidationError::InvalidInterval {
                    restriction_id: restriction_id.to_string(),
                    dimension,
                    value: describe_raw(raw),
                    message,
                })
        })
        .collect()
}

/// Known presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every dimension restricted over its full range
    All,
}

pub fn parse_preset(s: &str) -> Result<Preset, String> {
    match s.to_lowercase().as_str() {
        "all" | "full" | "always" => Ok(Preset::All),
        other => Err(format!("Unknown preset: {}", other)),
    }
}

/// Units that may also be written by name in the config file
pub trait UnitNames: Unit {
    fn from_name(_name: &str) -> Option<u32> {
        None
    }
}

impl UnitNames for Month {
    fn from_name(name: &str) -> Option<u32> {
        let month = match name {
            "jan" | "january" => 1,
            "feb" | "february" => 2,
            "mar" | "march" => 3,
            "apr" | "april" => 4,
            "may" => 5,
            "jun" | "june" => 6,
            "jul" | "july" => 7,
            "aug" | "august" => 8,
            "sep" | "september" => 9,
            "oct" | "october" => 10,
            "nov" | "november" => 11,
            "dec" | "december" => 12,
            _ => return None,
        };
        Some(month)
    }
}

impl UnitNames for DayOfWeek {
    fn from_name(name: &str) -> Option<u32> {
        let day = match name {
            "sun" | "sunday" => 0,
            "mon" | "monday" => 1,
            "tue" | "tuesday" => 2,
            "wed" | "wednesday" => 3,
            "thu" | "thursday" => 4,
            "fri" | "friday" => 5,
            "sat" | "saturday" => 6,
            _ => return None,
        };
        Some(day)
    }
}

impl UnitNames for Week {}
impl UnitNames for Day {}
impl UnitNames for Hour {}
impl UnitNames for Minute {}

/// Parse one raw interval entry into a typed interval.
///
/// Bounds must be within the unit's legal range. An inverted interval
/// (`from > to`) is accepted as written.
pub fn parse_interval<T: UnitNames>(raw: &RawInterval) -> Result<Interval<T>, String> {
    match raw {
        RawInterval::Range { from, to } => {
            Ok(Interval::new(parse_value::<T>(from)?, parse_value::<T>(to)?))
        }
        RawInterval::Single(RawValue::Number(n)) => {
            let value = check_bounds::<T>(*n)?;
            Ok(Interval::single(value))
        }
        RawInterval::Single(RawValue::Text(text)) => match text.split_once('-') {
            Some((from, to)) => Ok(Interval::new(parse_text::<T>(from)?, parse_text::<T>(to)?)),
            None => Ok(Interval::single(parse_text::<T>(text)?)),
        },
    }
}

fn parse_value<T: UnitNames>(raw: &RawValue) -> Result<T, String> {
    match raw {
        RawValue::Number(n) => check_bounds::<T>(*n),
        RawValue::Text(text) => parse_text::<T>(text),
    }
}

fn parse_text<T: UnitNames>(text: &str) -> Result<T, String> {
    let text = text.trim().to_lowercase();
    if let Ok(n) = text.parse::<i64>() {
        return check_bounds::<T>(n);
    }
    T::from_name(&text)
        .map(<T as From<u32>>::from)
        .ok_or_else(|| format!("'{}' is not a valid {}", text, T::NAME))
}

fn check_bounds<T: Unit>(n: i64) -> Result<T, String> {
    u32::try_from(n)
        .ok()
        .filter(|&v| T::is_legal(v))
        .map(<T as From<u32>>::from)
        .ok_or_else(|| format!("{} must be {}-{}, got {}", T::NAME, T::MIN, T::MAX, n))
}

fn describe_raw(raw: &RawInterval) -> String {
    fn value(v: &RawValue) -> String {
        match v {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(t) => t.clone(),
        }
    }

    match raw {
        RawInterval::Range { from, to } => format!("{}-{}", value(from), value(to)),
        RawInterval::Single(v) => value(v),
    }
}
