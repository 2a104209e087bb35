//! Validated policy structures

use crate::schema::{RawConfig, RawDefaults, RawInterval, RawRestriction};
use crate::validation::{Preset, UnitNames, parse_interval, parse_preset};
use curfew_core::{
    Day, DayOfWeek, Dimension, Hour, Interval, Intervals, Minute, Month, Restriction, Verdict,
    Week, translate, translate_no_offset,
};
use curfew_util::{CalendarFrame, RestrictionId};
use std::time::Duration;
use tracing::{debug, warn};

/// Validated policy ready for evaluation
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub defaults: Defaults,

    /// Validated restrictions, in file order
    pub restrictions: Vec<NamedRestriction>,
}

impl Policy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let defaults = Defaults::from_raw(&raw.defaults);

        let restrictions = raw
            .restrictions
            .into_iter()
            .map(|r| NamedRestriction::from_raw(r, &defaults))
            .collect();

        Self {
            defaults,
            restrictions,
        }
    }

    /// Get restriction by ID
    pub fn get_restriction(&self, id: &RestrictionId) -> Option<&NamedRestriction> {
        self.restrictions.iter().find(|r| &r.id == id)
    }
}

/// Settings applied to restrictions that don't override them
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    pub reference_offset: f64,
    pub calendar: CalendarFrame,
}

impl Defaults {
    fn from_raw(raw: &RawDefaults) -> Self {
        Self {
            reference_offset: raw.reference_offset.unwrap_or(0.0),
            calendar: raw
                .calendar
                .as_deref()
                .and_then(|c| c.parse().ok())
                .unwrap_or_default(),
        }
    }
}

/// A restriction together with its identity in the configuration
#[derive(Debug, Clone)]
pub struct NamedRestriction {
    pub id: RestrictionId,
    pub label: String,
    pub restriction: Restriction,
    pub disabled: bool,
    pub disabled_reason: Option<String>,
}

impl NamedRestriction {
    fn from_raw(raw: RawRestriction, defaults: &Defaults) -> Self {
        let reference_offset = raw.reference_offset.unwrap_or(defaults.reference_offset);
        let calendar = raw
            .calendar
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(defaults.calendar);

        let intervals = match raw.preset.as_deref().map(parse_preset) {
            Some(Ok(Preset::All)) => Restriction::fully_restricted().intervals,
            _ => convert_intervals(&raw),
        };

        Self {
            label: raw.label.unwrap_or_else(|| raw.id.clone()),
            id: RestrictionId::new(raw.id),
            restriction: Restriction {
                intervals,
                reference_offset,
                calendar,
            },
            disabled: raw.disabled,
            disabled_reason: raw.disabled_reason,
        }
    }

    /// Evaluate a request against this restriction.
    ///
    /// Without a request offset the caller is assumed to be at the
    /// reference offset. A disabled restriction never restricts.
    pub fn evaluate(
        &self,
        request_offset: Option<f64>,
        request_time: i64,
        estimated: Duration,
    ) -> Verdict {
        if self.disabled {
            debug!(restriction = %self.id, "Restriction disabled");
            let translated = match request_offset {
                Some(offset) => translate(
                    offset,
                    request_time,
                    self.restriction.reference_offset,
                    estimated,
                ),
                None => translate_no_offset(request_time, estimated),
            };
            return Verdict::allowed(translated);
        }

        match request_offset {
            Some(offset) => self.restriction.evaluate(offset, request_time, estimated),
            None => self.restriction.evaluate_no_offset(request_time, estimated),
        }
    }

    /// Dimensions carrying at least one interval, in evaluation order
    pub fn restricted_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|&d| self.restriction.intervals.count(d) > 0)
            .collect()
    }

    /// One-line description: `id [dimensions]: label`, flagged when disabled
    pub fn summary(&self) -> String {
        let dimensions = self.restricted_dimensions();
        let scope = if dimensions.is_empty() {
            "unrestricted".to_string()
        } else {
            dimensions
                .iter()
                .map(Dimension::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let state = if self.disabled { " (disabled)" } else { "" };
        format!("{} [{}]: {}{}", self.id, scope, self.label, state)
    }
}

fn convert_intervals(raw: &RawRestriction) -> Intervals {
    Intervals {
        months: convert_dimension::<Month>(&raw.id, Dimension::Month, &raw.months),
        weeks: convert_dimension::<Week>(&raw.id, Dimension::Week, &raw.weeks),
        days_of_month: convert_dimension::<Day>(&raw.id, Dimension::DayOfMonth, &raw.days_of_month),
        days_of_week: convert_dimension::<DayOfWeek>(
            &raw.id,
            Dimension::DayOfWeek,
            &raw.days_of_week,
        ),
        hours: convert_dimension::<Hour>(&raw.id, Dimension::Hour, &raw.hours),
        minutes: convert_dimension::<Minute>(&raw.id, Dimension::Minute, &raw.minutes),
    }
}

fn convert_dimension<T: UnitNames>(
    restriction_id: &str,
    dimension: Dimension,
    raw: &[RawInterval],
) -> Vec<Interval<T>> {
    raw.iter()
        .filter_map(|r| parse_interval::<T>(r).ok())
        .inspect(|interval| {
            if interval.is_inverted() {
                warn!(
                    restriction = restriction_id,
                    %dimension,
                    %interval,
                    "Interval bounds are inverted; it will never match"
                );
            }
        })
        .collect()
}
