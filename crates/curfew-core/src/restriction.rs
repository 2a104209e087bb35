//! Restriction configuration and evaluation

use curfew_util::{CalendarFields, CalendarFrame};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::interval::{Day, DayOfWeek, Hour, Interval, Minute, Month, Unit, Week};
use crate::translate::{translate, translate_no_offset};

/// Reference offset used by [`Restriction::fully_restricted`] (Eastern European Time)
pub const DEFAULT_REFERENCE_OFFSET_HOURS: f64 = 3.0;

/// One of the six time axes a restriction can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Month,
    Week,
    DayOfMonth,
    DayOfWeek,
    Hour,
    Minute,
}

impl Dimension {
    /// All dimensions, in evaluation order
    pub const ALL: [Dimension; 6] = [
        Dimension::Month,
        Dimension::Week,
        Dimension::DayOfMonth,
        Dimension::DayOfWeek,
        Dimension::Hour,
        Dimension::Minute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
            Self::DayOfMonth => "day of month",
            Self::DayOfWeek => "day of week",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricted intervals, one sequence per dimension.
///
/// An empty sequence leaves its dimension unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervals {
    #[serde(default)]
    pub months: Vec<Interval<Month>>,
    #[serde(default)]
    pub weeks: Vec<Interval<Week>>,
    #[serde(default)]
    pub days_of_month: Vec<Interval<Day>>,
    #[serde(default)]
    pub days_of_week: Vec<Interval<DayOfWeek>>,
    #[serde(default)]
    pub hours: Vec<Interval<Hour>>,
    #[serde(default)]
    pub minutes: Vec<Interval<Minute>>,
}

impl Intervals {
    /// Whether no dimension carries any interval
    pub fn is_unrestricted(&self) -> bool {
        Dimension::ALL.iter().all(|&d| self.count(d) == 0)
    }

    /// Number of intervals configured for `dimension`
    pub fn count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Month => self.months.len(),
            Dimension::Week => self.weeks.len(),
            Dimension::DayOfMonth => self.days_of_month.len(),
            Dimension::DayOfWeek => self.days_of_week.len(),
            Dimension::Hour => self.hours.len(),
            Dimension::Minute => self.minutes.len(),
        }
    }

    /// Intervals of `dimension` rendered for display, e.g. `["6-14", "22"]`
    pub fn describe(&self, dimension: Dimension) -> Vec<String> {
        fn render<T: Unit>(intervals: &[Interval<T>]) -> Vec<String> {
            intervals.iter().map(ToString::to_string).collect()
        }

        match dimension {
            Dimension::Month => render(&self.months),
            Dimension::Week => render(&self.weeks),
            Dimension::DayOfMonth => render(&self.days_of_month),
            Dimension::DayOfWeek => render(&self.days_of_week),
            Dimension::Hour => render(&self.hours),
            Dimension::Minute => render(&self.minutes),
        }
    }

    /// Check a single dimension against calendar fields.
    pub fn check(&self, dimension: Dimension, fields: &CalendarFields) -> bool {
        match dimension {
            Dimension::Month => check_dimension(dimension, &self.months, Month(fields.month)),
            Dimension::Week => check_dimension(dimension, &self.weeks, Week(fields.iso_week)),
            Dimension::DayOfMonth => {
                check_dimension(dimension, &self.days_of_month, Day(fields.day))
            }
            Dimension::DayOfWeek => {
                check_dimension(dimension, &self.days_of_week, DayOfWeek(fields.weekday))
            }
            Dimension::Hour => check_dimension(dimension, &self.hours, Hour(fields.hour)),
            Dimension::Minute => check_dimension(dimension, &self.minutes, Minute(fields.minute)),
        }
    }

    /// First dimension, in evaluation order, that restricts `fields`
    pub fn first_match(&self, fields: &CalendarFields) -> Option<Dimension> {
        Dimension::ALL
            .into_iter()
            .find(|&dimension| self.check(dimension, fields))
    }
}

fn check_dimension<T: Unit>(dimension: Dimension, intervals: &[Interval<T>], value: T) -> bool {
    if intervals.is_empty() {
        debug!(%dimension, "no restriction");
        return false;
    }

    for interval in intervals {
        if interval.contains(value) {
            debug!(%dimension, %interval, %value, "restricted");
            return true;
        }
    }

    debug!(%dimension, %value, "restriction does not apply");
    false
}

/// Outcome of evaluating a request against a [`Restriction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Translated instant that was checked (UNIX seconds)
    pub translated: i64,
    pub restricted: bool,
    /// Dimension that matched first. `None` when unrestricted, or when the
    /// instant could not be placed on the calendar.
    pub dimension: Option<Dimension>,
}

impl Verdict {
    pub fn allowed(translated: i64) -> Self {
        Self {
            translated,
            restricted: false,
            dimension: None,
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }
}

/// Recurring calendar restrictions for an action.
///
/// If the evaluated instant falls outside every configured interval, the
/// action may proceed. A restriction is read-only during evaluation and can
/// be shared freely between threads.
///
/// Calendar fields are read in `calendar`, which defaults to UTC. Intervals
/// written as wall-clock times of a zone (e.g. "Monday, 23:00 at UTC+2") need
/// `with_calendar` set to that zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    pub intervals: Intervals,

    /// UTC offset, in hours, the restriction calendar is defined against
    pub reference_offset: f64,

    /// Zone in which calendar fields are read from the translated instant
    #[serde(default)]
    pub calendar: CalendarFrame,
}

impl Default for Restriction {
    fn default() -> Self {
        Self {
            intervals: Intervals::default(),
            reference_offset: 0.0,
            calendar: CalendarFrame::Utc,
        }
    }
}

impl Restriction {
    pub fn new(intervals: Intervals, reference_offset: f64) -> Self {
        Self {
            intervals,
            reference_offset,
            calendar: CalendarFrame::Utc,
        }
    }

    pub fn with_calendar(mut self, calendar: CalendarFrame) -> Self {
        self.calendar = calendar;
        self
    }

    /// Restriction that blocks every instant.
    pub fn fully_restricted() -> Self {
        Self::new(
            Intervals {
                months: vec![Month::full_range()],
                weeks: vec![Interval::new(Week(1), Week(52))],
                days_of_month: vec![Day::full_range()],
                days_of_week: vec![DayOfWeek::full_range()],
                hours: vec![Hour::full_range()],
                minutes: vec![Minute::full_range()],
            },
            DEFAULT_REFERENCE_OFFSET_HOURS,
        )
    }

    /// Whether an action is restricted from taking place.
    ///
    /// `request_time` is a UNIX timestamp observed at UTC offset
    /// `request_offset` (hours). `estimated` is how long the action is
    /// expected to run; the instant checked is the expected completion.
    pub fn check(&self, request_offset: f64, request_time: i64, estimated: Duration) -> bool {
        self.evaluate(request_offset, request_time, estimated)
            .is_restricted()
    }

    /// Same as [`Restriction::check`] for a caller already at the reference offset.
    pub fn check_no_offset(&self, request_time: i64, estimated: Duration) -> bool {
        self.evaluate_no_offset(request_time, estimated)
            .is_restricted()
    }

    pub fn evaluate(&self, request_offset: f64, request_time: i64, estimated: Duration) -> Verdict {
        let translated = translate(request_offset, request_time, self.reference_offset, estimated);

        debug!(
            request_offset,
            request_time,
            reference_offset = self.reference_offset,
            estimated_secs = estimated.as_secs(),
            translated,
            "Translated request time"
        );

        self.evaluate_at(translated)
    }

    pub fn evaluate_no_offset(&self, request_time: i64, estimated: Duration) -> Verdict {
        let translated = translate_no_offset(request_time, estimated);

        debug!(
            request_time,
            estimated_secs = estimated.as_secs(),
            translated,
            "Translated request time"
        );

        self.evaluate_at(translated)
    }

    /// Evaluate an already translated instant.
    pub fn evaluate_at(&self, translated: i64) -> Verdict {
        if self.intervals.is_unrestricted() {
            debug!(translated, "check - no restrictions configured");
            return Verdict::allowed(translated);
        }

        let Some(fields) = self.calendar.fields_at(translated) else {
            warn!(
                translated,
                "Instant outside the calendar range, treating as restricted"
            );
            return Verdict {
                translated,
                restricted: true,
                dimension: None,
            };
        };

        match self.intervals.first_match(&fields) {
            Some(dimension) => {
                debug!(translated, %dimension, "Restricted");
                Verdict {
                    translated,
                    restricted: true,
                    dimension: Some(dimension),
                }
            }
            None => {
                debug!(translated, "check - no restrictions apply");
                Verdict::allowed(translated)
            }
        }
    }
}
