//! Calendar units and inclusive intervals over them

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordinal calendar unit with a legal range of values.
pub trait Unit: Copy + Ord + fmt::Debug + fmt::Display + From<u32> {
    /// Smallest legal value
    const MIN: u32;
    /// Largest legal value
    const MAX: u32;
    /// Human-readable unit name, used in validation messages
    const NAME: &'static str;

    /// Whether `value` lies within the unit's legal range
    fn is_legal(value: u32) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }

    /// Interval spanning the whole legal range
    fn full_range() -> Interval<Self> {
        Interval::new(Self::from(Self::MIN), Self::from(Self::MAX))
    }
}

macro_rules! calendar_unit {
    ($(#[$meta:meta])* $name:ident, $min:expr, $max:expr, $label:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl Unit for $name {
            const MIN: u32 = $min;
            const MAX: u32 = $max;
            const NAME: &'static str = $label;
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

calendar_unit!(
    /// Calendar month, 1 (January) to 12 (December)
    Month, 1, 12, "month"
);
calendar_unit!(
    /// ISO-8601 week number, 1 to 53
    Week, 1, 53, "week"
);
calendar_unit!(
    /// Day of the month, 1 to 31
    Day, 1, 31, "day of month"
);
calendar_unit!(
    /// Day of the week, 0 (Sunday) to 6 (Saturday)
    DayOfWeek, 0, 6, "day of week"
);
calendar_unit!(
    /// Hour of the day, 0 to 23
    Hour, 0, 23, "hour"
);
calendar_unit!(
    /// Minute of the hour, 0 to 59
    Minute, 0, 59, "minute"
);

/// A closed interval `[from, to]`, inclusive at both ends.
///
/// `from <= to` is expected but not enforced: an inverted interval is kept
/// as given and simply never contains any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialOrd + Copy> Interval<T> {
    pub const fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    /// Interval holding exactly one value
    pub const fn single(value: T) -> Self {
        Self {
            from: value,
            to: value,
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.from <= value && value <= self.to
    }

    pub fn is_inverted(&self) -> bool {
        self.from > self.to
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let interval = Interval::new(Hour(6), Hour(14));

        assert!(interval.contains(Hour(6)));
        assert!(interval.contains(Hour(10)));
        assert!(interval.contains(Hour(14)));
        assert!(!interval.contains(Hour(5)));
        assert!(!interval.contains(Hour(15)));
    }

    #[test]
    fn test_boundaries_every_unit() {
        fn check<T: Unit>() {
            for from in T::MIN..=T::MAX {
                for to in from..=T::MAX {
                    let interval = Interval::new(T::from(from), T::from(to));
                    assert!(interval.contains(T::from(from)));
                    assert!(interval.contains(T::from(to)));
                    if from > 0 {
                        assert!(!interval.contains(T::from(from - 1)));
                    }
                    assert!(!interval.contains(T::from(to + 1)));
                }
            }
        }

        check::<Month>();
        check::<Week>();
        check::<Day>();
        check::<DayOfWeek>();
        check::<Hour>();
        check::<Minute>();
    }

    #[test]
    fn test_single() {
        let interval = Interval::single(Month(12));
        assert!(interval.contains(Month(12)));
        assert!(!interval.contains(Month(11)));
        assert!(!interval.contains(Month(1)));
    }

    #[test]
    fn test_inverted_never_matches() {
        let interval = Interval::new(Hour(22), Hour(2));
        assert!(interval.is_inverted());
        for h in 0..24 {
            assert!(!interval.contains(Hour(h)), "hour {} matched", h);
        }
    }

    #[test]
    fn test_full_range() {
        assert_eq!(Month::full_range(), Interval::new(Month(1), Month(12)));
        assert_eq!(DayOfWeek::full_range(), Interval::new(DayOfWeek(0), DayOfWeek(6)));
        assert_eq!(Minute::full_range(), Interval::new(Minute(0), Minute(59)));
        assert!(Hour::is_legal(23));
        assert!(!Hour::is_legal(24));
        assert!(!Day::is_legal(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::new(Hour(22), Hour(23)).to_string(), "22-23");
        assert_eq!(Interval::single(Month(12)).to_string(), "12");
    }

    #[test]
    fn test_serde_shape() {
        let interval = Interval::new(Minute(0), Minute(15));
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, r#"{"from":0,"to":15}"#);
    }
}
