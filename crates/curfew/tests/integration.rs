//! Integration tests for curfew
//!
//! These tests load policies through the config layer and evaluate them
//! the way an external scheduler would.

use curfew_config::{ConfigError, Policy, parse_config};
use curfew_core::{Dimension, Restriction};
use curfew_util::{RestrictionId, format_instant};
use std::io::Write;
use std::time::Duration;

// Thu Dec 31 2020 13:00:00 at UTC+2
const NEW_YEARS_EVE: i64 = 1609412400;

// Mon Dec 28 2020 23:00:01 at UTC+2
const MONDAY_LATE: i64 = 1609189201;

fn make_test_policy() -> Policy {
    parse_config(
        r#"
        config_version = 1

        [defaults]
        reference_offset = 3.0
        calendar = "+02:00"

        [[restrictions]]
        id = "december"
        months = [12]

        [[restrictions]]
        id = "autumn"
        months = [{ from = "oct", to = "nov" }]

        [[restrictions]]
        id = "year-edges"
        days_of_month = [31, 1]

        [[restrictions]]
        id = "first-of-month"
        days_of_month = [1]

        [[restrictions]]
        id = "mondays"
        reference_offset = 2.0
        days_of_week = ["mon"]

        [[restrictions]]
        id = "office-hours"
        label = "Office hours"
        hours = ["6-14"]

        [[restrictions]]
        id = "frozen"
        preset = "all"

        [[restrictions]]
        id = "frozen-paused"
        preset = "all"
        disabled = true
        disabled_reason = "holiday"
        "#,
    )
    .unwrap()
}

fn get<'a>(policy: &'a Policy, id: &str) -> &'a curfew_config::NamedRestriction {
    policy.get_restriction(&RestrictionId::new(id)).unwrap()
}

#[test]
fn test_policy_loading() {
    let policy = make_test_policy();
    assert_eq!(policy.restrictions.len(), 8);
    assert_eq!(get(&policy, "office-hours").label, "Office hours");
    assert_eq!(get(&policy, "mondays").restriction.reference_offset, 2.0);
    assert_eq!(get(&policy, "december").restriction.reference_offset, 3.0);
}

#[test]
fn test_month_scenario() {
    let policy = make_test_policy();

    let verdict = get(&policy, "december").evaluate(Some(0.0), NEW_YEARS_EVE, Duration::ZERO);
    assert!(verdict.is_restricted());
    assert_eq!(verdict.dimension, Some(Dimension::Month));

    let verdict = get(&policy, "autumn").evaluate(Some(0.0), NEW_YEARS_EVE, Duration::ZERO);
    assert!(!verdict.is_restricted());
}

#[test]
fn test_day_of_month_scenario() {
    let policy = make_test_policy();

    let verdict = get(&policy, "year-edges").evaluate(Some(0.0), NEW_YEARS_EVE, Duration::ZERO);
    assert!(verdict.is_restricted());
    assert_eq!(verdict.dimension, Some(Dimension::DayOfMonth));

    let verdict =
        get(&policy, "first-of-month").evaluate(Some(0.0), NEW_YEARS_EVE, Duration::ZERO);
    assert!(!verdict.is_restricted());
}

#[test]
fn test_day_of_week_scenario() {
    let policy = make_test_policy();
    let mondays = get(&policy, "mondays");

    let verdict = mondays.evaluate(Some(2.0), MONDAY_LATE, Duration::ZERO);
    assert!(verdict.is_restricted());
    assert_eq!(verdict.dimension, Some(Dimension::DayOfWeek));

    // One hour ahead of the reference lands on Tuesday
    let verdict = mondays.evaluate(Some(3.0), MONDAY_LATE, Duration::ZERO);
    assert!(!verdict.is_restricted());
    assert_eq!(
        format_instant(verdict.translated, mondays.restriction.calendar),
        "2020-12-29 00:00:01+02:00"
    );
}

#[test]
fn test_scheduler_dispatch() {
    let policy = make_test_policy();
    let office = get(&policy, "office-hours");

    // A job started now would run inside office hours
    let quick = office.evaluate(None, NEW_YEARS_EVE, Duration::ZERO);
    assert!(quick.is_restricted());
    assert_eq!(quick.dimension, Some(Dimension::Hour));

    // A two hour job is judged by when it ends: 15:00, outside office hours
    let long = office.evaluate(None, NEW_YEARS_EVE, Duration::from_secs(7200));
    assert!(!long.is_restricted());
    assert_eq!(long.translated, NEW_YEARS_EVE + 7200);
}

#[test]
fn test_fully_restricted_preset() {
    let policy = make_test_policy();
    let frozen = get(&policy, "frozen");

    assert_eq!(
        frozen.restriction.intervals,
        Restriction::fully_restricted().intervals
    );

    for offset in [-12.0, -3.5, 0.0, 5.5, 14.0] {
        for step in 0..48 {
            let t = NEW_YEARS_EVE + step * 1800;
            assert!(frozen.evaluate(Some(offset), t, Duration::ZERO).is_restricted());
        }
    }
}

#[test]
fn test_disabled_restriction() {
    let policy = make_test_policy();
    let paused = get(&policy, "frozen-paused");

    assert!(paused.disabled);
    assert_eq!(paused.disabled_reason.as_deref(), Some("holiday"));
    assert!(!paused.evaluate(None, NEW_YEARS_EVE, Duration::ZERO).is_restricted());
}

#[test]
fn test_offset_shift_commutes_with_time_shift() {
    let policy = make_test_policy();
    let office = get(&policy, "office-hours");
    let reference = office.restriction.reference_offset;

    for offset in [-8.0, -3.5, 0.0, 2.0, 5.5, 9.75] {
        for step in 0..24 {
            let t = NEW_YEARS_EVE + step * 3600;
            let shifted = t + ((offset - reference) * 3600.0) as i64;

            let a = office.evaluate(Some(offset), t, Duration::ZERO);
            let b = office.evaluate(Some(reference), shifted, Duration::ZERO);
            assert_eq!(a, b, "offset {} at {}", offset, t);
        }
    }
}

#[test]
fn test_concurrent_evaluation() {
    let policy = make_test_policy();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let policy = &policy;
                s.spawn(move || {
                    let office = get(policy, "office-hours");
                    let t = NEW_YEARS_EVE + i * 3600;
                    (0..100)
                        .map(|_| office.evaluate(Some(0.0), t, Duration::ZERO))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let verdicts = handle.join().unwrap();
            assert!(verdicts.windows(2).all(|w| w[0] == w[1]));
        }
    });
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        config_version = 1

        [[restrictions]]
        id = "weekend"
        calendar = "+02:00"
        days_of_week = ["sat", "sun"]
        "#
    )
    .unwrap();

    let policy = curfew_config::load_config(file.path()).unwrap();
    let weekend = get(&policy, "weekend");

    // Thursday is not a weekend day
    assert!(!weekend.evaluate(None, NEW_YEARS_EVE, Duration::ZERO).is_restricted());
    // Two days later is Saturday
    let saturday = NEW_YEARS_EVE + 2 * 86400;
    assert!(weekend.evaluate(None, saturday, Duration::ZERO).is_restricted());
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = parse_config(
        r#"
        config_version = 1

        [[restrictions]]
        id = "broken"
        hours = [24]
        preset = "all"
        "#,
    );

    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}
