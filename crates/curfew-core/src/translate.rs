//! Translation of a request instant into the restriction's reference frame

use curfew_util::offset_hours_to_seconds;
use std::time::Duration;

/// Translate a request instant for evaluation.
///
/// The caller observed `request_time` (UNIX seconds) at UTC offset
/// `request_offset`; the restriction calendar is defined relative to
/// `reference_offset`. The result is shifted by the rounded offset
/// difference and then advanced by the estimated duration of the action,
/// so the check applies to when the action would be in effect:
///
/// `request_time + round((request_offset - reference_offset) * 3600) + estimated`
///
/// Sub-second parts of `estimated` are dropped. Arithmetic saturates at the
/// `i64` bounds.
pub fn translate(
    request_offset: f64,
    request_time: i64,
    reference_offset: f64,
    estimated: Duration,
) -> i64 {
    let shift = offset_hours_to_seconds(request_offset - reference_offset);
    request_time
        .saturating_add(shift)
        .saturating_add(duration_secs(estimated))
}

/// Translate assuming the caller already uses the reference offset.
pub fn translate_no_offset(request_time: i64, estimated: Duration) -> i64 {
    request_time.saturating_add(duration_secs(estimated))
}

fn duration_secs(d: Duration) -> i64 {
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}
