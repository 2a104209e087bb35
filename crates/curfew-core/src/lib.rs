//! Restriction evaluation engine for curfew
//!
//! Answers one question for an external scheduler: is an action forbidden
//! from starting right now by a set of recurring calendar restrictions?
//!
//! - Time translation: reconcile the caller's UTC offset with the
//!   restriction's reference offset and fold in the estimated duration
//! - Six independent interval checks (month, ISO week, day of month,
//!   day of week, hour, minute), evaluated in that order
//! - The first matching dimension restricts the action

mod interval;
mod restriction;
mod translate;

pub use interval::*;
pub use restriction::*;
pub use translate::*;

pub use curfew_util::{CalendarFields, CalendarFrame};
