//! Shared utilities for curfew
//!
//! This crate provides:
//! - ID types (RestrictionId)
//! - Time utilities (UTC offsets, calendar frames, instant parsing)
//! - Error types
//! - Default config path lookup

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
