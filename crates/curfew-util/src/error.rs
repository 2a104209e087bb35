//! Error types for curfew

use thiserror::Error;

use crate::RestrictionId;

/// Core error type for curfew operations
#[derive(Debug, Error)]
pub enum CurfewError {
    #[error("Restriction not found: {0}")]
    RestrictionNotFound(RestrictionId),

    #[error("Invalid instant '{0}': expected epoch seconds, RFC 3339 or YYYY-MM-DD HH:MM:SS")]
    InvalidInstant(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    #[error("Invalid calendar frame '{0}': expected utc, local or +HH:MM")]
    InvalidCalendarFrame(String),
}

impl CurfewError {
    pub fn not_found(id: impl Into<RestrictionId>) -> Self {
        Self::RestrictionNotFound(id.into())
    }

    pub fn invalid_instant(value: impl Into<String>) -> Self {
        Self::InvalidInstant(value.into())
    }

    pub fn invalid_offset(msg: impl Into<String>) -> Self {
        Self::InvalidOffset(msg.into())
    }

    pub fn invalid_calendar_frame(value: impl Into<String>) -> Self {
        Self::InvalidCalendarFrame(value.into())
    }
}

pub type Result<T> = std::result::Result<T, CurfewError>;
