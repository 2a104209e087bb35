//! Strongly-typed identifiers for curfew

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a named restriction in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionId(String);

impl RestrictionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestrictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RestrictionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RestrictionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
