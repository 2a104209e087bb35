//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Settings shared by every restriction
    #[serde(default)]
    pub defaults: RawDefaults,

    /// Named restrictions
    #[serde(default)]
    pub restrictions: Vec<RawRestriction>,
}

/// Defaults applied to restrictions that don't override them
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDefaults {
    /// Reference UTC offset in hours (default: 0)
    pub reference_offset: Option<f64>,

    /// Calendar frame: "utc", "local" or "+HH:MM" (default: utc)
    pub calendar: Option<String>,
}

/// Raw restriction definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRestriction {
    /// Unique stable ID
    pub id: String,

    /// Display label
    pub label: Option<String>,

    /// Reference UTC offset in hours, overrides the default
    pub reference_offset: Option<f64>,

    /// Calendar frame, overrides the default
    pub calendar: Option<String>,

    /// Named preset: "all" restricts every instant
    pub preset: Option<String>,

    #[serde(default)]
    pub months: Vec<RawInterval>,

    #[serde(default)]
    pub weeks: Vec<RawInterval>,

    #[serde(default)]
    pub days_of_month: Vec<RawInterval>,

    /// Days of week: 0 (Sunday) to 6 (Saturday) or names like "mon", "mon-fri"
    #[serde(default)]
    pub days_of_week: Vec<RawInterval>,

    #[serde(default)]
    pub hours: Vec<RawInterval>,

    #[serde(default)]
    pub minutes: Vec<RawInterval>,

    /// Explicitly disabled
    #[serde(default)]
    pub disabled: bool,

    /// Reason for disabling
    pub disabled_reason: Option<String>,
}

impl RawRestriction {
    /// Whether any dimension lists intervals explicitly
    pub fn has_intervals(&self) -> bool {
        !(self.months.is_empty()
            && self.weeks.is_empty()
            && self.days_of_month.is_empty()
            && self.days_of_week.is_empty()
            && self.hours.is_empty()
            && self.minutes.is_empty())
    }
}

/// One interval entry: `5`, `"5"`, `"10-11"`, `"mon-fri"` or `{ from = 6, to = 14 }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawInterval {
    Range { from: RawValue, to: RawValue },
    Single(RawValue),
}

/// A single bound: a number or a name/text
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(i64),
    Text(String),
}
