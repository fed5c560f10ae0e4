//! Typed responses of the endoflife.date API
//!
//! The API is loosely typed: `lts`, `eol` and `support` are either a boolean
//! flag or an ISO date string, and any text field may be missing or null.
//! Everything is resolved here, once, so callers never inspect raw JSON.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Date format used by the API
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A field that is either a boolean flag or a date
///
/// Strings that aren't `YYYY-MM-DD` dates are kept verbatim as `Text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOrFlag {
    Flag(bool),
    Date(NaiveDate),
    Text(String),
}

impl DateOrFlag {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(DateOrFlag::Flag(flag)),
            Value::String(s) => Some(match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                Ok(date) => DateOrFlag::Date(date),
                Err(_) => DateOrFlag::Text(s),
            }),
            _ => None,
        }
    }

    /// The string form of the field, or an empty string for flags
    pub fn date_string(&self) -> String {
        match self {
            DateOrFlag::Date(date) => date.format(DATE_FORMAT).to_string(),
            DateOrFlag::Text(text) => text.clone(),
            DateOrFlag::Flag(_) => String::new(),
        }
    }
}

impl fmt::Display for DateOrFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrFlag::Flag(flag) => write!(f, "{}", flag),
            DateOrFlag::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            DateOrFlag::Text(text) => f.write_str(text),
        }
    }
}

/// One release cycle of a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCycle {
    #[serde(default, deserialize_with = "string_or_none")]
    pub cycle: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub latest: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub latest_release_date: Option<String>,
    #[serde(default, deserialize_with = "date_or_flag")]
    pub lts: Option<DateOrFlag>,
    #[serde(default, deserialize_with = "date_or_flag")]
    pub eol: Option<DateOrFlag>,
    #[serde(default, deserialize_with = "date_or_flag")]
    pub support: Option<DateOrFlag>,
}

impl ReleaseCycle {
    /// EOL status of this cycle on the given day
    pub fn eol_status(&self, today: NaiveDate) -> EolStatus {
        match &self.eol {
            Some(DateOrFlag::Flag(true)) => EolStatus::Eol,
            Some(DateOrFlag::Flag(false)) => EolStatus::Supported,
            Some(DateOrFlag::Date(date)) if today > *date => EolStatus::Eol,
            Some(DateOrFlag::Date(_)) => EolStatus::Supported,
            Some(DateOrFlag::Text(_)) | None => EolStatus::Unknown,
        }
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn date_or_flag<'de, D>(deserializer: D) -> Result<Option<DateOrFlag>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(DateOrFlag::from_value))
}

/// Whether a cycle has reached its end of life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolStatus {
    Eol,
    Supported,
    Unknown,
}

impl EolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EolStatus::Eol => "EOL",
            EolStatus::Supported => "Supported",
            EolStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// `all.json`: product names
    Products(Vec<String>),
    /// `<product>.json`: all cycles of a product
    Cycles(Vec<ReleaseCycle>),
    /// `<product>/<version>.json`: a single cycle
    Cycle(ReleaseCycle),
}
