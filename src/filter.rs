//! Version range selection over release cycles
//!
//! Ranges compare cycle identifiers as plain strings, byte by byte: `"9"` sorts
//! after `"14"` and `"100"` sorts between `"10"` and `"14"`. A range from `8`
//! to `10` is empty because `"8"` sorts after `"10"`.

use serde::Serialize;

use crate::api::types::{DateOrFlag, ReleaseCycle};
use crate::error::EolError;

/// What part of a product's lifecycle a `get product` call asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every cycle
    All,
    /// One exact cycle
    Version(String),
    /// Cycles within `[min, max]`
    Range { min: String, max: String },
}

impl Selection {
    /// Validate the version/range flags before anything is fetched
    pub fn from_args(
        version: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
    ) -> Result<Self, EolError> {
        match (version, min, max) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(EolError::usage(
                "custom range (--min/--max) can't be combined with a specific --version",
            )),
            (None, Some(min), Some(max)) => Ok(Selection::Range {
                min: min.to_string(),
                max: max.to_string(),
            }),
            (None, Some(_), None) | (None, None, Some(_)) => Err(EolError::usage(
                "a custom range needs both --min and --max",
            )),
            (Some(version), None, None) => Ok(Selection::Version(version.to_string())),
            (None, None, None) => Ok(Selection::All),
        }
    }

    /// The exact version to request from the API, if any
    pub fn version(&self) -> Option<&str> {
        match self {
            Selection::Version(version) => Some(version),
            _ => None,
        }
    }
}

/// A cycle re-emitted with every field flattened to a string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredCycle {
    pub cycle: String,
    pub release_date: String,
    pub latest: String,
    pub latest_release_date: String,
    pub lts: String,
    pub eol: String,
    pub support: String,
}

impl FilteredCycle {
    fn project(cycle: &str, record: &ReleaseCycle) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let date = |value: &Option<DateOrFlag>| {
            value.as_ref().map(DateOrFlag::date_string).unwrap_or_default()
        };

        Self {
            cycle: cycle.to_string(),
            release_date: text(&record.release_date),
            latest: text(&record.latest),
            latest_release_date: text(&record.latest_release_date),
            lts: date(&record.lts),
            eol: date(&record.eol),
            support: date(&record.support),
        }
    }
}

/// Lexical `min <= cycle <= max`
pub fn is_within_range(cycle: &str, min: &str, max: &str) -> bool {
    min <= cycle && cycle <= max
}

/// Keep the records whose cycle lies within `[min, max]`, in input order.
///
/// Records without a string `cycle` are skipped.
pub fn filter_cycles(records: &[ReleaseCycle], min: &str, max: &str) -> Vec<FilteredCycle> {
    records
        .iter()
        .filter_map(|record| {
            let cycle = record.cycle.as_deref()?;
            is_within_range(cycle, min, max).then(|| FilteredCycle::project(cycle, record))
        })
        .collect()
}
