//! Output rendering
//!
//! Every command result implements [`Render`]: it knows its JSON form (what
//! gets exported) and its table form. YAML is derived from the JSON form.

pub mod table;

use serde::Deserialize;
use serde_json::Value;

use crate::api::types::{ApiResponse, DateOrFlag, ReleaseCycle};
use crate::error::EolError;
use crate::filter::FilteredCycle;

pub use table::Table;

/// Columns shown for a single release cycle
const CYCLE_COLUMNS: [&str; 6] = [
    "Latest",
    "LatestReleaseDate",
    "ReleaseDate",
    "LTS",
    "EOL",
    "Support",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// A command result that can be shown in any [`OutputFormat`]
pub trait Render {
    /// JSON bytes; also the content of an export
    fn to_json(&self) -> Result<Vec<u8>, EolError>;

    fn to_table(&self) -> Table;
}

/// Render `view` as text in the given format
pub fn render(view: &dyn Render, format: OutputFormat) -> Result<String, EolError> {
    match format {
        OutputFormat::Table => Ok(view.to_table().render()),
        OutputFormat::Json => String::from_utf8(view.to_json()?)
            .map_err(|e| EolError::Render(format!("response is not valid UTF-8: {}", e))),
        OutputFormat::Yaml => {
            let value: Value = serde_json::from_slice(&view.to_json()?)
                .map_err(|e| EolError::Render(format!("invalid JSON: {}", e)))?;
            serde_yaml::to_string(&value).map_err(|e| EolError::Render(e.to_string()))
        }
    }
}

/// An API response together with the exact bytes it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseView {
    body: Vec<u8>,
    response: ApiResponse,
}

impl ResponseView {
    pub fn new(body: Vec<u8>, response: ApiResponse) -> Self {
        Self { body, response }
    }

    pub fn response(&self) -> &ApiResponse {
        &self.response
    }
}

impl Render for ResponseView {
    /// The body as received, without re-encoding
    fn to_json(&self) -> Result<Vec<u8>, EolError> {
        Ok(self.body.clone())
    }

    fn to_table(&self) -> Table {
        match &self.response {
            ApiResponse::Products(products) => {
                let mut table = Table::new(["Product"]);
                for product in products {
                    table.push_row([product.as_str()]);
                }
                table
            }
            ApiResponse::Cycles(cycles) => {
                let mut table = Table::new(std::iter::once("Cycle").chain(CYCLE_COLUMNS));
                for cycle in cycles {
                    table.push_row(
                        std::iter::once(text(&cycle.cycle)).chain(cycle_cells(cycle)),
                    );
                }
                table
            }
            ApiResponse::Cycle(cycle) => {
                let mut table = Table::new(CYCLE_COLUMNS);
                table.push_row(cycle_cells(cycle));
                table
            }
        }
    }
}

/// Cycles left after range filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView(pub Vec<FilteredCycle>);

impl Render for FilteredView {
    fn to_json(&self) -> Result<Vec<u8>, EolError> {
        serde_json::to_vec(&self.0).map_err(|e| EolError::Render(e.to_string()))
    }

    fn to_table(&self) -> Table {
        let mut table = Table::new(std::iter::once("Cycle").chain(CYCLE_COLUMNS));
        for c in &self.0 {
            table.push_row([
                c.cycle.as_str(),
                c.latest.as_str(),
                c.latest_release_date.as_str(),
                c.release_date.as_str(),
                c.lts.as_str(),
                c.eol.as_str(),
                c.support.as_str(),
            ]);
        }
        table
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn flag_or_date(value: &Option<DateOrFlag>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Cells for [`CYCLE_COLUMNS`]
pub(crate) fn cycle_cells(cycle: &ReleaseCycle) -> [String; 6] {
    [
        text(&cycle.latest),
        text(&cycle.latest_release_date),
        text(&cycle.release_date),
        flag_or_date(&cycle.lts),
        flag_or_date(&cycle.eol),
        flag_or_date(&cycle.support),
    ]
}
