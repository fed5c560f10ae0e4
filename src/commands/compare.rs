//! `compare product`

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::source::Query;
use crate::api::types::{ApiResponse, DateOrFlag, ReleaseCycle};
use crate::commands::AppContext;
use crate::error::EolError;
use crate::output::{Render, Table};

/// One compared field of two release cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: &'static str,
    pub first: String,
    pub second: String,
    pub differs: bool,
}

/// Field-by-field comparison of two cycles of one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub product: String,
    pub versions: [String; 2],
    pub fields: Vec<FieldDiff>,
}

fn fields(cycle: &ReleaseCycle) -> [(&'static str, String); 6] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let flag_or_date =
        |value: &Option<DateOrFlag>| value.as_ref().map(ToString::to_string).unwrap_or_default();

    [
        ("latest", text(&cycle.latest)),
        ("releaseDate", text(&cycle.release_date)),
        ("latestReleaseDate", text(&cycle.latest_release_date)),
        ("lts", flag_or_date(&cycle.lts)),
        ("eol", flag_or_date(&cycle.eol)),
        ("support", flag_or_date(&cycle.support)),
    ]
}

impl Comparison {
    pub fn new(
        product: &str,
        versions: [&str; 2],
        first: &ReleaseCycle,
        second: &ReleaseCycle,
    ) -> Self {
        let fields = fields(first)
            .into_iter()
            .zip(fields(second))
            .map(|((field, a), (_, b))| FieldDiff {
                field,
                differs: a != b,
                first: a,
                second: b,
            })
            .collect();

        Self {
            product: product.to_string(),
            versions: versions.map(str::to_string),
            fields,
        }
    }

    pub fn differences(&self) -> impl Iterator<Item = &FieldDiff> {
        self.fields.iter().filter(|f| f.differs)
    }
}

impl Render for Comparison {
    fn to_json(&self) -> Result<Vec<u8>, EolError> {
        serde_json::to_vec(self).map_err(|e| EolError::Render(e.to_string()))
    }

    fn to_table(&self) -> Table {
        let [first, second] = &self.versions;
        let mut table = Table::new([
            "Field".to_string(),
            format!("{} {}", self.product, first),
            format!("{} {}", self.product, second),
            "Differs".to_string(),
        ]);
        for diff in &self.fields {
            table.push_row([
                diff.field,
                diff.first.as_str(),
                diff.second.as_str(),
                if diff.differs { "*" } else { "" },
            ]);
        }
        table
    }
}

async fn fetch_cycle(
    ctx: &mut AppContext,
    name: &str,
    version: &str,
) -> Result<ReleaseCycle, EolError> {
    let view = ctx.fetch_view(&Query::cycle(name, version)).await?;
    match view.response() {
        ApiResponse::Cycle(cycle) => Ok(cycle.clone()),
        _ => Err(ApiError::InvalidResponse(format!(
            "expected a single release cycle for {} {}",
            name, version
        ))
        .into()),
    }
}

/// Compare two release cycles of `name` field by field
pub async fn product(
    ctx: &mut AppContext,
    name: &str,
    first: &str,
    second: &str,
    out: &mut dyn Write,
) -> Result<(), EolError> {
    info!("Comparing {} {} with {}", name, first, second);

    ctx.ensure_product_exists(name).await?;

    let first_cycle = fetch_cycle(ctx, name, first).await?;
    let second_cycle = fetch_cycle(ctx, name, second).await?;

    let comparison = Comparison::new(name, [first, second], &first_cycle, &second_cycle);
    info!(
        "{} of {} fields differ",
        comparison.differences().count(),
        comparison.fields.len()
    );

    ctx.emit(&comparison, out)
}
