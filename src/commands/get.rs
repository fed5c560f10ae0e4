//! `get product`

use std::io::Write;

use tracing::{debug, info};

use crate::api::error::ApiError;
use crate::api::source::Query;
use crate::api::types::ApiResponse;
use crate::commands::AppContext;
use crate::error::EolError;
use crate::filter::{Selection, filter_cycles};
use crate::output::FilteredView;

/// Show the cycles of `name` picked by `selection`.
///
/// The selection is validated by the caller before anything is fetched.
pub async fn product(
    ctx: &mut AppContext,
    name: &str,
    selection: &Selection,
    out: &mut dyn Write,
) -> Result<(), EolError> {
    info!("Getting product {} ({:?})", name, selection);

    ctx.ensure_product_exists(name).await?;

    let query = Query::for_product(name, selection.version());
    let view = ctx.fetch_view(&query).await?;

    let Selection::Range { min, max } = selection else {
        return ctx.emit(&view, out);
    };

    let ApiResponse::Cycles(cycles) = view.response() else {
        return Err(
            ApiError::InvalidResponse(format!("expected release cycles for {}", name)).into(),
        );
    };

    let filtered = filter_cycles(cycles, min, max);
    debug!(
        "{} of {} cycles within [{}, {}]",
        filtered.len(),
        cycles.len(),
        min,
        max
    );

    ctx.emit(&FilteredView(filtered), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::source::MockEolSource;
    use crate::cache::CacheHandle;
    use crate::output::OutputFormat;
    use std::time::Duration;

    const PRODUCTS: &[u8] = br#"["go","nodejs","python"]"#;
    const NODE_CYCLES: &[u8] = br#"[
        {"cycle":"22","latest":"22.9.0","eol":"2027-04-30","lts":"2024-10-29"},
        {"cycle":"20","latest":"20.18.0","eol":"2026-04-30","lts":"2023-10-24"},
        {"cycle":"18","latest":"18.20.4","eol":"2025-04-30","lts":"2022-10-25"},
        {"cycle":"9","latest":"9.11.2","eol":"2018-06-30","lts":false}
    ]"#;

    fn node_source() -> MockEolSource {
        let mut source = MockEolSource::new();
        source.expect_fetch().returning(|query| match query {
            Query::AvailableProducts => Ok(PRODUCTS.to_vec()),
            Query::Product { name } if name == "nodejs" => Ok(NODE_CYCLES.to_vec()),
            Query::Cycle { name, version } if name == "nodejs" && version == "18" => {
                Ok(br#"{"latest":"18.20.4","eol":"2025-04-30"}"#.to_vec())
            }
            other => Err(ApiError::NotFound(other.path())),
        });
        source
    }

    fn context(format: OutputFormat) -> AppContext {
        AppContext::new(
            Box::new(node_source()),
            CacheHandle::disabled(),
            Duration::from_secs(60),
        )
        .with_output(Some(format))
    }

    #[tokio::test]
    async fn product_without_selection_passes_cycles_through() {
        let mut ctx = context(OutputFormat::Json);
        let mut out = Vec::new();

        product(&mut ctx, "nodejs", &Selection::All, &mut out)
            .await
            .unwrap();

        assert_eq!(
            out,
            [NODE_CYCLES, &b"\n"[..]].concat(),
            "the raw body is printed unchanged"
        );
    }

    #[tokio::test]
    async fn product_with_version_fetches_single_cycle() {
        let mut ctx = context(OutputFormat::Table);
        let mut out = Vec::new();

        product(
            &mut ctx,
            "nodejs",
            &Selection::Version("18".to_string()),
            &mut out,
        )
        .await
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("CYCLE"));
        assert!(out.contains("18.20.4"));
    }

    #[tokio::test]
    async fn product_with_range_filters_lexically() {
        let mut ctx = context(OutputFormat::Json);
        let mut out = Vec::new();
        let range = Selection::Range {
            min: "18".to_string(),
            max: "20".to_string(),
        };

        product(&mut ctx, "nodejs", &range, &mut out).await.unwrap();

        let rows: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
        let cycles: Vec<&str> = rows.iter().map(|r| r["cycle"].as_str().unwrap()).collect();
        assert_eq!(cycles, vec!["20", "18"]);
        assert_eq!(rows[1]["lts"], "2022-10-25");
    }

    #[tokio::test]
    async fn product_with_empty_range_prints_empty_list() {
        let mut ctx = context(OutputFormat::Json);
        let mut out = Vec::new();
        let range = Selection::Range {
            min: "8".to_string(),
            max: "10".to_string(),
        };

        product(&mut ctx, "nodejs", &range, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[tokio::test]
    async fn product_unknown_to_api_is_not_found() {
        let mut ctx = context(OutputFormat::Table);
        let mut out = Vec::new();

        let result = product(&mut ctx, "node", &Selection::All, &mut out).await;

        assert!(matches!(result, Err(EolError::NotFound(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn product_with_unknown_version_is_api_not_found() {
        let mut ctx = context(OutputFormat::Table);
        let mut out = Vec::new();

        let result = product(
            &mut ctx,
            "nodejs",
            &Selection::Version("99".to_string()),
            &mut out,
        )
        .await;

        assert!(matches!(result, Err(EolError::Api(ApiError::NotFound(_)))));
    }
}
