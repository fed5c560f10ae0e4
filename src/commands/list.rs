//! `list available-products`

use std::io::Write;

use tracing::info;

use crate::api::source::Query;
use crate::commands::AppContext;
use crate::error::EolError;

pub async fn available_products(ctx: &mut AppContext, out: &mut dyn Write) -> Result<(), EolError> {
    info!("Listing available products");

    let view = ctx.fetch_view(&Query::AvailableProducts).await?;
    ctx.emit(&view, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::source::MockEolSource;
    use crate::cache::CacheHandle;
    use crate::output::OutputFormat;
    use std::time::Duration;

    fn context(source: MockEolSource, format: OutputFormat) -> AppContext {
        AppContext::new(Box::new(source), CacheHandle::disabled(), Duration::from_secs(60))
            .with_output(Some(format))
    }

    #[tokio::test]
    async fn available_products_renders_table() {
        let mut source = MockEolSource::new();
        source
            .expect_fetch()
            .withf(|query| *query == Query::AvailableProducts)
            .returning(|_| Ok(br#"["go","nodejs"]"#.to_vec()));
        let mut ctx = context(source, OutputFormat::Table);
        let mut out = Vec::new();

        available_products(&mut ctx, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("| PRODUCT |"));
        assert!(out.contains("| go      |"));
        assert!(out.contains("| nodejs  |"));
    }

    #[tokio::test]
    async fn available_products_renders_yaml() {
        let mut source = MockEolSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(br#"["go"]"#.to_vec()));
        let mut ctx = context(source, OutputFormat::Yaml);
        let mut out = Vec::new();

        available_products(&mut ctx, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "- go\n");
    }

    #[tokio::test]
    async fn available_products_propagates_parse_error() {
        let mut source = MockEolSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(b"<html>".to_vec()));
        let mut ctx = context(source, OutputFormat::Json);
        let mut out = Vec::new();

        let result = available_products(&mut ctx, &mut out).await;

        assert!(matches!(result, Err(EolError::Api(ApiError::Parse(_)))));
        assert!(out.is_empty());
    }
}
