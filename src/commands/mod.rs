//! Command implementations
//!
//! Each command takes the shared [`AppContext`] and a writer for stdout, so
//! tests can drive commands against a fake source and capture their output.

pub mod compare;
pub mod get;
pub mod list;
pub mod scan;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::api::fetch::fetch_cached;
use crate::api::source::{EolSource, Query};
use crate::api::types::ApiResponse;
use crate::cache::CacheHandle;
use crate::error::EolError;
use crate::export::export_to_file;
use crate::output::{OutputFormat, Render, ResponseView, render};

/// State shared by every command of one invocation
pub struct AppContext {
    pub source: Box<dyn EolSource>,
    pub cache: CacheHandle,
    pub cache_ttl: Duration,
    /// Format requested with `--output`
    pub output: Option<OutputFormat>,
    /// Format used when `--output` is absent
    pub default_format: OutputFormat,
    /// Directory given with `--output-path`
    pub output_path: Option<PathBuf>,
}

impl AppContext {
    pub fn new(source: Box<dyn EolSource>, cache: CacheHandle, cache_ttl: Duration) -> Self {
        Self {
            source,
            cache,
            cache_ttl,
            output: None,
            default_format: OutputFormat::default(),
            output_path: None,
        }
    }

    pub fn with_output(mut self, output: Option<OutputFormat>) -> Self {
        self.output = output;
        self
    }

    pub fn with_default_format(mut self, format: OutputFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    /// Fetch and decode `query` through the cache, keeping the raw body for output
    pub async fn fetch_view(&mut self, query: &Query) -> Result<ResponseView, EolError> {
        let (body, response) =
            fetch_cached(self.source.as_ref(), &mut self.cache, query, self.cache_ttl).await?;
        Ok(ResponseView::new(body, response))
    }

    /// Exact-match check against the available products list
    pub async fn ensure_product_exists(&mut self, name: &str) -> Result<(), EolError> {
        let view = self.fetch_view(&Query::AvailableProducts).await?;

        match view.response() {
            ApiResponse::Products(products) if products.iter().any(|p| p == name) => Ok(()),
            _ => Err(EolError::not_found(format!(
                "{} doesn't exist on the API",
                name
            ))),
        }
    }

    /// Export and/or print a command result.
    ///
    /// With `--output-path` the JSON form is exported. The result is printed
    /// when `--output` is given or nothing was exported.
    pub fn emit(&self, view: &dyn Render, out: &mut dyn Write) -> Result<(), EolError> {
        if let Some(dir) = &self.output_path {
            export_to_file(&view.to_json()?, dir)?;
        }

        if self.output.is_none() && self.output_path.is_some() {
            debug!("Output exported only, nothing printed");
            return Ok(());
        }

        let format = self.output.unwrap_or(self.default_format);
        let mut rendered = render(view, format)?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}
