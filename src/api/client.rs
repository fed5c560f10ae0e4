//! endoflife.date API client

use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::api::source::{EolSource, Query};

/// Client for the public endoflife.date API
pub struct EndOfLifeClient {
    client: reqwest::Client,
    base_url: String,
}

impl EndOfLifeClient {
    /// Creates a client for the given base URL (e.g. `https://endoflife.date/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent("eolctl")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, query: &Query) -> String {
        format!("{}/{}", self.base_url, query.path())
    }
}

#[async_trait::async_trait]
impl EolSource for EndOfLifeClient {
    async fn fetch(&self, query: &Query) -> Result<Vec<u8>, ApiError> {
        let url = self.url(query);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(query.path().trim_end_matches(".json").to_string()));
        }

        if !status.is_success() {
            warn!("EOL API returned status {}: {}", status, url);
            return Err(ApiError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> EndOfLifeClient {
        EndOfLifeClient::new(&format!("{}/api/", server.url()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_available_products_returns_raw_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/all.json")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["go","nodejs","python"]"#)
            .create_async()
            .await;

        let result = client(&server)
            .fetch(&Query::AvailableProducts)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, br#"["go","nodejs","python"]"#.to_vec());
    }

    #[tokio::test]
    async fn fetch_cycle_requests_product_version_path() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/nodejs/18.json")
            .match_header("user-agent", Matcher::Regex("eolctl".to_string()))
            .with_status(200)
            .with_body(r#"{"eol":"2025-04-30","latest":"18.20.4"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .fetch(&Query::cycle("nodejs", "18"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, br#"{"eol":"2025-04-30","latest":"18.20.4"}"#.to_vec());
    }

    #[tokio::test]
    async fn fetch_returns_not_found_for_unknown_product() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/not-a-product.json")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let result = client(&server).fetch(&Query::product("not-a-product")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ApiError::NotFound(name)) if name == "not-a-product"));
    }

    #[tokio::test]
    async fn fetch_returns_invalid_response_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/go.json")
            .with_status(500)
            .create_async()
            .await;

        let result = client(&server).fetch(&Query::product("go")).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }
}
