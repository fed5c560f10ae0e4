//! Source trait for fetching EOL data

#[cfg(test)]
use mockall::automock;

use crate::api::error::ApiError;
use crate::api::types::{ApiResponse, ReleaseCycle};

/// The three request shapes the API answers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// All product names
    AvailableProducts,
    /// All release cycles of a product
    Product { name: String },
    /// A single release cycle of a product
    Cycle { name: String, version: String },
}

impl Query {
    pub fn product(name: &str) -> Self {
        Query::Product {
            name: name.to_string(),
        }
    }

    pub fn cycle(name: &str, version: &str) -> Self {
        Query::Cycle {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// `product(name)` without a version, `cycle(name, version)` with one
    pub fn for_product(name: &str, version: Option<&str>) -> Self {
        match version {
            Some(version) => Self::cycle(name, version),
            None => Self::product(name),
        }
    }

    /// Deterministic cache key for this query
    pub fn cache_key(&self) -> String {
        match self {
            Query::AvailableProducts => "available-products".to_string(),
            Query::Product { name } => format!("product-{}", name),
            Query::Cycle { name, version } => format!("product-{}-{}", name, version),
        }
    }

    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Query::AvailableProducts => "all.json".to_string(),
            Query::Product { name } => format!("{}.json", name),
            Query::Cycle { name, version } => format!("{}/{}.json", name, version),
        }
    }

    /// Decode a response body into the shape this query returns
    pub fn decode(&self, body: &[u8]) -> Result<ApiResponse, ApiError> {
        let response = match self {
            Query::AvailableProducts => {
                ApiResponse::Products(serde_json::from_slice::<Vec<String>>(body)?)
            }
            Query::Product { .. } => {
                ApiResponse::Cycles(serde_json::from_slice::<Vec<ReleaseCycle>>(body)?)
            }
            Query::Cycle { .. } => ApiResponse::Cycle(serde_json::from_slice::<ReleaseCycle>(body)?),
        };
        Ok(response)
    }
}

/// Trait for fetching raw responses from the EOL API
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait EolSource: Send + Sync {
    /// Fetches the raw JSON body answering `query`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The response body, unmodified
    /// * `Err(ApiError::NotFound)` - If the product or version doesn't exist
    /// * `Err(ApiError)` - If the request fails otherwise
    async fn fetch(&self, query: &Query) -> Result<Vec<u8>, ApiError>;
}
