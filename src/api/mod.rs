//! endoflife.date API layer
//!
//! # Modules
//!
//! - [`client`]: reqwest-based client for the public API
//! - [`source`]: `EolSource` trait and the `Query` shapes it answers
//! - [`fetch`]: cache-through fetching on top of any `EolSource`
//! - [`types`]: typed API responses (`ReleaseCycle`, `DateOrFlag`, `ApiResponse`)
//! - [`error`]: error type for API operations

pub mod client;
pub mod error;
pub mod fetch;
pub mod source;
pub mod types;

pub use client::EndOfLifeClient;
pub use error::ApiError;
pub use fetch::fetch_cached;
pub use source::{EolSource, Query};
pub use types::{ApiResponse, DateOrFlag, EolStatus, ReleaseCycle};
