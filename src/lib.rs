//! eolctl: End-of-Life lookups against the endoflife.date API
//!
//! # Modules
//!
//! - [`api`]: API client, typed responses and cache-through fetching
//! - [`cache`]: file-backed response cache
//! - [`commands`]: `list`, `get`, `scan` and `compare`
//! - [`filter`]: version range selection
//! - [`output`]: table, JSON and YAML rendering
//! - [`scanner`]: project language and runtime version detection

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod output;
pub mod scanner;
