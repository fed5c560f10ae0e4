//! Shared test utilities

#![allow(dead_code)]

pub mod source;

pub use source::{FakeSource, test_context};
