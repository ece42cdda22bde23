//! Testing utilities for code built on the factories.
//!
//! This module provides:
//! - A scripted [`JsonFetcher`](crate::http::JsonFetcher) that records requests
//! - A fixed index picker
//! - Representative service responses

pub mod fixtures;
mod mocks;

pub use mocks::{FixedPicker, MockFetcher, ScriptedResponse};
