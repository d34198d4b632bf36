//! Shared test utilities for the twitterapi-mcp workspace.
//!
//! This crate provides a fake upstream API so that crate test suites can
//! exercise real HTTP round trips without reaching twitterapi.io. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`upstream`]: [`FakeUpstream`], a `wiremock` server with request inspection
//! - [`fixtures`]: canned upstream payloads

pub mod fixtures;
pub mod upstream;

pub use upstream::{FakeUpstream, RecordedRequest};
