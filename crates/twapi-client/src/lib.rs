//! Upstream client for the twitterapi.io REST API
//!
//! This crate is the HTTP layer underneath `twapi-mcp`. It knows how to
//! reach the upstream service and nothing about tools or sessions:
//!
//! ```text
//! [ twapi-mcp Dispatcher ]
//!        | UpstreamRequest (method, path, query | body, cookie)
//!        v
//! [ twapi-client UpstreamClient ]  --x-api-key, Cookie-->  [ api.twitterapi.io ]
//!        |
//!        v
//! [ UpstreamResponse (status, JSON body) | Error::Api | Error::Http ]
//! ```
//!
//! # Configuration
//!
//! [`ClientConfig`] carries the API key, base URL, request timeout and an
//! optional explicit proxy. Without an explicit proxy, `reqwest` honours the
//! usual `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` environment variables.

pub mod client;
pub mod config;
pub mod error;
pub mod request;

pub use client::{UpstreamClient, UpstreamResponse, is_header_safe};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use request::{HttpMethod, UpstreamRequest};
