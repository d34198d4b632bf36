//! MCP Server for twitterapi.io
//!
//! This crate exposes a fixed catalog of Twitter operations (lookups,
//! searches, login and posting) as Model Context Protocol tools, proxying
//! each call to the twitterapi.io REST API.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (Claude/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ server: TwitterMcpServer ]
//!        |
//!        v
//! [ handlers: Dispatcher ] --validate--> [ tools: Catalog ]
//!        |         \
//!        |          +--> [ session: Session (API key, login cookie) ]
//!        v
//! [ twapi-client: UpstreamClient ] --HTTPS--> [ api.twitterapi.io ]
//! ```
//!
//! # Tools
//!
//! - Users: profile by username or id, timelines, followers, following, search
//! - Tweets: advanced search, single tweet, replies
//! - Session: `login` stores a cookie that `post_tweet` requires
//!
//! # Errors
//!
//! Unknown tools, invalid arguments, posting before login and upstream
//! failures are reported as JSON-RPC errors. A failed `login` is instead a
//! normal result whose payload reads `{"success": false, "error": ...}`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod session;
pub mod tools;

pub use error::{Error, Result};
pub use handlers::Dispatcher;
pub use server::TwitterMcpServer;
pub use session::{Session, SessionState};
pub use tools::{Catalog, ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
