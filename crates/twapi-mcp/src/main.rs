//! twitterapi.io MCP Server
//!
//! A Model Context Protocol server that exposes Twitter lookups, searches and
//! posting (through twitterapi.io) to agentic IDEs and assistants.
//!
//! # Usage
//!
//! ```bash
//! TWITTERAPI_API_KEY=... twapi-mcp [--config <path>] [--base-url <url>]
//! ```
//!
//! # Environment Variables
//!
//! - `TWITTERAPI_API_KEY`: upstream API key
//! - `TWITTERAPI_CONFIG`: optional TOML config file
//! - `TWITTERAPI_BASE_URL`, `TWITTERAPI_TIMEOUT_SECS`, `TWITTERAPI_PROXY`
//! - `HTTP_PROXY` / `HTTPS_PROXY`: used when no explicit proxy is set
//! - `RUST_LOG`: Control log verbosity (default: `twapi_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use twapi_mcp::TwitterMcpServer;
use twapi_mcp::config::{ConfigOverrides, resolve};

/// MCP server for the twitterapi.io REST API
#[derive(Parser)]
#[command(name = "twapi-mcp")]
#[command(about = "MCP server for the twitterapi.io REST API")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "TWITTERAPI_CONFIG")]
    config: Option<PathBuf>,

    /// twitterapi.io API key
    #[arg(long, env = "TWITTERAPI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Upstream base URL
    #[arg(long, env = "TWITTERAPI_BASE_URL")]
    base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "TWITTERAPI_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Proxy URL for all upstream calls
    #[arg(long, env = "TWITTERAPI_PROXY")]
    proxy: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_file: args.config,
            api_key: args.api_key,
            base_url: args.base_url,
            timeout_secs: args.timeout_secs,
            proxy: args.proxy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("twapi_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve(&args.into())?;

    tracing::info!(base_url = %config.base_url, "Starting twapi-mcp server");

    let mut server = TwitterMcpServer::new(&config)?;
    server.run().await?;

    Ok(())
}
