//! MCP Server implementation
//!
//! The main server struct that coordinates MCP protocol handling with the
//! tool dispatcher.

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use twapi_client::ClientConfig;

use crate::error::codes;
use crate::handlers::Dispatcher;
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
};
use crate::{Error, Result};

/// MCP Server for twitterapi.io
///
/// Exposes the tool catalog over the Model Context Protocol and forwards
/// tool calls to the [`Dispatcher`], which holds the login session.
///
/// # Example
///
/// ```ignore
/// use twapi_client::ClientConfig;
/// use twapi_mcp::TwitterMcpServer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut server = TwitterMcpServer::new(&ClientConfig::with_api_key("..."))?;
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct TwitterMcpServer {
    dispatcher: Dispatcher,

    /// Whether the server has been initialized
    initialized: bool,
}

impl TwitterMcpServer {
    /// Create a new MCP server instance from upstream configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_dispatcher(Dispatcher::from_config(config)?))
    }

    /// Create a server around an existing dispatcher
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            initialized: false,
        }
    }

    /// Initialize the server
    pub async fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            tools = self.dispatcher.catalog().len(),
            "Initializing MCP server"
        );

        self.initialized = true;
        Ok(())
    }

    /// Run the MCP server
    ///
    /// This starts the server and processes MCP protocol messages over
    /// stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Process newline-delimited JSON-RPC messages from `reader`, writing
    /// one response line per request to `writer`.
    ///
    /// Messages are handled strictly one at a time.
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if !self.initialized {
            self.initialize().await?;
        }

        tracing::info!("MCP server ready, listening on stdio");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!(bytes = line.len(), "Received message");

            let response = match self.handle_message(line).await {
                Ok(response) => response,
                Err(e) => serde_json::to_string(&JsonRpcResponse::error(
                    None,
                    codes::INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                ))?,
            };

            // Notifications produce no response
            if !response.is_empty() {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Parses the JSON-RPC request and dispatches to the appropriate handler.
    ///
    /// # Returns
    ///
    /// The JSON-RPC response as a string, or empty string for notifications.
    /// Text that is not JSON gets a parse error with a null id; JSON that is
    /// not a request gets an invalid-request error echoing its `id`.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse message");
                return encode(&JsonRpcResponse::error(
                    None,
                    codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").filter(|id| !id.is_null()).cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request");
                return encode(&JsonRpcResponse::error(
                    id,
                    codes::INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                ));
            }
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        encode(&response)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info.
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if let Ok(params) = serde_json::from_value::<InitializeParams>(params) {
            tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol = %params.protocol_version,
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "twapi-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = self.dispatcher.catalog().definitions();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    ///
    /// Successful calls (and failed logins) come back as a tool result;
    /// everything else becomes a JSON-RPC error.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
        };

        match self
            .dispatcher
            .invoke(&tool_params.name, tool_params.arguments)
            .await
            .and_then(|result| serde_json::to_value(result).map_err(Error::from))
        {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                tracing::warn!(tool = %tool_params.name, error = %e, "Tool call failed");
                JsonRpcResponse::from_error(id, &e)
            }
        }
    }

    /// Check if the server is initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The dispatcher handling tool calls
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

fn encode(response: &JsonRpcResponse) -> Result<String> {
    serde_json::to_string(response).map_err(Error::from)
}
