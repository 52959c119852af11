//! MCP Server implementation
//!
//! The main server struct that coordinates MCP protocol handling
//! with the component resolver.

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::handlers::{ToolContext, handle_tool_call};
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ReadResourceParams, ResourcesCapability, ServerCapabilities, ServerInfo, ToolCallParams,
    ToolsCapability, codes,
};
use crate::resource_handlers::read_resource;
use crate::resources::{ResourceDefinition, get_resource_definitions};
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// MCP Server for compdoc
///
/// Answers component lookups against whatever tree the shared repository
/// handle currently points at. Synchronization runs separately (see
/// [`SyncService`](crate::SyncService)).
///
/// # Example
///
/// ```ignore
/// use compdoc_mcp::{CompdocMcpServer, ToolContext};
///
/// let mut server = CompdocMcpServer::new(ToolContext::new(assembler, ErrorMode::Strict), false);
/// server.run().await?;
/// ```
pub struct CompdocMcpServer {
    context: ToolContext,

    /// Whether `get_document` is advertised
    expose_get_document: bool,

    /// Whether the server has been initialized
    initialized: bool,

    /// Available MCP tools
    tools: Vec<ToolDefinition>,

    /// Available MCP resources
    resources: Vec<ResourceDefinition>,
}

impl CompdocMcpServer {
    /// Create a new MCP server instance
    pub fn new(context: ToolContext, expose_get_document: bool) -> Self {
        Self {
            context,
            expose_get_document,
            initialized: false,
            tools: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Load tool and resource definitions.
    pub fn initialize(&mut self) {
        tracing::info!(
            root = %self.context.assembler.resolver().handle().root().display(),
            error_mode = ?self.context.error_mode,
            "Initializing MCP server"
        );

        self.tools = get_tool_definitions(self.expose_get_document);
        self.resources = get_resource_definitions();
        self.initialized = true;
    }

    /// Serve MCP over stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, writing responses to `writer`.
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if !self.initialized {
            self.initialize();
        }
        tracing::info!("MCP server ready, listening on stdio");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            let response = match self.handle_message(line).await {
                Ok(response) => response,
                Err(e) => serde_json::to_string(&JsonRpcResponse::error(
                    None,
                    codes::INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                ))?,
            };
            if response.is_empty() {
                continue; // Notification, no response
            }

            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Returns the JSON-RPC response as a string, or an empty string for
    /// notifications.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                let response =
                    JsonRpcResponse::error(None, codes::PARSE_ERROR, format!("Parse error: {}", e));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        if request.jsonrpc != "2.0" {
            let response = JsonRpcResponse::error(
                request.id,
                codes::INVALID_REQUEST,
                format!("Invalid Request: unsupported jsonrpc version '{}'", request.jsonrpc),
            );
            return serde_json::to_string(&response).map_err(Error::from);
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params)?,
            "initialized" | "notifications/initialized" => return Ok(String::new()),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            "resources/list" => self.handle_resources_list(request.id),
            "resources/read" => self.handle_resources_read(request.id, request.params).await,
            _ if request.is_notification() => {
                tracing::debug!(method = %request.method, "Ignoring notification");
                return Ok(String::new());
            }
            _ => JsonRpcResponse::error(
                request.id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if let Ok(params) = serde_json::from_value::<InitializeParams>(params) {
            let client = params.client_info.as_ref().map(|c| c.name.as_str());
            tracing::info!(
                client = client.unwrap_or("unknown"),
                protocol_version = %params.protocol_version,
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: "compdoc-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = if self.initialized {
            self.tools.clone()
        } else {
            get_tool_definitions(self.expose_get_document)
        };
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        tracing::debug!(tool = %tool_params.name, "Calling tool");
        let tool_result = match handle_tool_call(&self.context, &tool_params.name, tool_params.arguments).await {
            Ok(result) => result,
            Err(Error::InvalidArguments { message }) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params for {}: {}", tool_params.name, message),
                ));
            }
            Err(e) => ToolResult::error(e.to_string()),
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }

    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let resources_value: Vec<Value> = get_resource_definitions()
            .iter()
            .map(|r| {
                json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "resources": resources_value }))
    }

    async fn handle_resources_read(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let read_params: ReadResourceParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Invalid params: {}", e));
            }
        };

        match read_resource(self.context.assembler.resolver().handle(), &read_params.uri).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "contents": [{
                        "uri": content.uri,
                        "mimeType": content.mime_type,
                        "text": content.text
                    }]
                }),
            ),
            Err(e) => JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Resource error: {}", e)),
        }
    }

    /// Check if the server is initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get available resources
    pub fn resources(&self) -> &[ResourceDefinition] {
        &self.resources
    }
}
