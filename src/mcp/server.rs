//! MCP request dispatcher.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: `initialize` records the protocol version and opens
//!    the session
//! 2. **Operation**: `tools/list` and `tools/call` against the registry
//! 3. **Shutdown**: the stdio loop ends on EOF or a termination signal
//!
//! [`McpServer::handle`] is the single entry point: it takes request text and
//! always returns a response value. Every failure below it is a
//! [`ProtocolError`] propagated with `?` and converted to an error response in
//! exactly one place.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::mcp::error::ProtocolError;
use crate::mcp::protocol::{parse_request, JsonRpcRequest, JsonRpcResponse, RequestId};
use crate::mcp::registry::ToolRegistry;
use crate::mcp::session::{Session, SessionState};
use crate::mcp::transport::{LineTransport, StdioTransport};

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// The methods this server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `initialize`: opens the session.
    Initialize,
    /// `initialized` / `notifications/initialized`: handshake acknowledgement.
    Initialized,
    /// `ping`: liveness check.
    Ping,
    /// `tools/list`: enumerate the registry.
    ToolsList,
    /// `tools/call`: invoke a tool.
    ToolsCall,
}

impl Method {
    /// Resolves a wire method name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Self::Initialize),
            "initialized" | "notifications/initialized" => Some(Self::Initialized),
            "ping" => Some(Self::Ping),
            "tools/list" => Some(Self::ToolsList),
            "tools/call" => Some(Self::ToolsCall),
            _ => None,
        }
    }

    /// Whether the session must be initialised before this method runs.
    #[must_use]
    pub const fn requires_initialization(self) -> bool {
        matches!(self, Self::ToolsList | Self::ToolsCall)
    }
}

/// Server identity reported in the `initialize` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl ServerInfo {
    /// Creates a server identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult<'a> {
    protocol_version: &'a str,
    capabilities: ServerCapabilities,
    server_info: &'a ServerInfo,
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
///
/// Every field is optional: the handshake never fails on what the client
/// offers, it only logs it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
}

impl ToolCallResult {
    /// Creates a single-item text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }
}

/// The MCP request dispatcher.
///
/// Holds the server identity, the tool registry and the session flag. All
/// methods take `&self`, so one instance can be shared behind an [`Arc`].
#[derive(Debug)]
pub struct McpServer {
    /// Identity reported to clients.
    info: ServerInfo,
    /// Registered tools (read-only).
    registry: Arc<ToolRegistry>,
    /// Initialisation flag.
    session: Session,
    /// Negotiated protocol version (set on initialisation).
    protocol_version: OnceLock<String>,
}

impl McpServer {
    /// Creates a server with the given identity and tools.
    #[must_use]
    pub fn new(info: ServerInfo, registry: ToolRegistry) -> Self {
        Self {
            info,
            registry: Arc::new(registry),
            session: Session::new(),
            protocol_version: OnceLock::new(),
        }
    }

    /// Returns the server identity.
    #[must_use]
    pub const fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Returns the tool registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Returns the protocol version agreed during `initialize`.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.get().map(String::as_str)
    }

    /// Handles one request text and produces its response.
    ///
    /// This never fails: unparseable or structurally invalid input yields an
    /// error response with a `null` id, and every failure during handling
    /// yields an error response echoing the request id.
    pub async fn handle(&self, text: &str) -> JsonRpcResponse {
        match parse_request(text) {
            Ok(request) => self.dispatch(&request).await,
            Err(error) => {
                tracing::warn!(code = error.code.code(), message = %error.message, "Rejected request");
                JsonRpcResponse::error(RequestId::Null, error)
            }
        }
    }

    /// Handles one message for a transport.
    ///
    /// Like [`McpServer::handle`], except that notifications get no response.
    pub async fn handle_message(&self, text: &str) -> Option<JsonRpcResponse> {
        match parse_request(text) {
            Ok(request) if request.is_notification() => {
                let response = self.dispatch(&request).await;
                if let Some(error) = response.error_object() {
                    tracing::debug!(method = %request.method, error = %error, "Notification failed");
                }
                None
            }
            Ok(request) => Some(self.dispatch(&request).await),
            Err(error) => {
                tracing::warn!(code = error.code.code(), message = %error.message, "Rejected request");
                Some(JsonRpcResponse::error(RequestId::Null, error))
            }
        }
    }

    /// Dispatches an already parsed request.
    ///
    /// The request is validated again here since it may have been built by
    /// hand rather than by [`parse_request`].
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        if let Err(error) = request.validate() {
            tracing::warn!(message = %error.message, "Rejected request");
            return JsonRpcResponse::error(RequestId::Null, error);
        }

        let id = request.response_id();
        tracing::debug!(method = %request.method, id = %id, "Dispatching request");

        match self.route(request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                tracing::warn!(
                    method = %request.method,
                    id = %id,
                    code = error.code.code(),
                    message = %error.message,
                    "Request failed"
                );
                JsonRpcResponse::error(id, error)
            }
        }
    }

    async fn route(&self, request: &JsonRpcRequest) -> Result<Value, ProtocolError> {
        let method = Method::from_name(&request.method)
            .ok_or_else(|| ProtocolError::method_not_found(&request.method))?;

        if method.requires_initialization() {
            self.require_initialized()?;
        }

        let params = request.params.as_ref();
        match method {
            Method::Initialize => self.handle_initialize(params),
            Method::Initialized | Method::Ping => Ok(json!({})),
            Method::ToolsList => self.handle_tools_list(),
            Method::ToolsCall => self.handle_tools_call(params).await,
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&self, params: Option<&Value>) -> Result<Value, ProtocolError> {
        let offered = params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p.clone()).ok())
            .unwrap_or_default();

        let version = self
            .protocol_version
            .get_or_init(|| MCP_PROTOCOL_VERSION.to_string());

        if self.session.mark_initialized() {
            tracing::info!(
                client = offered.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
                client_version = offered.client_info.as_ref().and_then(|c| c.version.as_deref()),
                requested_version = offered.protocol_version.as_deref(),
                negotiated_version = %version,
                "Session initialised"
            );
        } else {
            tracing::debug!("Repeated initialize on an initialised session");
        }

        let result = InitializeResult {
            protocol_version: version,
            capabilities: ServerCapabilities::default(),
            server_info: &self.info,
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self) -> Result<Value, ProtocolError> {
        Ok(json!({
            "tools": self.registry.definitions(),
        }))
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(&self, params: Option<&Value>) -> Result<Value, ProtocolError> {
        let name = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::invalid_params("Tool name must be a string"))?;

        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ProtocolError::invalid_params(format!("Tool not found: {name}")))?;

        let arguments = match params.and_then(|p| p.get("arguments")) {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(arguments) => arguments.clone(),
        };

        let value = tool.invoke(arguments).await.map_err(|e| {
            tracing::error!(tool = %name, error = %e, "Tool execution failed");
            ProtocolError::internal_error(format!("Tool execution failed: {e}"))
        })?;

        let text = serde_json::to_string_pretty(&value)?;
        Ok(serde_json::to_value(ToolCallResult::text(text))?)
    }

    /// Ensures the session has been initialised.
    fn require_initialized(&self) -> Result<(), ProtocolError> {
        if self.session.is_initialized() {
            Ok(())
        } else {
            Err(ProtocolError::invalid_request("Server not initialized"))
        }
    }

    /// Serves newline-delimited messages until the input closes.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve<R, W>(&self, transport: &mut LineTransport<R, W>) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(line) = transport.read_line().await? {
            self.serve_line(transport, &line).await?;
        }
        Ok(())
    }

    async fn serve_line<R, W>(
        &self,
        transport: &mut LineTransport<R, W>,
        line: &str,
    ) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if line.trim().is_empty() {
            return Ok(());
        }

        match self.handle_message(line).await {
            Some(response) => transport.write_response(&response).await,
            None => Ok(()),
        }
    }

    /// Runs the server over stdio with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&self) -> std::io::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run_with_shutdown(&mut transport).await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    let Some(line) = line_result? else {
                        tracing::info!("Input closed, shutting down");
                        return Ok(());
                    };
                    self.serve_line(transport, &line).await?;
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&self, transport: &mut StdioTransport) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    return Ok(());
                }

                line_result = transport.read_line() => {
                    let Some(line) = line_result? else {
                        tracing::info!("Input closed, shutting down");
                        return Ok(());
                    };
                    self.serve_line(transport, &line).await?;
                }
            }
        }
    }
}
