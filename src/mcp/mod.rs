//! Model Context Protocol (MCP) request dispatch.
//!
//! This module turns JSON-RPC 2.0 request text into response values for a
//! small MCP tool server. The server communicates over stdio transport using
//! newline-delimited messages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         MCP Server                          │
//! │                                                             │
//! │   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    │
//! │   │  Transport  │───▶│   Server    │───▶│  Registry   │    │
//! │   │   (stdio)   │    │  (session)  │    │   (tools)   │    │
//! │   └─────────────┘    └─────────────┘    └─────────────┘    │
//! │          │                  │                  │            │
//! │          ▼                  ▼                  ▼            │
//! │   ┌─────────────────────────────────────────────────┐      │
//! │   │        JSON-RPC Messages / Protocol Errors      │      │
//! │   └─────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod transport;

pub use error::{ErrorCode, ProtocolError};
pub use protocol::{parse_request, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use registry::{FnTool, Tool, ToolModule, ToolRegistry};
pub use server::{McpServer, ServerInfo, MCP_PROTOCOL_VERSION};
pub use session::SessionState;
pub use transport::{LineTransport, StdioTransport};
