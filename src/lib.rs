//! mcp-dispatcher: a Model Context Protocol tool server
//!
//! This library turns newline-delimited JSON-RPC 2.0 requests into responses,
//! following the MCP handshake and exposing a fixed set of tools.
//!
//! # Architecture
//!
//! A session moves from uninitialised to initialised exactly once:
//!
//! - **`initialize`**: opens the session and reports server identity
//! - **`tools/list`**: enumerates registered tools (initialised sessions only)
//! - **`tools/call`**: runs a tool and wraps its result as text content
//!
//! Every failure is reported as a JSON-RPC error response; the dispatcher
//! itself never fails.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Start-up and tool error types
//! - [`mcp`]: Protocol codec, registry, session and dispatcher
//! - [`tools`]: Built-in tool modules

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
