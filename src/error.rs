//! Error types for mcp-dispatcher.
//!
//! Protocol errors that travel over the wire live in [`crate::mcp::error`];
//! the types here cover start-up (configuration, registry construction) and
//! the failures a tool reports back to the dispatcher.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while building the tool registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two entries were registered under the same name.
    #[error("duplicate tool name: {name}")]
    DuplicateTool {
        /// The name registered twice.
        name: String,
    },

    /// A tool was registered with an empty name.
    #[error("tool name cannot be empty")]
    EmptyName,
}

/// A failure reported by a tool's invocation function.
///
/// The dispatcher relabels every variant as a JSON-RPC internal error whose
/// message carries this error's text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The arguments object did not have the shape the tool needs.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran but could not produce a result.
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    /// Creates an [`ToolError::InvalidArguments`] error.
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Creates a [`ToolError::Failed`] error.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}
