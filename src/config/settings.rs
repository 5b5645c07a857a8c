//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::mcp::server::ServerInfo;
use crate::tools::BUILTIN_TOOL_NAMES;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Server identity settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Tool selection.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "server.name cannot be empty".to_string(),
            });
        }
        if self.server.version.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "server.version cannot be empty".to_string(),
            });
        }

        if let Some(ref enabled) = self.tools.enabled {
            if let Some(unknown) = enabled
                .iter()
                .find(|name| !BUILTIN_TOOL_NAMES.contains(&name.as_str()))
            {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Unknown tool '{unknown}'. Must be one of: {}",
                        BUILTIN_TOOL_NAMES.join(", ")
                    ),
                });
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            });
        }

        Ok(())
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`.
    /// Default: the crate name
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Version reported in `serverInfo`.
    /// Default: the crate version
    #[serde(default = "default_server_version")]
    pub version: String,
}

impl ServerConfig {
    /// The identity to hand to the server.
    #[must_use]
    pub fn server_info(&self) -> ServerInfo {
        ServerInfo::new(self.name.clone(), self.version.clone())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_server_version(),
        }
    }
}

fn default_server_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Tool selection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Built-in tools to register. All of them when absent.
    #[serde(default)]
    pub enabled: Option<Vec<String>>,
}

impl ToolsConfig {
    /// Whether the named tool should be registered.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled
            .as_ref()
            .map_or(true, |enabled| enabled.iter().any(|e| e == name))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
