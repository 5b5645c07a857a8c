//! Built-in tool modules.
//!
//! These are the tools the `mcp-dispatcher` binary registers. Each module is
//! keyed by the name it is registered under here; the modules themselves do
//! not carry a name.

pub mod calculator;
pub mod clock;
pub mod echo;

use std::sync::Arc;

use crate::config::ToolsConfig;
use crate::error::RegistryError;
use crate::mcp::registry::{ToolModule, ToolRegistry};

/// Names of every built-in tool, in registration order.
pub const BUILTIN_TOOL_NAMES: &[&str] = &["echo", "calculator", "current_time"];

/// Returns the built-in `(name, module)` pairs.
#[must_use]
pub fn builtin_tools() -> Vec<(&'static str, Arc<dyn ToolModule>)> {
    vec![
        entry("echo", echo::Echo),
        entry("calculator", calculator::Calculator),
        entry("current_time", clock::CurrentTime),
    ]
}

fn entry<T>(name: &'static str, module: T) -> (&'static str, Arc<dyn ToolModule>)
where
    T: ToolModule + 'static,
{
    (name, Arc::new(module))
}

/// Builds the registry the configuration asks for.
///
/// With no `enabled` list every built-in tool is registered.
///
/// # Errors
///
/// Returns an error if registry construction fails.
pub fn build_registry(config: &ToolsConfig) -> Result<ToolRegistry, RegistryError> {
    let entries = builtin_tools()
        .into_iter()
        .filter(|(name, _)| config.is_enabled(name));

    ToolRegistry::build(entries)
}
