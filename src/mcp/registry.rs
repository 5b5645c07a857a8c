//! Tool registry.
//!
//! Tools are registered once, at server construction, from an ordered list of
//! `(name, module)` pairs. The name is always the registration key; a module
//! never names itself. After [`ToolRegistry::build`] returns, the registry is
//! read-only.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RegistryError, ToolError};

/// The contract a tool module fulfils.
///
/// The input schema is advisory: it is forwarded to clients verbatim and the
/// dispatcher never validates arguments against it.
#[async_trait]
pub trait ToolModule: Send + Sync {
    /// Human-readable description shown to clients.
    fn description(&self) -> &str;

    /// JSON Schema describing the arguments object.
    fn input_schema(&self) -> Value;

    /// Runs the tool with the given arguments object.
    async fn call(&self, arguments: Value) -> Result<Value, ToolError>;
}

/// A tool module backed by an async closure.
pub struct FnTool<F> {
    description: String,
    input_schema: Value,
    handler: F,
}

impl<F> FnTool<F> {
    /// Wraps `handler` as a tool module.
    pub fn new(description: impl Into<String>, input_schema: Value, handler: F) -> Self {
        Self {
            description: description.into(),
            input_schema,
            handler,
        }
    }
}

#[async_trait]
impl<F, Fut> ToolModule for FnTool<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        (self.handler)(arguments).await
    }
}

/// A registered tool.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    input_schema: Value,
    module: Arc<dyn ToolModule>,
}

impl Tool {
    /// The tool's registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description read from the module at registration.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The input schema read from the module at registration.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Invokes the tool.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the tool reports.
    pub async fn invoke(&self, arguments: Value) -> Result<Value, ToolError> {
        self.module.call(arguments).await
    }

    /// The client-facing definition, without the invocation function.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// A tool definition for the `tools/list` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Immutable collection of tools with O(1) lookup by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Builds a registry from `(name, module)` pairs, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or appears more than once.
    pub fn build<I, S>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, Arc<dyn ToolModule>)>,
        S: Into<String>,
    {
        let mut registry = Self::default();

        for (name, module) in entries {
            let name = name.into();
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if registry.index.contains_key(&name) {
                return Err(RegistryError::DuplicateTool { name });
            }

            tracing::debug!(tool = %name, "Registering tool");
            registry.index.insert(name.clone(), registry.tools.len());
            registry.tools.push(Tool {
                description: module.description().to_string(),
                input_schema: module.input_schema(),
                name,
                module,
            });
        }

        Ok(registry)
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Iterates over tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Definitions of every tool, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(Tool::definition).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constant(description: &str, value: Value) -> Arc<dyn ToolModule> {
        Arc::new(FnTool::new(
            description,
            json!({"type": "object"}),
            move |_args: Value| {
                let value = value.clone();
                async move { Ok::<_, ToolError>(value) }
            },
        ))
    }

    #[test]
    fn name_comes_from_key() {
        let registry = ToolRegistry::build([("alpha", constant("first", json!(1)))]).unwrap();

        let tool = registry.get("alpha").unwrap();
        assert_eq!(tool.name(), "alpha");
        assert_eq!(tool.description(), "first");
        assert_eq!(tool.input_schema(), &json!({"type": "object"}));
    }

    #[test]
    fn preserves_registration_order() {
        let registry = ToolRegistry::build([
            ("zeta", constant("z", json!(null))),
            ("alpha", constant("a", json!(null))),
            ("mid", constant("m", json!(null))),
        ])
        .unwrap();

        let names: Vec<_> = registry.iter().map(Tool::name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn rejects_duplicates() {
        let err = ToolRegistry::build([
            ("echo", constant("one", json!(1))),
            ("echo", constant("two", json!(2))),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateTool {
                name: "echo".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_name() {
        let err = ToolRegistry::build([("", constant("nameless", json!(1)))]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyName);
    }

    #[test]
    fn empty_registry() {
        let registry = ToolRegistry::build(Vec::<(String, Arc<dyn ToolModule>)>::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn definition_has_camel_case_schema_key() {
        let registry = ToolRegistry::build([("alpha", constant("first", json!(1)))]).unwrap();
        let value = serde_json::to_value(registry.definitions()).unwrap();

        assert_eq!(
            value,
            json!([{
                "name": "alpha",
                "description": "first",
                "inputSchema": {"type": "object"}
            }])
        );
    }

    #[tokio::test]
    async fn invoke_forwards_arguments() {
        let module: Arc<dyn ToolModule> = Arc::new(FnTool::new(
            "echo arguments",
            json!({}),
            |args: Value| async move { Ok::<_, ToolError>(args) },
        ));
        let registry = ToolRegistry::build([("mirror", module)]).unwrap();

        let result = registry
            .get("mirror")
            .unwrap()
            .invoke(json!({"x": 1}))
            .await
            .unwrap();
        assert_eq!(result, json!({"x": 1}));
    }
}
