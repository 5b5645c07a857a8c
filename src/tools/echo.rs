//! Echo tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::mcp::registry::ToolModule;

/// The `echo` tool: returns its `message` argument unchanged.
#[derive(Debug, Default)]
pub struct Echo;

#[async_trait]
impl ToolModule for Echo {
    fn description(&self) -> &str {
        "Echo back the provided message"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "The message to echo back"
                }
            },
            "required": ["message"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolError> {
        let message = arguments
            .get("message")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::invalid_arguments("message must be a string"))?;

        Ok(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_message() {
        let result = Echo.call(json!({"message": "hello"})).await.unwrap();
        assert_eq!(result, json!({"message": "hello"}));
    }

    #[tokio::test]
    async fn missing_message_fails() {
        let err = Echo.call(json!({})).await.unwrap_err();
        assert_eq!(err, ToolError::invalid_arguments("message must be a string"));
    }
}
