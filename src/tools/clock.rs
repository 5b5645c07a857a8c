//! Wall-clock tool.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::mcp::registry::ToolModule;

/// The `current_time` tool: reports the current UTC time.
#[derive(Debug, Default)]
pub struct CurrentTime;

#[async_trait]
impl ToolModule for CurrentTime {
    fn description(&self) -> &str {
        "Get the current date and time in UTC (RFC 3339)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn call(&self, _arguments: Value) -> Result<Value, ToolError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(json!({ "utc": now }))
    }
}
