//! JSON-RPC 2.0 message types and codec.
//!
//! This module defines the wire shapes exchanged with MCP clients and the
//! parser that turns raw request text into a validated [`JsonRpcRequest`].
//!
//! # Message Types
//!
//! - **Request**: a message carrying a `method`; with an `id` it expects a response
//! - **Notification**: a request without an `id`
//! - **Response**: a reply carrying exactly one of `result` or `error`
//!
//! Parsing never partially recovers: malformed JSON is a parse error, and any
//! envelope that is not shaped like a request is an invalid request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::mcp::error::ProtocolError;

/// The only JSON-RPC version this codec accepts or emits.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request ID.
///
/// JSON-RPC allows strings, numbers and `null`. A response to a message whose
/// ID could not be determined carries [`RequestId::Null`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(serde_json::Number),
    /// String request ID.
    String(String),
    /// Explicit `null` ID.
    Null,
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
///
/// `id` is `None` when the field was absent (a notification) and
/// `Some(RequestId::Null)` when it was present but `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0".
    pub jsonrpc: String,

    /// Request identifier, absent for notifications.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RequestId>,

    /// The method to invoke.
    pub method: String,

    /// Optional parameters for the method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Keeps `"id": null` distinct from a missing `id`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<RequestId>, D::Error>
where
    D: Deserializer<'de>,
{
    RequestId::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    /// Validates that this is a well-formed JSON-RPC 2.0 request.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error naming the offending field.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(ProtocolError::invalid_request(
                "jsonrpc field must be \"2.0\"",
            ));
        }
        if self.method.is_empty() {
            return Err(ProtocolError::invalid_request(
                "method field cannot be empty",
            ));
        }
        Ok(())
    }

    /// Returns `true` if this request carries no `id`.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The ID to echo in the response (`null` for notifications).
    #[must_use]
    pub fn response_id(&self) -> RequestId {
        self.id.clone().unwrap_or(RequestId::Null)
    }
}

/// The mutually exclusive body of a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    /// The method succeeded.
    Result(Value),
    /// The method failed.
    Error(ProtocolError),
}

/// A JSON-RPC 2.0 response carrying either a result or an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to, `null` when unknown.
    pub id: RequestId,

    /// Result or error.
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // ProtocolError contains String
    pub fn error(id: RequestId, error: ProtocolError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: ResponsePayload::Error(error),
        }
    }

    /// Returns the result value of a success response.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    /// Returns the error of an error response.
    #[must_use]
    pub const fn error_object(&self) -> Option<&ProtocolError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(error) => Some(error),
        }
    }

    /// Returns `true` if this is an error response.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }
}

/// An outgoing JSON-RPC 2.0 notification (server to client).
///
/// No response is expected for these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcNotification {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The notification method.
    pub method: String,

    /// Optional parameters for the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a new outgoing notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.into(),
            params,
        }
    }
}

/// Parses request text into a validated request.
///
/// # Errors
///
/// Returns a parse error if the text is not JSON, and an invalid-request
/// error if the JSON is not shaped like a JSON-RPC 2.0 request.
pub fn parse_request(text: &str) -> Result<JsonRpcRequest, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ProtocolError::parse_error())?;

    let obj = value
        .as_object()
        .ok_or_else(|| ProtocolError::invalid_request("request must be a JSON object"))?;
    check_envelope(obj)?;

    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| ProtocolError::invalid_request(format!("malformed request: {e}")))?;
    request.validate()?;

    Ok(request)
}

/// Structural checks made before handing the object to serde, so that each
/// failure gets a precise message.
fn check_envelope(obj: &Map<String, Value>) -> Result<(), ProtocolError> {
    match obj.get("jsonrpc").and_then(Value::as_str) {
        Some(JSONRPC_VERSION) => {}
        _ => {
            return Err(ProtocolError::invalid_request(
                "jsonrpc field must be \"2.0\"",
            ))
        }
    }

    match obj.get("method") {
        Some(Value::String(method)) if !method.is_empty() => {}
        Some(Value::String(_)) => {
            return Err(ProtocolError::invalid_request(
                "method field cannot be empty",
            ))
        }
        _ => {
            return Err(ProtocolError::invalid_request(
                "method field must be a string",
            ))
        }
    }

    if let Some(id) = obj.get("id") {
        if !(id.is_string() || id.is_number() || id.is_null()) {
            return Err(ProtocolError::invalid_request(
                "id field must be a string, number or null",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn parse_valid_request() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#;
        let req = parse_request(json).unwrap();

        assert_eq!(req.id, Some(RequestId::from(1)));
        assert_eq!(req.method, "initialize");
        assert_eq!(req.params, Some(json!({})));
    }

    #[test]
    fn parse_notification_has_no_id() {
        let json = r#"{"jsonrpc": "2.0", "method": "initialized"}"#;
        let req = parse_request(json).unwrap();

        assert!(req.is_notification());
        assert_eq!(req.response_id(), RequestId::Null);
    }

    #[test]
    fn parse_null_id_is_not_notification() {
        let json = r#"{"jsonrpc": "2.0", "id": null, "method": "ping"}"#;
        let req = parse_request(json).unwrap();

        assert_eq!(req.id, Some(RequestId::Null));
        assert!(!req.is_notification());
    }

    #[test]
    fn parse_string_id() {
        let json = r#"{"jsonrpc": "2.0", "id": "abc-123", "method": "test"}"#;
        let req = parse_request(json).unwrap();
        assert_eq!(req.id, Some(RequestId::from("abc-123")));
    }

    #[test]
    fn parse_invalid_json() {
        let err = parse_request("not valid json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ParseError);
    }

    #[test]
    fn parse_non_object() {
        let err = parse_request("[1, 2, 3]").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn parse_missing_jsonrpc() {
        let err = parse_request(r#"{"id": 1, "method": "test"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn parse_wrong_jsonrpc_version() {
        let err = parse_request(r#"{"jsonrpc": "1.0", "id": 1, "method": "test"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn parse_missing_method() {
        let err = parse_request(r#"{"jsonrpc": "2.0", "id": 1}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn parse_empty_method() {
        let err = parse_request(r#"{"jsonrpc": "2.0", "id": 1, "method": ""}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn parse_object_id_rejected() {
        let err =
            parse_request(r#"{"jsonrpc": "2.0", "id": {"x": 1}, "method": "ping"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn validate_catches_hand_built_requests() {
        let req = JsonRpcRequest {
            jsonrpc: "1.0".to_string(),
            id: None,
            method: "ping".to_string(),
            params: None,
        };
        assert_eq!(req.validate().unwrap_err().code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn serialise_success_response() {
        let response = JsonRpcResponse::success(RequestId::from(1), json!({"ok": true}));
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#);
    }

    #[test]
    fn serialise_error_response_without_data() {
        let response = JsonRpcResponse::error(
            RequestId::from(2),
            ProtocolError::invalid_params("Tool not found: missingTool"),
        );
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32602,"message":"Tool not found: missingTool"}}"#
        );
    }

    #[test]
    fn serialise_error_response_null_id() {
        let response = JsonRpcResponse::error(RequestId::Null, ProtocolError::parse_error());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32700);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn serialise_notification_omits_absent_params() {
        let notification = JsonRpcNotification::new("notifications/tools/list_changed", None);
        let json = serde_json::to_string(&notification).unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","method":"notifications/tools/list_changed"}"#
        );
    }

    #[test]
    fn request_id_display() {
        assert_eq!(format!("{}", RequestId::from(42)), "42");
        assert_eq!(format!("{}", RequestId::from("abc")), "abc");
        assert_eq!(format!("{}", RequestId::Null), "null");
    }
}
