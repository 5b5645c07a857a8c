//! Integration tests for MCP protocol handling.
//!
//! These tests verify the JSON-RPC 2.0 codec: request parsing, envelope
//! validation and the exact wire shape of responses.

use mcp_dispatcher::mcp::error::{ErrorCode, ProtocolError};
use mcp_dispatcher::mcp::protocol::{parse_request, JsonRpcNotification, JsonRpcResponse, RequestId};
use serde_json::json;

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let req = parse_request(json).unwrap();
    assert_eq!(req.method, "initialize");
    assert_eq!(req.id, Some(RequestId::from(1)));
    assert_eq!(req.params.unwrap()["clientInfo"]["name"], "test-client");
}

#[test]
fn test_parse_string_id() {
    let json = r#"{"jsonrpc": "2.0", "id": "abc-1", "method": "tools/list"}"#;

    let req = parse_request(json).unwrap();
    assert_eq!(req.id, Some(RequestId::from("abc-1")));
    assert_eq!(req.params, None);
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let req = parse_request(json).unwrap();
    assert!(req.is_notification());
    assert_eq!(req.response_id(), RequestId::Null);
}

#[test]
fn test_parse_null_id_is_not_notification() {
    let json = r#"{"jsonrpc": "2.0", "id": null, "method": "ping"}"#;

    let req = parse_request(json).unwrap();
    assert_eq!(req.id, Some(RequestId::Null));
    assert!(!req.is_notification());
}

#[test]
fn test_parse_invalid_json() {
    for text in ["not valid json", "", "{\"jsonrpc\": \"2.0\",", "[1, 2"] {
        let err = parse_request(text).unwrap_err();
        assert_eq!(err.code, ErrorCode::ParseError, "input: {text:?}");
    }
}

#[test]
fn test_parse_invalid_envelopes() {
    let cases = [
        r#"{"jsonrpc": "1.0", "id": 1, "method": "ping"}"#,
        r#"{"id": 1, "method": "ping"}"#,
        r#"{"jsonrpc": "2.0", "id": 1}"#,
        r#"{"jsonrpc": "2.0", "id": 1, "method": ""}"#,
        r#"{"jsonrpc": "2.0", "id": 1, "method": 42}"#,
        r#"{"jsonrpc": "2.0", "id": {"nested": true}, "method": "ping"}"#,
        r#"{"jsonrpc": "2.0", "id": [1], "method": "ping"}"#,
        r"[]",
        r"42",
        r#""ping""#,
    ];

    for text in cases {
        let err = parse_request(text).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest, "input: {text}");
    }
}

// =============================================================================
// Response Serialisation Tests
// =============================================================================

#[test]
fn test_success_response_shape() {
    let response = JsonRpcResponse::success(RequestId::from(7), json!({"tools": []}));
    let text = serde_json::to_string(&response).unwrap();

    assert_eq!(text, r#"{"jsonrpc":"2.0","id":7,"result":{"tools":[]}}"#);
}

#[test]
fn test_error_response_omits_absent_data() {
    let response = JsonRpcResponse::error(RequestId::Null, ProtocolError::parse_error());
    let text = serde_json::to_string(&response).unwrap();

    assert_eq!(
        text,
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
    );
}

#[test]
fn test_error_response_with_data() {
    let error = ProtocolError::invalid_params("bad").with_data(json!({"field": "name"}));
    let response = JsonRpcResponse::error(RequestId::from("x"), error);
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["error"]["code"], -32602);
    assert_eq!(value["error"]["data"]["field"], "name");
    assert!(value.get("result").is_none());
}

#[test]
fn test_notification_shape() {
    let notification = JsonRpcNotification::new("notifications/tools/list_changed", None);
    let text = serde_json::to_string(&notification).unwrap();

    assert_eq!(
        text,
        r#"{"jsonrpc":"2.0","method":"notifications/tools/list_changed"}"#
    );
}
