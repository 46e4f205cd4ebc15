use serde::{Deserialize, Serialize};

use super::request::RpcId;
use crate::dispatch::DispatchError;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn invalid_request_with(detail: impl Into<String>) -> Self {
        Self { code: -32600, message: detail.into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// MCP tool result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// MCP tool call result wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".into(),
                text: text.into(),
            }],
            is_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Domain-level error wire shape
// ---------------------------------------------------------------------------

/// Error kind carried on the wire, named exactly as clients match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFoundError,
    ArgumentBindingError,
    HandlerExecutionError,
    DuplicateIdentifierError,
    MalformedPatternError,
}

impl ErrorKind {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Unresolvable identifiers and binding failures → -32602 (Invalid params)
    /// Handler-side failures                        → -32603 (Internal error)
    /// Declaration-time kinds never reach the wire at runtime; they keep
    /// the invalid-params code for embedders that report them.
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::NotFoundError | Self::ArgumentBindingError => -32602,
            Self::HandlerExecutionError => -32603,
            Self::DuplicateIdentifierError | Self::MalformedPatternError => -32602,
        }
    }
}

/// Wire error shape: `{ error_kind, message }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    pub error_kind: ErrorKind,
    pub message: String,
}

impl WireError {
    pub fn new(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error_kind,
            message: message.into(),
        }
    }
}

impl From<&DispatchError> for WireError {
    fn from(err: &DispatchError) -> Self {
        let kind = match err {
            DispatchError::NotFound { .. } => ErrorKind::NotFoundError,
            DispatchError::ArgumentBinding { .. } => ErrorKind::ArgumentBindingError,
            DispatchError::HandlerExecution { .. } => ErrorKind::HandlerExecutionError,
        };
        Self::new(kind, err.to_string())
    }
}

/// Convert a wire error into a JSON-RPC error.
///
/// The JSON-RPC `code` is derived from the error kind, the `message` is
/// the human-readable text, and the full wire shape is carried in `data`
/// for structured clients.
impl From<WireError> for JsonRpcError {
    fn from(wire: WireError) -> Self {
        Self {
            code: wire.error_kind.json_rpc_code(),
            message: wire.message.clone(),
            data: Some(
                serde_json::to_value(&wire).expect("WireError must serialize to JSON Value"),
            ),
        }
    }
}

/// Convert a wire error into a tool result with `isError: true`.
///
/// The text content is the JSON-serialized wire error, preserving the
/// structured shape for clients that inspect tool output.
impl From<WireError> for ToolResult {
    fn from(wire: WireError) -> Self {
        let json =
            serde_json::to_string(&wire).expect("WireError must serialize to JSON string");
        Self::error(json)
    }
}
