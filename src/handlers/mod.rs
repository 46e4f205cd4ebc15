//! JSON-RPC method routing.
//!
//! Maps the MCP method surface onto the registry, dispatcher, and
//! introspection service. Tool-level failures become `isError` tool
//! results inside a successful JSON-RPC response; resource and prompt
//! failures become JSON-RPC errors carrying the wire error shape.

use serde_json::json;

use crate::introspect;
use crate::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, PromptGetParams, ResourceReadParams,
    ToolCallParams, ToolResult, WireError,
};
use crate::registry::CapabilityKind;
use crate::schema;
use crate::server::ServerState;

/// MCP protocol revision this server implements.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, state: &ServerState) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let result = json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "resources": {},
                    "tools": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": "mcp-guide-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), json!({}))),

        "resources/list" => {
            let resources: Vec<serde_json::Value> =
                introspect::list_capabilities(state.dispatcher.registry(), CapabilityKind::Resource)
                    .into_iter()
                    .filter(|info| !info.templated)
                    .map(|info| {
                        json!({
                            "uri": info.identifier,
                            "name": info.identifier,
                            "description": info.description,
                            "mimeType": "text/plain"
                        })
                    })
                    .collect();
            Some(JsonRpcResponse::success(
                req.id.clone(),
                json!({ "resources": resources }),
            ))
        }

        "resources/templates/list" => {
            let templates: Vec<serde_json::Value> =
                introspect::list_capabilities(state.dispatcher.registry(), CapabilityKind::Resource)
                    .into_iter()
                    .filter(|info| info.templated)
                    .map(|info| {
                        json!({
                            "uriTemplate": info.identifier,
                            "name": info.identifier,
                            "description": info.description,
                            "mimeType": "text/plain"
                        })
                    })
                    .collect();
            Some(JsonRpcResponse::success(
                req.id.clone(),
                json!({ "resourceTemplates": templates }),
            ))
        }

        "resources/read" => {
            let params: ResourceReadParams = match parse_params(req, "resources/read") {
                Ok(p) => p,
                Err(resp) => return Some(resp),
            };

            match state
                .dispatcher
                .dispatch(CapabilityKind::Resource, &params.uri, None)
                .await
            {
                Ok(envelope) => {
                    let result = json!({
                        "contents": [{
                            "uri": params.uri,
                            "mimeType": mime_type(&envelope.content_type),
                            "text": envelope.payload.to_text()
                        }]
                    });
                    Some(JsonRpcResponse::success(req.id.clone(), result))
                }
                Err(err) => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    WireError::from(&err).into(),
                )),
            }
        }

        "tools/list" => {
            let tools: Vec<serde_json::Value> =
                introspect::list_capabilities(state.dispatcher.registry(), CapabilityKind::Tool)
                    .into_iter()
                    .map(|info| {
                        json!({
                            "name": info.identifier,
                            "description": info.description,
                            "inputSchema": schema::input_schema(&info.params)
                        })
                    })
                    .collect();
            Some(JsonRpcResponse::success(
                req.id.clone(),
                json!({ "tools": tools }),
            ))
        }

        "tools/call" => {
            let params: ToolCallParams = match parse_params(req, "tools/call") {
                Ok(p) => p,
                Err(resp) => return Some(resp),
            };

            let tool_result = call_tool(&params, state).await;
            let result_json = serde_json::to_value(&tool_result)
                .expect("ToolResult must serialize to JSON Value");
            Some(JsonRpcResponse::success(req.id.clone(), result_json))
        }

        "prompts/list" => {
            let prompts: Vec<serde_json::Value> =
                introspect::list_capabilities(state.dispatcher.registry(), CapabilityKind::Prompt)
                    .into_iter()
                    .map(|info| {
                        let arguments: Vec<serde_json::Value> = info
                            .params
                            .iter()
                            .map(|p| json!({ "name": p.name, "required": p.required }))
                            .collect();
                        json!({
                            "name": info.identifier,
                            "description": info.description,
                            "arguments": arguments
                        })
                    })
                    .collect();
            Some(JsonRpcResponse::success(
                req.id.clone(),
                json!({ "prompts": prompts }),
            ))
        }

        "prompts/get" => {
            let params: PromptGetParams = match parse_params(req, "prompts/get") {
                Ok(p) => p,
                Err(resp) => return Some(resp),
            };

            let arguments = match extract_arguments(params.arguments.as_ref()) {
                Ok(map) => map,
                Err(reason) => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params(reason),
                    ));
                }
            };

            match state
                .dispatcher
                .dispatch(CapabilityKind::Prompt, &params.name, arguments.as_ref())
                .await
            {
                Ok(envelope) => {
                    let description = state
                        .dispatcher
                        .registry()
                        .find_exact(CapabilityKind::Prompt, &params.name)
                        .map(|r| r.description.clone())
                        .unwrap_or_default();
                    let result = json!({
                        "description": description,
                        "messages": [{
                            "role": "user",
                            "content": { "type": "text", "text": envelope.payload.to_text() }
                        }]
                    });
                    Some(JsonRpcResponse::success(req.id.clone(), result))
                }
                Err(err) => Some(JsonRpcResponse::error(
                    req.id.clone(),
                    WireError::from(&err).into(),
                )),
            }
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

async fn call_tool(params: &ToolCallParams, state: &ServerState) -> ToolResult {
    let arguments = match extract_arguments(params.arguments.as_ref()) {
        Ok(map) => map,
        Err(reason) => {
            return WireError::new(
                crate::protocol::ErrorKind::ArgumentBindingError,
                reason,
            )
            .into();
        }
    };

    match state
        .dispatcher
        .dispatch(CapabilityKind::Tool, &params.name, arguments.as_ref())
        .await
    {
        Ok(envelope) => ToolResult::text(envelope.payload.to_text()),
        Err(err) => WireError::from(&err).into(),
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    req: &JsonRpcRequest,
    method: &str,
) -> Result<T, JsonRpcResponse> {
    match &req.params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_params(format!("Invalid {method} params: {e}")),
            )
        }),
        None => Err(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::invalid_params(format!("Missing params for {method}")),
        )),
    }
}

/// Map an envelope content type onto the MIME type clients expect.
fn mime_type(content_type: &str) -> &'static str {
    match content_type {
        "json" => "application/json",
        _ => "text/plain",
    }
}

/// Pull the `arguments` object out of a call, if any. A non-object value
/// cannot be bound to named parameters and is rejected up front.
fn extract_arguments(
    arguments: Option<&serde_json::Value>,
) -> Result<Option<serde_json::Map<String, serde_json::Value>>, String> {
    match arguments {
        None => Ok(None),
        Some(serde_json::Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(format!(
            "arguments must be an object, got {}",
            match other {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "boolean",
                serde_json::Value::Number(_) => "number",
                serde_json::Value::String(_) => "string",
                serde_json::Value::Array(_) => "array",
                serde_json::Value::Object(_) => "object",
            }
        )),
    }
}
