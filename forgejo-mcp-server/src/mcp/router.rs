// Copyright 2025 The forgejo-mcp contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! MCP method router.
//!
//! Shared by both transport adapters: one place that maps JSON-RPC methods to
//! registry/dispatcher operations. The router only reads the registry; all
//! per-invocation state lives on the stack of `handle`.

use crate::dispatcher;
use crate::mcp::protocol::*;
use crate::registry::ToolRegistry;
use forgejo_mcp_core::ExecutionContext;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct McpRouter {
    registry: Arc<ToolRegistry>,
}

impl McpRouter {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Handle one JSON-RPC request. Always produces a response; transport
    /// adapters decide whether to suppress replies to notifications.
    pub async fn handle(&self, request: JsonRpcRequest, ctx: &ExecutionContext) -> JsonRpcResponse {
        debug!(method = %request.method, "MCP request");

        match request.method.as_str() {
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "initialize" => self.handle_initialize(request.id),
            "initialized" | "notifications/initialized" => {
                JsonRpcResponse::success(request.id, json!({}))
            }
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params, ctx).await,
            _ => {
                warn!(method = %request.method, "unknown MCP method");
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    fn handle_initialize(&self, id: JsonRpcId) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                logging: Some(LoggingCapability {}),
            },
            server_info: ServerInfo {
                name: "forgejo-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_tools_list(&self, id: JsonRpcId) -> JsonRpcResponse {
        let mut entries = self.registry.list();
        entries.sort_by(|a, b| a.spec.name.cmp(&b.spec.name));

        let tools = entries
            .iter()
            .map(|entry| Tool {
                name: entry.spec.name.clone(),
                description: Some(entry.spec.description.clone()),
                input_schema: entry.spec.input_schema(),
            })
            .collect();

        let result = ListToolsResult { tools };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    async fn handle_tools_call(
        &self,
        id: JsonRpcId,
        params: Option<serde_json::Value>,
        ctx: &ExecutionContext,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)),
                    )
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing tools/call params"),
                )
            }
        };

        let Some(entry) = self.registry.lookup(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!(
                    "unknown tool: {}. Call tools/list for the available tools",
                    params.name
                )),
            );
        };

        let result = dispatcher::invoke(&entry, &params.arguments, ctx).await;
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forgejo_mcp_core::{Arguments, ParamKind, ToolError, ToolHandler, ToolSpec};
    use serde_json::Value;

    struct EchoMsg;

    #[async_trait]
    impl ToolHandler for EchoMsg {
        async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
            Ok(Value::String(args.str("msg").unwrap_or_default().to_string()))
        }
    }

    fn router() -> McpRouter {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(
            ToolSpec::new("echo_tool", "Echo a message").required(
                "msg",
                ParamKind::String,
                "Message to echo",
            ),
            Arc::new(EchoMsg),
            "test",
        );
        McpRouter::new(registry)
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params: Some(params),
            id: JsonRpcId::Number(1),
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = router()
            .handle(request("initialize", serde_json::json!({})), &ExecutionContext::default())
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "forgejo-mcp");
    }

    #[tokio::test]
    async fn test_tools_list_includes_schema() {
        let response = router()
            .handle(request("tools/list", serde_json::json!({})), &ExecutionContext::default())
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["tools"][0]["name"], "echo_tool");
        assert_eq!(result["tools"][0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let response = router()
            .handle(
                request(
                    "tools/call",
                    serde_json::json!({"name": "echo_tool", "arguments": {"msg": "hi"}}),
                ),
                &ExecutionContext::default(),
            )
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = router()
            .handle(
                request("tools/call", serde_json::json!({"name": "missing_tool"})),
                &ExecutionContext::default(),
            )
            .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("unknown tool: missing_tool"));
        assert!(error.message.contains("tools/list"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = router()
            .handle(request("bogus/method", serde_json::json!({})), &ExecutionContext::default())
            .await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_validation_failure_is_result_not_rpc_error() {
        let response = router()
            .handle(
                request(
                    "tools/call",
                    serde_json::json!({"name": "echo_tool", "arguments": {}}),
                ),
                &ExecutionContext::default(),
            )
            .await;
        assert!(response.error.is_none(), "validation failures are results");
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("msg"));
    }
}
