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

//! Multi-client HTTP/WebSocket adapter.
//!
//! `POST /mcp` serves one JSON-RPC request per HTTP request; axum runs these
//! on as many tasks as there are in-flight requests. `GET /mcp/ws` upgrades
//! to a WebSocket where every incoming message is dispatched on its own
//! spawned task, so calls from one client may interleave — this is the
//! adapter whose concurrency the registry and dispatcher must survive.

use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
use crate::mcp::router::McpRouter;
use crate::mcp::{stdio, TransportError};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::{get, post},
    Json, Router,
};
use forgejo_mcp_core::ExecutionContext;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info};

#[derive(Clone)]
pub struct McpServerState {
    pub router: McpRouter,
    pub connected_clients: Arc<RwLock<Vec<String>>>,
}

impl McpServerState {
    pub fn new(router: McpRouter) -> Self {
        Self {
            router,
            connected_clients: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

/// Axum router for the multi-client transport.
pub fn http_router(state: McpServerState) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_request))
        .route("/mcp/health", get(handle_mcp_health))
        .route("/mcp/ws", get(handle_mcp_websocket))
        .with_state(state)
}

/// Bind and serve until the listener fails.
pub async fn run_http(router: McpRouter, listen_addr: &str) -> Result<(), TransportError> {
    let state = McpServerState::new(router);
    let app = http_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(addr = %listen_addr, "HTTP transport ready");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handle_mcp_health(State(state): State<McpServerState>) -> Json<serde_json::Value> {
    let clients = state.connected_clients.read().await;
    Json(serde_json::json!({
        "status": "ok",
        "protocol_version": MCP_PROTOCOL_VERSION,
        "server_name": "forgejo-mcp",
        "server_version": env!("CARGO_PKG_VERSION"),
        "connected_clients": clients.len(),
        "tools": state.router.registry().len(),
    }))
}

async fn handle_mcp_request(
    State(state): State<McpServerState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    let ctx = ExecutionContext::default();
    Json(state.router.handle(request, &ctx).await)
}

async fn handle_mcp_websocket(
    State(state): State<McpServerState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

async fn handle_ws_connection(state: McpServerState, socket: WebSocket) {
    let client_id = uuid::Uuid::new_v4().to_string();
    info!(client_id = %client_id, "MCP WebSocket client connected");

    {
        let mut clients = state.connected_clients.write().await;
        clients.push(client_id.clone());
    }

    let (mut sink, mut stream) = socket.split();

    // All responses funnel through one writer task; dispatch tasks complete
    // in any order, so responses on one connection may interleave.
    let (tx, mut rx) = mpsc::channel::<Message>(64);
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let router = state.router.clone();
                let ctx = ExecutionContext::for_session(&client_id);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let response = match stdio::parse_request(&text) {
                        Ok(request) => router.handle(request, &ctx).await,
                        Err(response) => response,
                    };
                    match serde_json::to_string(&response) {
                        Ok(body) => {
                            let _ = tx.send(Message::Text(body)).await;
                        }
                        Err(e) => error!(error = %e, "failed to serialize response"),
                    }
                });
            }
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                info!(client_id = %client_id, "MCP WebSocket client disconnected");
                break;
            }
            Err(e) => {
                error!(client_id = %client_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    drop(tx);
    let _ = writer.await;

    {
        let mut clients = state.connected_clients.write().await;
        clients.retain(|c| c != &client_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;

    #[tokio::test]
    async fn test_health_reports_tool_count() {
        let registry = Arc::new(ToolRegistry::new());
        let state = McpServerState::new(McpRouter::new(registry));
        let Json(body) = handle_mcp_health(State(state)).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["tools"], 0);
        assert_eq!(body["connected_clients"], 0);
    }

    #[tokio::test]
    async fn test_post_dispatches_through_router() {
        let registry = Arc::new(ToolRegistry::new());
        let state = McpServerState::new(McpRouter::new(registry));
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap();
        let Json(response) = handle_mcp_request(State(state), Json(request)).await;
        assert!(response.error.is_none());
    }
}
