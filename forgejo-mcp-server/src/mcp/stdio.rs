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

//! Single-session stdio adapter.
//!
//! Newline-delimited JSON-RPC over stdin/stdout, strictly sequential: one
//! request is read, dispatched, and answered before the next is read. Parse
//! failures are answered in-band; only a broken stdio stream ends the session.

use crate::mcp::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::router::McpRouter;
use crate::mcp::TransportError;
use forgejo_mcp_core::ExecutionContext;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::info;

pub async fn run_stdio(router: McpRouter) -> Result<(), TransportError> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = BufWriter::new(tokio::io::stdout());
    let ctx = ExecutionContext::for_session("stdio");

    info!("stdio transport ready");

    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            break;
        }
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let response = match parse_request(raw) {
            Ok(request) => router.handle(request, &ctx).await,
            Err(response) => response,
        };

        write_response(&mut writer, &response).await?;
    }

    info!("stdio transport closed");
    Ok(())
}

/// Decode one line into a request, or produce the in-band error response.
pub(crate) fn parse_request(raw: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let data: Value = serde_json::from_str(raw).map_err(|e| {
        JsonRpcResponse::error(
            Default::default(),
            JsonRpcError::parse_error(format!("Parse error: {}", e)),
        )
    })?;

    let id = data
        .as_object()
        .and_then(|obj| obj.get("id"))
        .cloned()
        .and_then(|id| serde_json::from_value(id).ok())
        .unwrap_or_default();

    let has_method = data
        .as_object()
        .is_some_and(|obj| obj.contains_key("method"));
    if !has_method {
        return Err(JsonRpcResponse::error(
            id,
            JsonRpcError::invalid_request("Invalid Request"),
        ));
    }

    serde_json::from_value(data).map_err(|e| {
        JsonRpcResponse::error(
            id,
            JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
        )
    })
}

async fn write_response(
    writer: &mut BufWriter<tokio::io::Stdout>,
    response: &JsonRpcResponse,
) -> Result<(), TransportError> {
    let body = serde_json::to_string(response)?;
    writer.write_all(body.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::JsonRpcId;

    #[test]
    fn test_parse_error_keeps_null_id() {
        let response = parse_request("{not json").unwrap_err();
        assert_eq!(response.error.unwrap().code, -32700);
        assert_eq!(response.id, JsonRpcId::Null);
    }

    #[test]
    fn test_missing_method_echoes_id() {
        let response = parse_request(r#"{"jsonrpc":"2.0","id":7}"#).unwrap_err();
        assert_eq!(response.error.unwrap().code, -32600);
        assert_eq!(response.id, JsonRpcId::Number(7));
    }

    #[test]
    fn test_malformed_method_echoes_id() {
        let response = parse_request(r#"{"jsonrpc":"2.0","id":3,"method":123}"#).unwrap_err();
        assert_eq!(response.error.unwrap().code, -32600);
        assert_eq!(response.id, JsonRpcId::Number(3));
    }

    #[test]
    fn test_well_formed_request() {
        let request = parse_request(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap();
        assert_eq!(request.method, "ping");
        assert_eq!(request.id, JsonRpcId::Number(1));
    }
}
