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

use super::render;
use crate::forge::ForgeApi;
use crate::registry::ToolRegistry;
use async_trait::async_trait;
use forgejo_mcp_core::{Arguments, ExecutionContext, ToolError, ToolHandler, ToolSpec};
use serde_json::{json, Value};
use std::sync::Arc;

pub const GET_FORGEJO_VERSION: &str = "get_forgejo_version";
pub const GET_SERVER_VERSION: &str = "get_forgejo_mcp_server_version";

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        ToolSpec::new(GET_FORGEJO_VERSION, "Get Forgejo instance version"),
        Arc::new(GetForgejoVersion { forge }),
        "version",
    );
    registry.register(
        ToolSpec::new(GET_SERVER_VERSION, "Get MCP server version"),
        Arc::new(GetServerVersion),
        "version",
    );
}

struct GetForgejoVersion {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for GetForgejoVersion {
    async fn call(&self, _args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        render(self.forge.get_version().await)
    }
}

/// Answers locally; the only tool that never touches the forge.
struct GetServerVersion;

#[async_trait]
impl ToolHandler for GetServerVersion {
    async fn call(&self, _args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        Ok(json!({ "version": env!("CARGO_PKG_VERSION") }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_version_is_local() {
        let value = GetServerVersion
            .call(Arguments::new(), &ExecutionContext::default())
            .await
            .unwrap();
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }
}
