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
use serde_json::Value;
use std::sync::Arc;

pub const GET_MY_USER_INFO: &str = "get_my_user_info";

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        ToolSpec::new(GET_MY_USER_INFO, "Get my user info"),
        Arc::new(GetMyUserInfo { forge }),
        "user",
    );
}

struct GetMyUserInfo {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for GetMyUserInfo {
    async fn call(&self, _args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        render(self.forge.get_my_user_info().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::FakeForge;

    #[tokio::test]
    async fn test_returns_user_json() {
        let handler = GetMyUserInfo {
            forge: Arc::new(FakeForge::new()),
        };
        let value = handler
            .call(Arguments::new(), &ExecutionContext::default())
            .await
            .unwrap();
        assert_eq!(value["login"], "test-user");
    }
}
