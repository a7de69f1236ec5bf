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

use crate::args::Arguments;
use crate::error::ToolError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Per-invocation context.
///
/// Invocations are tokio futures; cancellation is dropping the future, so the
/// context carries identification only, not a cancel signal.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Transport session that issued the call, when there is one. The direct
    /// CLI path leaves this unset.
    pub session_id: Option<String>,
    /// Free-form metadata attached by the adapter.
    pub metadata: HashMap<String, String>,
}

impl ExecutionContext {
    pub fn for_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            metadata: HashMap::new(),
        }
    }
}

/// The function implementing one tool's behavior.
///
/// Receives validated, coerced arguments and must not retain them beyond the
/// call. May block on remote I/O. Shared state across invocations is limited
/// to the external API client the handler holds read-only.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(
        &self,
        args: Arguments,
        ctx: &ExecutionContext,
    ) -> Result<serde_json::Value, ToolError>;
}
