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

//! Domain tools, grouped per Forgejo area. Each domain contributes its
//! specs and handlers through a `register` function; [`register_all`] wires
//! the full set into a registry.

pub mod issue;
pub mod params;
pub mod pull;
pub mod repo;
pub mod review;
pub mod search;
pub mod user;
pub mod version;

use crate::forge::{ForgeApi, ForgeError, ForgeResult};
use crate::registry::ToolRegistry;
use forgejo_mcp_core::{Arguments, ToolError};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Register every domain tool against the given forge.
pub fn register_all(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    user::register(registry, forge.clone());
    repo::register(registry, forge.clone());
    issue::register(registry, forge.clone());
    pull::register(registry, forge.clone());
    review::register(registry, forge.clone());
    search::register(registry, forge.clone());
    version::register(registry, forge);
    debug!(tools = registry.len(), "tool registration complete");
}

/// Unwrap a forge call for a handler: the error is inspected first, and the
/// response metadata only afterwards. Absent metadata means no status is
/// available, which is fine for a successful body.
pub(crate) fn render(result: ForgeResult) -> Result<Value, ToolError> {
    match result {
        Ok((body, meta)) => {
            if let Some(meta) = meta {
                debug!(status = meta.status, "forge call succeeded");
            }
            Ok(body)
        }
        Err(ForgeError::Api { status, message }) => Err(ToolError::handler(format!(
            "forge API returned {status}: {message}"
        ))),
        Err(e) => Err(ToolError::handler(e.to_string())),
    }
}

/// The dispatcher has already enforced presence and kind for required
/// parameters, so a miss here is a wiring bug between spec and handler.
pub(crate) fn require_str<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, ToolError> {
    args.str(name)
        .ok_or_else(|| ToolError::missing(name))
}

pub(crate) fn require_i64(args: &Arguments, name: &str) -> Result<i64, ToolError> {
    args.i64(name).ok_or_else(|| ToolError::missing(name))
}
