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

use super::{params, render, require_i64, require_str};
use crate::forge::ForgeApi;
use crate::registry::ToolRegistry;
use async_trait::async_trait;
use forgejo_mcp_core::{
    ArgValue, Arguments, ExecutionContext, ParamKind, ToolError, ToolHandler, ToolSpec,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub const GET_PULL_REQUEST_BY_INDEX: &str = "get_pull_request_by_index";
pub const LIST_REPO_PULL_REQUESTS: &str = "list_repo_pull_requests";
pub const CREATE_PULL_REQUEST: &str = "create_pull_request";
pub const UPDATE_PULL_REQUEST: &str = "update_pull_request";

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        ToolSpec::new(GET_PULL_REQUEST_BY_INDEX, "Get pull request by index")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("index", ParamKind::Number, params::INDEX),
        Arc::new(GetPullRequestByIndex {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        ToolSpec::new(LIST_REPO_PULL_REQUESTS, "List repository pull requests")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .optional_with_default(
                "state",
                ParamKind::String,
                params::STATE,
                ArgValue::Str("open".to_string()),
            ),
        Arc::new(ListRepoPullRequests {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        ToolSpec::new(CREATE_PULL_REQUEST, "Create a pull request")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("title", ParamKind::String, params::TITLE)
            .required("head", ParamKind::String, params::HEAD)
            .required("base", ParamKind::String, params::BASE)
            .optional_with_default(
                "body",
                ParamKind::String,
                params::BODY,
                ArgValue::Str(String::new()),
            ),
        Arc::new(CreatePullRequest {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        ToolSpec::new(UPDATE_PULL_REQUEST, "Edit a pull request")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("index", ParamKind::Number, params::INDEX)
            .optional("title", ParamKind::String, params::TITLE)
            .optional("body", ParamKind::String, params::BODY)
            .optional("base", ParamKind::String, params::BASE)
            .optional("assignee", ParamKind::String, "Assignee username")
            .optional("milestone", ParamKind::Number, "Milestone ID"),
        Arc::new(UpdatePullRequest { forge }),
        "pull",
    );
}

struct GetPullRequestByIndex {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for GetPullRequestByIndex {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        render(self.forge.get_pull_request(owner, repo, index).await)
    }
}

struct ListRepoPullRequests {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for ListRepoPullRequests {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let state = args.str("state").unwrap_or("open");
        render(self.forge.list_pull_requests(owner, repo, state).await)
    }
}

struct CreatePullRequest {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreatePullRequest {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let title = require_str(&args, "title")?;
        let head = require_str(&args, "head")?;
        let base = require_str(&args, "base")?;
        let body = args.str("body").unwrap_or("");
        render(
            self.forge
                .create_pull_request(owner, repo, title, body, head, base)
                .await,
        )
    }
}

struct UpdatePullRequest {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for UpdatePullRequest {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;

        // Absent fields stay absent so the forge keeps their current values.
        let mut patch = Map::new();
        for field in ["title", "body", "base", "assignee"] {
            if let Some(value) = args.str(field) {
                patch.insert(field.to_string(), json!(value));
            }
        }
        if let Some(milestone) = args.i64("milestone") {
            patch.insert("milestone".to_string(), json!(milestone));
        }
        render(
            self.forge
                .update_pull_request(owner, repo, index, Value::Object(patch))
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use crate::forge::FakeForge;
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_create_pull_request_requires_head_and_base() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(CREATE_PULL_REQUEST).unwrap();

        let mut raw = HashMap::new();
        raw.insert("owner".to_string(), json!("test-user"));
        raw.insert("repo".to_string(), json!("demo"));
        raw.insert("title".to_string(), json!("t"));
        raw.insert("head".to_string(), json!("feature"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(result.is_error);
        assert_eq!(
            result.text_parts().next().unwrap(),
            "missing required parameter: base"
        );
    }

    #[tokio::test]
    async fn test_update_sends_only_present_fields() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(UPDATE_PULL_REQUEST).unwrap();

        let mut raw = HashMap::new();
        raw.insert("owner".to_string(), json!("test-user"));
        raw.insert("repo".to_string(), json!("demo"));
        raw.insert("index".to_string(), json!(7));
        raw.insert("title".to_string(), json!("new title"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["number"], 7);
        assert_eq!(body["title"], "new title");
        assert!(body.get("base").is_none());
        assert!(body.get("milestone").is_none());
    }

    #[tokio::test]
    async fn test_update_accepts_milestone_number() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(UPDATE_PULL_REQUEST).unwrap();

        let mut raw = HashMap::new();
        raw.insert("owner".to_string(), json!("test-user"));
        raw.insert("repo".to_string(), json!("demo"));
        raw.insert("index".to_string(), json!(7));
        raw.insert("milestone".to_string(), json!(3));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["milestone"], 3);
    }
}
