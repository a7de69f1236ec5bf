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
use serde_json::Value;
use std::sync::Arc;

pub const GET_ISSUE_BY_INDEX: &str = "get_issue_by_index";
pub const LIST_REPO_ISSUES: &str = "list_repo_issues";
pub const CREATE_ISSUE: &str = "create_issue";
pub const CREATE_ISSUE_COMMENT: &str = "create_issue_comment";

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        ToolSpec::new(GET_ISSUE_BY_INDEX, "Get issue by index")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("index", ParamKind::Number, params::INDEX),
        Arc::new(GetIssueByIndex {
            forge: forge.clone(),
        }),
        "issue",
    );
    registry.register(
        ToolSpec::new(LIST_REPO_ISSUES, "List repository issues")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .optional_with_default(
                "state",
                ParamKind::String,
                params::STATE,
                ArgValue::Str("open".to_string()),
            ),
        Arc::new(ListRepoIssues {
            forge: forge.clone(),
        }),
        "issue",
    );
    registry.register(
        ToolSpec::new(CREATE_ISSUE, "Create an issue")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("title", ParamKind::String, params::TITLE)
            .optional_with_default(
                "body",
                ParamKind::String,
                params::BODY,
                ArgValue::Str(String::new()),
            ),
        Arc::new(CreateIssue {
            forge: forge.clone(),
        }),
        "issue",
    );
    registry.register(
        ToolSpec::new(CREATE_ISSUE_COMMENT, "Comment on an issue")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("index", ParamKind::Number, params::INDEX)
            .required("body", ParamKind::String, params::BODY),
        Arc::new(CreateIssueComment { forge }),
        "issue",
    );
}

struct GetIssueByIndex {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for GetIssueByIndex {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        render(self.forge.get_issue(owner, repo, index).await)
    }
}

struct ListRepoIssues {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for ListRepoIssues {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let state = args.str("state").unwrap_or("open");
        render(self.forge.list_issues(owner, repo, state).await)
    }
}

struct CreateIssue {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreateIssue {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let title = require_str(&args, "title")?;
        let body = args.str("body").unwrap_or("");
        render(self.forge.create_issue(owner, repo, title, body).await)
    }
}

struct CreateIssueComment {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreateIssueComment {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        let body = require_str(&args, "body")?;
        render(self.forge.create_issue_comment(owner, repo, index, body).await)
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
    async fn test_issue_index_accepts_double() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(GET_ISSUE_BY_INDEX).unwrap();

        let mut raw = HashMap::new();
        raw.insert("owner".to_string(), json!("test-user"));
        raw.insert("repo".to_string(), json!("demo"));
        raw.insert("index".to_string(), json!(42.0));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["number"], 42);
    }

    #[tokio::test]
    async fn test_list_issues_defaults_to_open() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(LIST_REPO_ISSUES).unwrap();

        let mut raw = HashMap::new();
        raw.insert("owner".to_string(), json!("test-user"));
        raw.insert("repo".to_string(), json!("demo"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body[0]["state"], "open");
    }
}
