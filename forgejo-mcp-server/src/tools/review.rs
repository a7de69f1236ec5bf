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

//! Pull request review tools: reviews themselves plus reviewer requests.

use super::{params, render, require_i64, require_str};
use crate::forge::ForgeApi;
use crate::registry::ToolRegistry;
use async_trait::async_trait;
use forgejo_mcp_core::{
    Arguments, ExecutionContext, ParamKind, ToolError, ToolHandler, ToolSpec,
};
use serde_json::Value;
use std::sync::Arc;

pub const CREATE_PULL_REVIEW: &str = "create_pull_review";
pub const SUBMIT_PULL_REVIEW: &str = "submit_pull_review";
pub const DISMISS_PULL_REVIEW: &str = "dismiss_pull_review";
pub const DELETE_PULL_REVIEW: &str = "delete_pull_review";
pub const CREATE_REVIEW_REQUESTS: &str = "create_review_requests";
pub const DELETE_REVIEW_REQUESTS: &str = "delete_review_requests";

fn pull_scoped(spec: ToolSpec) -> ToolSpec {
    spec.required("owner", ParamKind::String, params::OWNER)
        .required("repo", ParamKind::String, params::REPO)
        .required("index", ParamKind::Number, params::INDEX)
}

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        pull_scoped(ToolSpec::new(CREATE_PULL_REVIEW, "Create a pull request review"))
            .required("state", ParamKind::String, params::REVIEW_STATE)
            .optional("body", ParamKind::String, params::BODY)
            .optional(
                "comments",
                ParamKind::String,
                "Inline comments as a JSON array",
            ),
        Arc::new(CreatePullReview {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        pull_scoped(ToolSpec::new(SUBMIT_PULL_REVIEW, "Submit a pending review"))
            .required("id", ParamKind::Number, params::REVIEW_ID)
            .required("state", ParamKind::String, params::REVIEW_STATE)
            .optional("body", ParamKind::String, params::BODY),
        Arc::new(SubmitPullReview {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        pull_scoped(ToolSpec::new(DISMISS_PULL_REVIEW, "Dismiss a review"))
            .required("id", ParamKind::Number, params::REVIEW_ID)
            .required("message", ParamKind::String, "Dismissal message"),
        Arc::new(DismissPullReview {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        pull_scoped(ToolSpec::new(DELETE_PULL_REVIEW, "Delete a review"))
            .required("id", ParamKind::Number, params::REVIEW_ID),
        Arc::new(DeletePullReview {
            forge: forge.clone(),
        }),
        "pull",
    );
    registry.register(
        pull_scoped(ToolSpec::new(CREATE_REVIEW_REQUESTS, "Request reviewers"))
            .optional("reviewers", ParamKind::String, params::REVIEWERS)
            .optional("team_reviewers", ParamKind::String, params::TEAM_REVIEWERS),
        Arc::new(ReviewRequests {
            forge: forge.clone(),
            remove: false,
        }),
        "pull",
    );
    registry.register(
        pull_scoped(ToolSpec::new(DELETE_REVIEW_REQUESTS, "Cancel review requests"))
            .optional("reviewers", ParamKind::String, params::REVIEWERS)
            .optional("team_reviewers", ParamKind::String, params::TEAM_REVIEWERS),
        Arc::new(ReviewRequests {
            forge,
            remove: true,
        }),
        "pull",
    );
}

fn split_names(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_comments(raw: Option<&str>) -> Result<Value, ToolError> {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            let comments: Value = serde_json::from_str(text).map_err(|e| {
                ToolError::invalid_arguments(format!("comments is not valid JSON: {e}"))
            })?;
            if !comments.is_array() {
                return Err(ToolError::invalid_arguments(
                    "comments must be a JSON array",
                ));
            }
            Ok(comments)
        }
        _ => Ok(Value::Array(Vec::new())),
    }
}

struct CreatePullReview {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreatePullReview {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        let state = require_str(&args, "state")?;
        let body = args.str("body").unwrap_or("");
        let comments = parse_comments(args.str("comments"))?;
        render(
            self.forge
                .create_pull_review(owner, repo, index, state, body, comments)
                .await,
        )
    }
}

struct SubmitPullReview {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for SubmitPullReview {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        let review_id = require_i64(&args, "id")?;
        let state = require_str(&args, "state")?;
        let body = args.str("body").unwrap_or("");
        render(
            self.forge
                .submit_pull_review(owner, repo, index, review_id, state, body)
                .await,
        )
    }
}

struct DismissPullReview {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for DismissPullReview {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        let review_id = require_i64(&args, "id")?;
        let message = require_str(&args, "message")?;
        render(
            self.forge
                .dismiss_pull_review(owner, repo, index, review_id, message)
                .await,
        )
    }
}

struct DeletePullReview {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for DeletePullReview {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        let review_id = require_i64(&args, "id")?;
        render(
            self.forge
                .delete_pull_review(owner, repo, index, review_id)
                .await,
        )
    }
}

/// Shared handler for requesting and cancelling reviewers; the two tools
/// differ only in the direction of the call.
struct ReviewRequests {
    forge: Arc<dyn ForgeApi>,
    remove: bool,
}

#[async_trait]
impl ToolHandler for ReviewRequests {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let index = require_i64(&args, "index")?;
        let reviewers = split_names(args.str("reviewers"));
        let team_reviewers = split_names(args.str("team_reviewers"));
        let result = if self.remove {
            self.forge
                .delete_review_requests(owner, repo, index, &reviewers, &team_reviewers)
                .await
        } else {
            self.forge
                .create_review_requests(owner, repo, index, &reviewers, &team_reviewers)
                .await
        };
        render(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use crate::forge::FakeForge;
    use serde_json::json;
    use std::collections::HashMap;

    fn pull_args(index: i64) -> HashMap<String, Value> {
        let mut raw = HashMap::new();
        raw.insert("owner".to_string(), json!("test-user"));
        raw.insert("repo".to_string(), json!("demo"));
        raw.insert("index".to_string(), json!(index));
        raw
    }

    #[test]
    fn test_split_names_trims_and_drops_empties() {
        assert_eq!(split_names(Some("alice, bob ,,")), vec!["alice", "bob"]);
        assert!(split_names(None).is_empty());
    }

    #[tokio::test]
    async fn test_create_review_passes_state() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(CREATE_PULL_REVIEW).unwrap();

        let mut raw = pull_args(5);
        raw.insert("state".to_string(), json!("APPROVED"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["state"], "APPROVED");
        assert_eq!(body["pull_request"], 5);
    }

    #[tokio::test]
    async fn test_create_review_rejects_malformed_comments() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(CREATE_PULL_REVIEW).unwrap();

        let mut raw = pull_args(5);
        raw.insert("state".to_string(), json!("COMMENT"));
        raw.insert("comments".to_string(), json!("{not json"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(result.is_error);
        assert!(result
            .text_parts()
            .next()
            .unwrap()
            .contains("comments is not valid JSON"));
    }

    #[tokio::test]
    async fn test_dismiss_requires_message() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(DISMISS_PULL_REVIEW).unwrap();

        let mut raw = pull_args(5);
        raw.insert("id".to_string(), json!(100));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(result.is_error);
        assert_eq!(
            result.text_parts().next().unwrap(),
            "missing required parameter: message"
        );
    }

    #[tokio::test]
    async fn test_review_requests_split_reviewer_lists() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(CREATE_REVIEW_REQUESTS).unwrap();

        let mut raw = pull_args(5);
        raw.insert("reviewers".to_string(), json!("alice, bob"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["reviewers"], json!(["alice", "bob"]));
    }

    #[tokio::test]
    async fn test_delete_review_requests_reaches_forge() {
        let registry = ToolRegistry::new();
        let forge = Arc::new(FakeForge::new());
        register(&registry, forge.clone());
        let entry = registry.lookup(DELETE_REVIEW_REQUESTS).unwrap();

        let mut raw = pull_args(5);
        raw.insert("reviewers".to_string(), json!("alice"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        assert_eq!(forge.call_count(), 1);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["removed_reviewers"], json!(["alice"]));
    }
}
