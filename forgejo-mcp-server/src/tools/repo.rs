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

//! Repository tools: repo listing/creation, branches, commits, file
//! content and mutation, labels.

use super::{params, render, require_str};
use crate::forge::ForgeApi;
use crate::registry::ToolRegistry;
use async_trait::async_trait;
use forgejo_mcp_core::{
    ArgValue, Arguments, ExecutionContext, ParamKind, ToolError, ToolHandler, ToolSpec,
};
use serde_json::Value;
use std::sync::Arc;

pub const LIST_MY_REPOS: &str = "list_my_repos";
pub const CREATE_REPO: &str = "create_repo";
pub const LIST_BRANCHES: &str = "list_branches";
pub const CREATE_BRANCH: &str = "create_branch";
pub const DELETE_BRANCH: &str = "delete_branch";
pub const LIST_REPO_COMMITS: &str = "list_repo_commits";
pub const GET_FILE: &str = "get_file";
pub const CREATE_FILE: &str = "create_file";
pub const UPDATE_FILE: &str = "update_file";
pub const DELETE_FILE: &str = "delete_file";
pub const LIST_REPO_LABELS: &str = "list_repo_labels";
pub const CREATE_LABEL: &str = "create_label";

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        ToolSpec::new(LIST_MY_REPOS, "List my repositories")
            .optional_with_default("page", ParamKind::Number, params::PAGE, ArgValue::Num(1.0))
            .optional_with_default(
                "limit",
                ParamKind::Number,
                params::LIMIT,
                ArgValue::Num(100.0),
            ),
        Arc::new(ListMyRepos {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(CREATE_REPO, "Create a repository")
            .required("name", ParamKind::String, params::REPO)
            .optional_with_default(
                "description",
                ParamKind::String,
                "Repository description",
                ArgValue::Str(String::new()),
            )
            .optional_with_default(
                "private",
                ParamKind::Boolean,
                "Private repository",
                ArgValue::Bool(false),
            ),
        Arc::new(CreateRepo {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(LIST_BRANCHES, "List branches")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO),
        Arc::new(ListBranches {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(CREATE_BRANCH, "Create a branch")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("branch", ParamKind::String, params::BRANCH)
            .optional_with_default(
                "old_ref",
                ParamKind::String,
                params::OLD_REF,
                ArgValue::Str("main".to_string()),
            ),
        Arc::new(CreateBranch {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(DELETE_BRANCH, "Delete a branch")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("branch", ParamKind::String, params::BRANCH),
        Arc::new(DeleteBranch {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(LIST_REPO_COMMITS, "List repository commits")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .optional("path", ParamKind::String, "Limit to commits touching this path")
            .optional("sha", ParamKind::String, "SHA or branch to start from")
            .optional_with_default("page", ParamKind::Number, params::PAGE, ArgValue::Num(1.0))
            .optional_with_default(
                "limit",
                ParamKind::Number,
                params::LIMIT,
                ArgValue::Num(100.0),
            ),
        Arc::new(ListRepoCommits {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(GET_FILE, "Get file content")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("path", ParamKind::String, params::FILE_PATH)
            .optional_with_default(
                "ref",
                ParamKind::String,
                params::REF,
                ArgValue::Str(String::new()),
            ),
        Arc::new(GetFile {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(CREATE_FILE, "Create a file")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("path", ParamKind::String, params::FILE_PATH)
            .required("content", ParamKind::String, params::CONTENT)
            .required("message", ParamKind::String, params::MESSAGE)
            .required("branch", ParamKind::String, params::BRANCH)
            .optional("new_branch", ParamKind::String, "Commit to a new branch"),
        Arc::new(CreateFile {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(UPDATE_FILE, "Update a file")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("path", ParamKind::String, params::FILE_PATH)
            .required("sha", ParamKind::String, params::SHA)
            .required("content", ParamKind::String, params::CONTENT)
            .required("message", ParamKind::String, params::MESSAGE)
            .required("branch", ParamKind::String, params::BRANCH),
        Arc::new(UpdateFile {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(DELETE_FILE, "Delete a file")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("path", ParamKind::String, params::FILE_PATH)
            .required("message", ParamKind::String, params::MESSAGE)
            .required("branch", ParamKind::String, params::BRANCH)
            .optional("sha", ParamKind::String, params::SHA),
        Arc::new(DeleteFile {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(LIST_REPO_LABELS, "List repository labels")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .optional_with_default("page", ParamKind::Number, params::PAGE, ArgValue::Num(1.0))
            .optional_with_default(
                "limit",
                ParamKind::Number,
                params::LIMIT,
                ArgValue::Num(50.0),
            ),
        Arc::new(ListRepoLabels {
            forge: forge.clone(),
        }),
        "repo",
    );
    registry.register(
        ToolSpec::new(CREATE_LABEL, "Create a repository label")
            .required("owner", ParamKind::String, params::OWNER)
            .required("repo", ParamKind::String, params::REPO)
            .required("name", ParamKind::String, "Label name")
            .required("color", ParamKind::String, "Hex color (#RRGGBB)")
            .optional("description", ParamKind::String, "Label description"),
        Arc::new(CreateLabel { forge }),
        "repo",
    );
}

struct ListMyRepos {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for ListMyRepos {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let page = args.i64("page").unwrap_or(1);
        let limit = args.i64("limit").unwrap_or(100);
        render(self.forge.list_my_repos(page, limit).await)
    }
}

struct CreateRepo {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreateRepo {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let name = require_str(&args, "name")?;
        let description = args.str("description").unwrap_or("");
        let private = args.bool("private").unwrap_or(false);
        render(self.forge.create_repo(name, description, private).await)
    }
}

struct ListBranches {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for ListBranches {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        render(self.forge.list_branches(owner, repo).await)
    }
}

struct CreateBranch {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreateBranch {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let branch = require_str(&args, "branch")?;
        let old_ref = args.str("old_ref").unwrap_or("main");
        render(self.forge.create_branch(owner, repo, branch, old_ref).await)
    }
}

struct DeleteBranch {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for DeleteBranch {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let branch = require_str(&args, "branch")?;
        render(self.forge.delete_branch(owner, repo, branch).await)
    }
}

struct ListRepoCommits {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for ListRepoCommits {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let path = args.str("path").unwrap_or("");
        let sha = args.str("sha").unwrap_or("");
        let page = args.i64("page").unwrap_or(1);
        let limit = args.i64("limit").unwrap_or(100);
        render(
            self.forge
                .list_commits(owner, repo, path, sha, page, limit)
                .await,
        )
    }
}

struct GetFile {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for GetFile {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let path = require_str(&args, "path")?;
        let git_ref = args.str("ref").unwrap_or("");
        render(self.forge.get_file_content(owner, repo, path, git_ref).await)
    }
}

struct CreateFile {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for CreateFile {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let path = require_str(&args, "path")?;
        let content = require_str(&args, "content")?;
        let message = require_str(&args, "message")?;
        let branch = require_str(&args, "branch")?;
        let new_branch = args.str("new_branch").unwrap_or("");
        render(
            self.forge
                .create_file(owner, repo, path, content, message, branch, new_branch)
                .await,
        )
    }
}

struct UpdateFile {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for UpdateFile {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let path = require_str(&args, "path")?;
        let sha = require_str(&args, "sha")?;
        let content = require_str(&args, "content")?;
        let message = require_str(&args, "message")?;
        let branch = require_str(&args, "branch")?;
        render(
            self.forge
                .update_file(owner, repo, path, sha, content, message, branch)
                .await,
        )
    }
}

struct DeleteFile {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for DeleteFile {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let path = require_str(&args, "path")?;
        let message = require_str(&args, "message")?;
        let branch = require_str(&args, "branch")?;
        let sha = args.str("sha").unwrap_or("");
        render(
            self.forge
                .delete_file(owner, repo, path, sha, message, branch)
                .await,
        )
    }
}

struct ListRepoLabels {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for ListRepoLabels {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let page = args.i64("page").unwrap_or(1);
        let limit = args.i64("limit").unwrap_or(50);
        render(self.forge.list_labels(owner, repo, page, limit).await)
    }
}

struct CreateLabel {
    forge: Arc<dyn ForgeApi>,
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait]
impl ToolHandler for CreateLabel {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let owner = require_str(&args, "owner")?;
        let repo = require_str(&args, "repo")?;
        let name = require_str(&args, "name")?;
        let color = require_str(&args, "color")?;
        let description = args.str("description").unwrap_or("");
        if !is_hex_color(color) {
            return Err(ToolError::invalid_arguments(format!(
                "color must be in #RRGGBB format, got {color:?}"
            )));
        }
        render(
            self.forge
                .create_label(owner, repo, name, color, description)
                .await,
        )
    }
}
