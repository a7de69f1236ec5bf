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

//! Boundary to the Forgejo REST API.
//!
//! Every call yields the decoded response body plus optional response
//! metadata. Metadata is absent whenever the transport failed before a
//! status line existed, so callers must check the error before touching it.

pub mod client;
pub mod fake;

pub use client::ForgeClient;
pub use fake::{FailingForge, FakeForge};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Response metadata that may or may not accompany a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
}

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ForgeError {
    fn from(e: reqwest::Error) -> Self {
        ForgeError::Request(e.to_string())
    }
}

/// Body plus metadata on success. The metadata is `None` when the server
/// never produced a status, e.g. a connect failure surfaced late.
pub type ForgeResult = Result<(Value, Option<ResponseMeta>), ForgeError>;

/// Operations the tool handlers need from a Forgejo instance.
///
/// One method per remote operation keeps the handlers thin: they validate
/// nothing themselves, the dispatcher has already done that, and they only
/// shape the call and render the result.
#[async_trait]
pub trait ForgeApi: Send + Sync {
    async fn get_my_user_info(&self) -> ForgeResult;
    async fn get_version(&self) -> ForgeResult;

    async fn list_my_repos(&self, page: i64, limit: i64) -> ForgeResult;
    async fn create_repo(&self, name: &str, description: &str, private: bool) -> ForgeResult;
    async fn list_branches(&self, owner: &str, repo: &str) -> ForgeResult;
    async fn create_branch(&self, owner: &str, repo: &str, branch: &str, old_ref: &str)
        -> ForgeResult;
    async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> ForgeResult;
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        page: i64,
        limit: i64,
    ) -> ForgeResult;
    async fn get_file_content(&self, owner: &str, repo: &str, path: &str, git_ref: &str)
        -> ForgeResult;
    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
        new_branch: &str,
    ) -> ForgeResult;
    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        content: &str,
        message: &str,
        branch: &str,
    ) -> ForgeResult;
    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        message: &str,
        branch: &str,
    ) -> ForgeResult;
    async fn list_labels(&self, owner: &str, repo: &str, page: i64, limit: i64) -> ForgeResult;
    async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: &str,
    ) -> ForgeResult;

    async fn get_issue(&self, owner: &str, repo: &str, index: i64) -> ForgeResult;
    async fn list_issues(&self, owner: &str, repo: &str, state: &str) -> ForgeResult;
    async fn create_issue(&self, owner: &str, repo: &str, title: &str, body: &str) -> ForgeResult;
    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        body: &str,
    ) -> ForgeResult;

    async fn get_pull_request(&self, owner: &str, repo: &str, index: i64) -> ForgeResult;
    async fn list_pull_requests(&self, owner: &str, repo: &str, state: &str) -> ForgeResult;
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> ForgeResult;
    /// Only the fields present in `patch` are sent.
    async fn update_pull_request(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        patch: Value,
    ) -> ForgeResult;

    async fn create_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        state: &str,
        body: &str,
        comments: Value,
    ) -> ForgeResult;
    async fn submit_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        review_id: i64,
        state: &str,
        body: &str,
    ) -> ForgeResult;
    async fn dismiss_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        review_id: i64,
        message: &str,
    ) -> ForgeResult;
    async fn delete_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        review_id: i64,
    ) -> ForgeResult;
    async fn create_review_requests(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> ForgeResult;
    async fn delete_review_requests(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> ForgeResult;

    async fn search_repos(&self, query: &str, page: i64, limit: i64) -> ForgeResult;
    async fn search_users(&self, query: &str, page: i64, limit: i64) -> ForgeResult;
    async fn search_org_teams(&self, org: &str, query: &str, page: i64, limit: i64) -> ForgeResult;

    /// Basic connectivity check, used once at startup.
    async fn verify_connection(&self) -> ForgeResult {
        self.get_my_user_info().await
    }
}
