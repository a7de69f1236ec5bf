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

//! In-memory [`ForgeApi`] doubles. Shipped in the library proper so
//! downstream embedders can test against the tool engine without a forge.

use super::{ForgeApi, ForgeError, ForgeResult, ResponseMeta};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

const OK: ResponseMeta = ResponseMeta { status: 200 };

fn ok(value: Value) -> ForgeResult {
    Ok((value, Some(OK)))
}

/// Answers every call with canned data and counts the calls made.
#[derive(Default)]
pub struct FakeForge {
    calls: AtomicUsize,
}

impl FakeForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ForgeApi for FakeForge {
    async fn get_my_user_info(&self) -> ForgeResult {
        self.record();
        ok(json!({ "id": 1, "login": "test-user", "full_name": "Test User" }))
    }

    async fn get_version(&self) -> ForgeResult {
        self.record();
        ok(json!({ "version": "9.0.0" }))
    }

    async fn list_my_repos(&self, _page: i64, _limit: i64) -> ForgeResult {
        self.record();
        ok(json!([{ "id": 10, "name": "demo", "full_name": "test-user/demo" }]))
    }

    async fn create_repo(&self, name: &str, description: &str, private: bool) -> ForgeResult {
        self.record();
        ok(json!({
            "id": 11,
            "name": name,
            "description": description,
            "private": private,
        }))
    }

    async fn list_branches(&self, _owner: &str, _repo: &str) -> ForgeResult {
        self.record();
        ok(json!([{ "name": "main" }, { "name": "develop" }]))
    }

    async fn create_branch(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        old_ref: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "name": branch, "old_ref_name": old_ref }))
    }

    async fn delete_branch(&self, _owner: &str, _repo: &str, branch: &str) -> ForgeResult {
        self.record();
        ok(json!({ "deleted": branch }))
    }

    async fn list_commits(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _sha: &str,
        _page: i64,
        _limit: i64,
    ) -> ForgeResult {
        self.record();
        ok(json!([{ "sha": "abc123", "commit": { "message": "initial commit" } }]))
    }

    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _git_ref: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "path": path, "content": "aGVsbG8K", "encoding": "base64" }))
    }

    async fn create_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _content: &str,
        message: &str,
        branch: &str,
        _new_branch: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "content": { "path": path },
            "commit": { "message": message },
            "branch": branch,
        }))
    }

    async fn update_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        sha: &str,
        _content: &str,
        message: &str,
        _branch: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "content": { "path": path, "sha": sha },
            "commit": { "message": message },
        }))
    }

    async fn delete_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _sha: &str,
        _message: &str,
        _branch: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "deleted": path }))
    }

    async fn list_labels(&self, _owner: &str, _repo: &str, _page: i64, _limit: i64) -> ForgeResult {
        self.record();
        ok(json!([{ "id": 1, "name": "bug", "color": "ee0701" }]))
    }

    async fn create_label(
        &self,
        _owner: &str,
        _repo: &str,
        name: &str,
        color: &str,
        description: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "id": 2, "name": name, "color": color, "description": description }))
    }

    async fn get_issue(&self, _owner: &str, _repo: &str, index: i64) -> ForgeResult {
        self.record();
        ok(json!({ "number": index, "title": "Example issue", "state": "open" }))
    }

    async fn list_issues(&self, _owner: &str, _repo: &str, state: &str) -> ForgeResult {
        self.record();
        ok(json!([{ "number": 1, "title": "Example issue", "state": state }]))
    }

    async fn create_issue(
        &self,
        _owner: &str,
        _repo: &str,
        title: &str,
        body: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "number": 2, "title": title, "body": body, "state": "open" }))
    }

    async fn create_issue_comment(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        body: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "issue": index, "body": body }))
    }

    async fn get_pull_request(&self, _owner: &str, _repo: &str, index: i64) -> ForgeResult {
        self.record();
        ok(json!({ "number": index, "title": "Example PR", "state": "open" }))
    }

    async fn list_pull_requests(&self, _owner: &str, _repo: &str, state: &str) -> ForgeResult {
        self.record();
        ok(json!([{ "number": 3, "title": "Example PR", "state": state }]))
    }

    async fn create_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "number": 4,
            "title": title,
            "body": body,
            "head": { "ref": head },
            "base": { "ref": base },
        }))
    }

    async fn update_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        patch: Value,
    ) -> ForgeResult {
        self.record();
        let mut pr = json!({ "number": index, "state": "open" });
        if let (Some(pr), Some(patch)) = (pr.as_object_mut(), patch.as_object()) {
            for (key, value) in patch {
                pr.insert(key.clone(), value.clone());
            }
        }
        ok(pr)
    }

    async fn create_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        state: &str,
        body: &str,
        comments: Value,
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "id": 100,
            "pull_request": index,
            "state": state,
            "body": body,
            "comments_count": comments.as_array().map_or(0, Vec::len),
        }))
    }

    async fn submit_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        review_id: i64,
        state: &str,
        body: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "id": review_id, "pull_request": index, "state": state, "body": body }))
    }

    async fn dismiss_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        review_id: i64,
        message: &str,
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "id": review_id,
            "pull_request": index,
            "dismissed": true,
            "message": message,
        }))
    }

    async fn delete_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        review_id: i64,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "deleted": review_id }))
    }

    async fn create_review_requests(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "pull_request": index,
            "reviewers": reviewers,
            "team_reviewers": team_reviewers,
        }))
    }

    async fn delete_review_requests(
        &self,
        _owner: &str,
        _repo: &str,
        index: i64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> ForgeResult {
        self.record();
        ok(json!({
            "pull_request": index,
            "removed_reviewers": reviewers,
            "removed_team_reviewers": team_reviewers,
        }))
    }

    async fn search_repos(&self, query: &str, _page: i64, _limit: i64) -> ForgeResult {
        self.record();
        ok(json!({ "ok": true, "data": [{ "name": query }] }))
    }

    async fn search_users(&self, query: &str, _page: i64, _limit: i64) -> ForgeResult {
        self.record();
        ok(json!({ "ok": true, "data": [{ "login": query }] }))
    }

    async fn search_org_teams(
        &self,
        org: &str,
        _query: &str,
        _page: i64,
        _limit: i64,
    ) -> ForgeResult {
        self.record();
        ok(json!({ "ok": true, "data": [{ "name": "owners", "organization": org }] }))
    }
}

/// Fails every call, optionally without response metadata, so error paths
/// can assert that nothing reads the status of a response that never came.
pub struct FailingForge {
    pub with_meta: bool,
}

impl FailingForge {
    fn fail(&self) -> ForgeResult {
        if self.with_meta {
            Err(ForgeError::Api {
                status: 404,
                message: "not found".to_string(),
            })
        } else {
            Err(ForgeError::Request("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl ForgeApi for FailingForge {
    async fn get_my_user_info(&self) -> ForgeResult {
        self.fail()
    }

    async fn get_version(&self) -> ForgeResult {
        self.fail()
    }

    async fn list_my_repos(&self, _page: i64, _limit: i64) -> ForgeResult {
        self.fail()
    }

    async fn create_repo(&self, _name: &str, _description: &str, _private: bool) -> ForgeResult {
        self.fail()
    }

    async fn list_branches(&self, _owner: &str, _repo: &str) -> ForgeResult {
        self.fail()
    }

    async fn create_branch(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
        _old_ref: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn delete_branch(&self, _owner: &str, _repo: &str, _branch: &str) -> ForgeResult {
        self.fail()
    }

    async fn list_commits(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _sha: &str,
        _page: i64,
        _limit: i64,
    ) -> ForgeResult {
        self.fail()
    }

    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _git_ref: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn create_file(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _content: &str,
        _message: &str,
        _branch: &str,
        _new_branch: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn update_file(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _sha: &str,
        _content: &str,
        _message: &str,
        _branch: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn delete_file(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _sha: &str,
        _message: &str,
        _branch: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn list_labels(
        &self,
        _owner: &str,
        _repo: &str,
        _page: i64,
        _limit: i64,
    ) -> ForgeResult {
        self.fail()
    }

    async fn create_label(
        &self,
        _owner: &str,
        _repo: &str,
        _name: &str,
        _color: &str,
        _description: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn get_issue(&self, _owner: &str, _repo: &str, _index: i64) -> ForgeResult {
        self.fail()
    }

    async fn list_issues(&self, _owner: &str, _repo: &str, _state: &str) -> ForgeResult {
        self.fail()
    }

    async fn create_issue(
        &self,
        _owner: &str,
        _repo: &str,
        _title: &str,
        _body: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn create_issue_comment(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _body: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn get_pull_request(&self, _owner: &str, _repo: &str, _index: i64) -> ForgeResult {
        self.fail()
    }

    async fn list_pull_requests(&self, _owner: &str, _repo: &str, _state: &str) -> ForgeResult {
        self.fail()
    }

    async fn create_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        _title: &str,
        _body: &str,
        _head: &str,
        _base: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn update_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _patch: Value,
    ) -> ForgeResult {
        self.fail()
    }

    async fn create_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _state: &str,
        _body: &str,
        _comments: Value,
    ) -> ForgeResult {
        self.fail()
    }

    async fn submit_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _review_id: i64,
        _state: &str,
        _body: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn dismiss_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _review_id: i64,
        _message: &str,
    ) -> ForgeResult {
        self.fail()
    }

    async fn delete_pull_review(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _review_id: i64,
    ) -> ForgeResult {
        self.fail()
    }

    async fn create_review_requests(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _reviewers: &[String],
        _team_reviewers: &[String],
    ) -> ForgeResult {
        self.fail()
    }

    async fn delete_review_requests(
        &self,
        _owner: &str,
        _repo: &str,
        _index: i64,
        _reviewers: &[String],
        _team_reviewers: &[String],
    ) -> ForgeResult {
        self.fail()
    }

    async fn search_repos(&self, _query: &str, _page: i64, _limit: i64) -> ForgeResult {
        self.fail()
    }

    async fn search_users(&self, _query: &str, _page: i64, _limit: i64) -> ForgeResult {
        self.fail()
    }

    async fn search_org_teams(
        &self,
        _org: &str,
        _query: &str,
        _page: i64,
        _limit: i64,
    ) -> ForgeResult {
        self.fail()
    }
}
