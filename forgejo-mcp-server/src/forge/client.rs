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

//! `reqwest`-backed [`ForgeApi`] implementation against the Forgejo v1 API.

use super::{ForgeApi, ForgeError, ForgeResult, ResponseMeta};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Clone)]
pub struct ForgeClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ForgeClient {
    /// `base_url` is the instance root, e.g. `https://codeberg.org`; the
    /// `/api/v1` prefix is appended per request.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> ForgeResult {
        let request = request.header("Authorization", format!("token {}", self.token));
        let response = request.send().await?;
        let status = response.status();
        let meta = ResponseMeta {
            status: status.as_u16(),
        };
        debug!(path, status = meta.status, "forge API call");

        let body = response.text().await?;
        if !status.is_success() {
            let message = extract_api_message(&body).unwrap_or(body);
            return Err(ForgeError::Api {
                status: meta.status,
                message,
            });
        }
        if body.is_empty() {
            return Ok((Value::Null, Some(meta)));
        }
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ForgeError::Decode(e.to_string()))?;
        Ok((value, Some(meta)))
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ForgeResult {
        let request = self.http.get(self.url(path)).query(query);
        self.send(request, path).await
    }

    async fn post(&self, path: &str, body: Value) -> ForgeResult {
        let request = self.http.post(self.url(path)).json(&body);
        self.send(request, path).await
    }

    async fn put(&self, path: &str, body: Value) -> ForgeResult {
        let request = self.http.put(self.url(path)).json(&body);
        self.send(request, path).await
    }

    async fn patch(&self, path: &str, body: Value) -> ForgeResult {
        let request = self.http.patch(self.url(path)).json(&body);
        self.send(request, path).await
    }

    async fn delete(&self, path: &str, body: Option<Value>) -> ForgeResult {
        let mut request = self.http.delete(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.send(request, path).await
    }
}

/// Forgejo error bodies carry a `message` field; fall back to the raw body.
fn extract_api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

#[async_trait]
impl ForgeApi for ForgeClient {
    async fn get_my_user_info(&self) -> ForgeResult {
        self.get("/user", &[]).await
    }

    async fn get_version(&self) -> ForgeResult {
        self.get("/version", &[]).await
    }

    async fn list_my_repos(&self, page: i64, limit: i64) -> ForgeResult {
        self.get(
            "/user/repos",
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn create_repo(&self, name: &str, description: &str, private: bool) -> ForgeResult {
        self.post(
            "/user/repos",
            json!({ "name": name, "description": description, "private": private }),
        )
        .await
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> ForgeResult {
        self.get(&format!("/repos/{owner}/{repo}/branches"), &[]).await
    }

    async fn create_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        old_ref: &str,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/branches"),
            json!({ "new_branch_name": branch, "old_ref_name": old_ref }),
        )
        .await
    }

    async fn delete_branch(&self, owner: &str, repo: &str, branch: &str) -> ForgeResult {
        self.delete(&format!("/repos/{owner}/{repo}/branches/{branch}"), None)
            .await
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        page: i64,
        limit: i64,
    ) -> ForgeResult {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if !path.is_empty() {
            query.push(("path", path.to_string()));
        }
        if !sha.is_empty() {
            query.push(("sha", sha.to_string()));
        }
        self.get(&format!("/repos/{owner}/{repo}/commits"), &query)
            .await
    }

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> ForgeResult {
        let mut query = Vec::new();
        if !git_ref.is_empty() {
            query.push(("ref", git_ref.to_string()));
        }
        self.get(&format!("/repos/{owner}/{repo}/contents/{path}"), &query)
            .await
    }

    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
        new_branch: &str,
    ) -> ForgeResult {
        let mut body = json!({ "content": content, "message": message, "branch": branch });
        if !new_branch.is_empty() {
            body["new_branch"] = json!(new_branch);
        }
        self.post(&format!("/repos/{owner}/{repo}/contents/{path}"), body)
            .await
    }

    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        content: &str,
        message: &str,
        branch: &str,
    ) -> ForgeResult {
        self.put(
            &format!("/repos/{owner}/{repo}/contents/{path}"),
            json!({ "sha": sha, "content": content, "message": message, "branch": branch }),
        )
        .await
    }

    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        sha: &str,
        message: &str,
        branch: &str,
    ) -> ForgeResult {
        let mut body = json!({ "message": message, "branch": branch });
        if !sha.is_empty() {
            body["sha"] = json!(sha);
        }
        self.delete(&format!("/repos/{owner}/{repo}/contents/{path}"), Some(body))
            .await
    }

    async fn list_labels(&self, owner: &str, repo: &str, page: i64, limit: i64) -> ForgeResult {
        self.get(
            &format!("/repos/{owner}/{repo}/labels"),
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: &str,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/labels"),
            json!({ "name": name, "color": color, "description": description }),
        )
        .await
    }

    async fn get_issue(&self, owner: &str, repo: &str, index: i64) -> ForgeResult {
        self.get(&format!("/repos/{owner}/{repo}/issues/{index}"), &[])
            .await
    }

    async fn list_issues(&self, owner: &str, repo: &str, state: &str) -> ForgeResult {
        self.get(
            &format!("/repos/{owner}/{repo}/issues"),
            &[("state", state.to_string())],
        )
        .await
    }

    async fn create_issue(&self, owner: &str, repo: &str, title: &str, body: &str) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/issues"),
            json!({ "title": title, "body": body }),
        )
        .await
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        body: &str,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/issues/{index}/comments"),
            json!({ "body": body }),
        )
        .await
    }

    async fn get_pull_request(&self, owner: &str, repo: &str, index: i64) -> ForgeResult {
        self.get(&format!("/repos/{owner}/{repo}/pulls/{index}"), &[])
            .await
    }

    async fn list_pull_requests(&self, owner: &str, repo: &str, state: &str) -> ForgeResult {
        self.get(
            &format!("/repos/{owner}/{repo}/pulls"),
            &[("state", state.to_string())],
        )
        .await
    }

    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/pulls"),
            json!({ "title": title, "body": body, "head": head, "base": base }),
        )
        .await
    }

    async fn update_pull_request(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        patch: Value,
    ) -> ForgeResult {
        self.patch(&format!("/repos/{owner}/{repo}/pulls/{index}"), patch)
            .await
    }

    async fn create_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        state: &str,
        body: &str,
        comments: Value,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/pulls/{index}/reviews"),
            json!({ "event": state, "body": body, "comments": comments }),
        )
        .await
    }

    async fn submit_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        review_id: i64,
        state: &str,
        body: &str,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/pulls/{index}/reviews/{review_id}"),
            json!({ "event": state, "body": body }),
        )
        .await
    }

    async fn dismiss_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        review_id: i64,
        message: &str,
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/pulls/{index}/reviews/{review_id}/dismissals"),
            json!({ "message": message }),
        )
        .await
    }

    async fn delete_pull_review(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        review_id: i64,
    ) -> ForgeResult {
        self.delete(
            &format!("/repos/{owner}/{repo}/pulls/{index}/reviews/{review_id}"),
            None,
        )
        .await
    }

    async fn create_review_requests(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> ForgeResult {
        self.post(
            &format!("/repos/{owner}/{repo}/pulls/{index}/requested_reviewers"),
            json!({ "reviewers": reviewers, "team_reviewers": team_reviewers }),
        )
        .await
    }

    async fn delete_review_requests(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        reviewers: &[String],
        team_reviewers: &[String],
    ) -> ForgeResult {
        self.delete(
            &format!("/repos/{owner}/{repo}/pulls/{index}/requested_reviewers"),
            Some(json!({ "reviewers": reviewers, "team_reviewers": team_reviewers })),
        )
        .await
    }

    async fn search_repos(&self, query: &str, page: i64, limit: i64) -> ForgeResult {
        self.get(
            "/repos/search",
            &[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn search_users(&self, query: &str, page: i64, limit: i64) -> ForgeResult {
        self.get(
            "/users/search",
            &[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn search_org_teams(&self, org: &str, query: &str, page: i64, limit: i64) -> ForgeResult {
        self.get(
            &format!("/orgs/{org}/teams/search"),
            &[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_appends_api_prefix() {
        let client = ForgeClient::new("https://codeberg.org/", "t");
        assert_eq!(client.url("/user"), "https://codeberg.org/api/v1/user");
    }

    #[test]
    fn test_extract_api_message() {
        assert_eq!(
            extract_api_message(r#"{"message":"not found"}"#),
            Some("not found".to_string())
        );
        assert_eq!(extract_api_message("oops"), None);
    }
}
