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

//! Shared parameter descriptions, kept short so tool listings stay cheap
//! for the model consuming them.

pub const OWNER: &str = "Repository owner";
pub const REPO: &str = "Repository name";

pub const INDEX: &str = "Issue/PR index";
pub const BODY: &str = "Content body";
pub const TITLE: &str = "Title";
pub const STATE: &str = "State";

pub const BRANCH: &str = "Branch name";
pub const OLD_REF: &str = "Source branch";
pub const HEAD: &str = "Head branch";
pub const BASE: &str = "Base branch";

pub const FILE_PATH: &str = "File path";
pub const REF: &str = "Ref (branch/tag/commit)";
pub const SHA: &str = "Commit SHA";
pub const MESSAGE: &str = "Commit message";
pub const CONTENT: &str = "Base64-encoded file content";

pub const REVIEW_ID: &str = "Review ID";
pub const REVIEW_STATE: &str = "Review state (APPROVED, REQUEST_CHANGES, COMMENT)";
pub const REVIEWERS: &str = "Reviewer usernames (comma-separated)";
pub const TEAM_REVIEWERS: &str = "Team reviewer names (comma-separated)";

pub const PAGE: &str = "Page number (1-based)";
pub const LIMIT: &str = "Page size";
pub const KEYWORD: &str = "Search keyword";
pub const ORG: &str = "Organization name";
