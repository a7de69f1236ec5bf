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

use super::{params, render, require_str};
use crate::forge::ForgeApi;
use crate::registry::ToolRegistry;
use async_trait::async_trait;
use forgejo_mcp_core::{
    ArgValue, Arguments, ExecutionContext, ParamKind, ToolError, ToolHandler, ToolSpec,
};
use serde_json::Value;
use std::sync::Arc;

pub const SEARCH_REPOS: &str = "search_repos";
pub const SEARCH_USERS: &str = "search_users";
pub const SEARCH_ORG_TEAMS: &str = "search_org_teams";

fn paged(spec: ToolSpec) -> ToolSpec {
    spec.optional_with_default("page", ParamKind::Number, params::PAGE, ArgValue::Num(1.0))
        .optional_with_default(
            "limit",
            ParamKind::Number,
            params::LIMIT,
            ArgValue::Num(100.0),
        )
}

pub fn register(registry: &ToolRegistry, forge: Arc<dyn ForgeApi>) {
    registry.register(
        paged(
            ToolSpec::new(SEARCH_REPOS, "Search repositories").optional_with_default(
                "keyword",
                ParamKind::String,
                params::KEYWORD,
                ArgValue::Str(String::new()),
            ),
        ),
        Arc::new(SearchRepos {
            forge: forge.clone(),
        }),
        "search",
    );
    registry.register(
        paged(
            ToolSpec::new(SEARCH_USERS, "Search users").optional_with_default(
                "keyword",
                ParamKind::String,
                params::KEYWORD,
                ArgValue::Str(String::new()),
            ),
        ),
        Arc::new(SearchUsers {
            forge: forge.clone(),
        }),
        "search",
    );
    registry.register(
        paged(
            ToolSpec::new(SEARCH_ORG_TEAMS, "Search teams within an organization")
                .required("org", ParamKind::String, params::ORG)
                .optional_with_default(
                    "keyword",
                    ParamKind::String,
                    params::KEYWORD,
                    ArgValue::Str(String::new()),
                ),
        ),
        Arc::new(SearchOrgTeams { forge }),
        "search",
    );
}

struct SearchRepos {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for SearchRepos {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let keyword = args.str("keyword").unwrap_or("");
        let page = args.i64("page").unwrap_or(1);
        let limit = args.i64("limit").unwrap_or(100);
        render(self.forge.search_repos(keyword, page, limit).await)
    }
}

struct SearchUsers {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for SearchUsers {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let keyword = args.str("keyword").unwrap_or("");
        let page = args.i64("page").unwrap_or(1);
        let limit = args.i64("limit").unwrap_or(100);
        render(self.forge.search_users(keyword, page, limit).await)
    }
}

struct SearchOrgTeams {
    forge: Arc<dyn ForgeApi>,
}

#[async_trait]
impl ToolHandler for SearchOrgTeams {
    async fn call(&self, args: Arguments, _ctx: &ExecutionContext) -> Result<Value, ToolError> {
        let org = require_str(&args, "org")?;
        let keyword = args.str("keyword").unwrap_or("");
        let page = args.i64("page").unwrap_or(1);
        let limit = args.i64("limit").unwrap_or(100);
        render(self.forge.search_org_teams(org, keyword, page, limit).await)
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
    async fn test_search_defaults_apply_without_args() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(SEARCH_REPOS).unwrap();

        let result =
            dispatcher::invoke(&entry, &HashMap::new(), &ExecutionContext::default()).await;
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_search_users_passes_keyword() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(SEARCH_USERS).unwrap();

        let mut raw = HashMap::new();
        raw.insert("keyword".to_string(), json!("alice"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["data"][0]["login"], "alice");
    }

    #[tokio::test]
    async fn test_search_org_teams_requires_org() {
        let registry = ToolRegistry::new();
        register(&registry, Arc::new(FakeForge::new()));
        let entry = registry.lookup(SEARCH_ORG_TEAMS).unwrap();

        let result =
            dispatcher::invoke(&entry, &HashMap::new(), &ExecutionContext::default()).await;
        assert!(result.is_error);
        assert_eq!(
            result.text_parts().next().unwrap(),
            "missing required parameter: org"
        );

        let mut raw = HashMap::new();
        raw.insert("org".to_string(), json!("forgejo"));
        let result = dispatcher::invoke(&entry, &raw, &ExecutionContext::default()).await;
        assert!(!result.is_error);
        let body: Value = serde_json::from_str(result.text_parts().next().unwrap()).unwrap();
        assert_eq!(body["data"][0]["organization"], "forgejo");
    }
}
