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

//! Direct invoker: list, describe, and execute tools against the same
//! registry/dispatcher pair the server transports use, with no JSON-RPC
//! framing in between.

use forgejo_mcp_core::{ExecutionContext, ToolError};
use forgejo_mcp_server::dispatcher;
use forgejo_mcp_server::registry::{RegistryEntry, ToolRegistry};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Rendered result of one `exec`; `is_error` decides stream and exit code.
#[derive(Debug)]
pub struct ExecOutcome {
    pub rendered: String,
    pub is_error: bool,
}

fn sorted_entries(registry: &ToolRegistry) -> Vec<RegistryEntry> {
    let mut entries = registry.list();
    entries.sort_by(|a, b| a.domain.cmp(&b.domain).then(a.spec.name.cmp(&b.spec.name)));
    entries
}

/// Catalog listing, sorted by domain then name so output is stable.
pub fn list(registry: &ToolRegistry, mode: OutputMode) -> String {
    let entries = sorted_entries(registry);
    match mode {
        OutputMode::Json => {
            let items: Vec<Value> = entries
                .iter()
                .map(|e| {
                    json!({
                        "name": e.spec.name,
                        "description": e.spec.description,
                        "domain": &*e.domain,
                    })
                })
                .collect();
            Value::Array(items).to_string()
        }
        OutputMode::Text => {
            let mut out = String::new();
            let mut current_domain = String::new();
            for entry in &entries {
                if *entry.domain != *current_domain {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&entry.domain.to_uppercase());
                    out.push('\n');
                    current_domain = entry.domain.to_string();
                }
                out.push_str(&format!(
                    "  {:<30} {}\n",
                    entry.spec.name, entry.spec.description
                ));
            }
            out
        }
    }
}

/// Usage text for one tool: description, then parameters sorted by name.
pub fn help(registry: &ToolRegistry, tool: &str) -> Result<String, ToolError> {
    let entry = registry
        .lookup(tool)
        .ok_or_else(|| ToolError::unknown_tool(tool))?;

    let mut out = format!("{} - {}\n", entry.spec.name, entry.spec.description);
    if entry.spec.params.is_empty() {
        out.push_str("  (no parameters)\n");
        return Ok(out);
    }
    let mut params: Vec<_> = entry.spec.params.iter().collect();
    params.sort_by(|a, b| a.name.cmp(&b.name));
    for param in params {
        let requirement = if param.required { "required" } else { "optional" };
        out.push_str(&format!(
            "  {:<12} {:<8} {:<9} {}\n",
            param.name,
            param.kind.as_str(),
            requirement,
            param.description
        ));
    }
    Ok(out)
}

/// Execute one tool with raw JSON arguments.
///
/// The argument string must decode to a JSON object; anything else is
/// rejected before the dispatcher sees it. Validation and handler failures
/// come back as an error-flagged outcome, exactly as they would over MCP.
pub async fn exec(
    registry: &ToolRegistry,
    tool: &str,
    args_json: &str,
    mode: OutputMode,
) -> Result<ExecOutcome, ToolError> {
    let entry = registry
        .lookup(tool)
        .ok_or_else(|| ToolError::unknown_tool(tool))?;

    let raw: Value = serde_json::from_str(args_json)
        .map_err(|e| ToolError::invalid_arguments(format!("arguments are not valid JSON: {e}")))?;
    let raw_args: HashMap<String, Value> = match raw {
        Value::Object(map) => map.into_iter().collect(),
        other => {
            return Err(ToolError::invalid_arguments(format!(
                "arguments must be a JSON object, got {}",
                kind_name(&other)
            )))
        }
    };

    let ctx = ExecutionContext::default();
    let result = dispatcher::invoke(&entry, &raw_args, &ctx).await;

    let rendered = match mode {
        OutputMode::Json => serde_json::to_string(&result)
            .map_err(|e| ToolError::handler(e.to_string()))?,
        OutputMode::Text => result.text_parts().collect::<Vec<_>>().join("\n"),
    };
    Ok(ExecOutcome {
        rendered,
        is_error: result.is_error,
    })
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forgejo_mcp_core::{Arguments, ParamKind, ToolHandler, ToolSpec};
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(
            &self,
            args: Arguments,
            _ctx: &ExecutionContext,
        ) -> Result<Value, ToolError> {
            Ok(Value::String(
                args.str("message").unwrap_or_default().to_string(),
            ))
        }
    }

    fn registry_with_two_tools() -> ToolRegistry {
        let registry = ToolRegistry::new();
        registry.register(
            ToolSpec::new("b", "second tool"),
            Arc::new(Echo),
            "y",
        );
        registry.register(
            ToolSpec::new("a", "first tool").required(
                "message",
                ParamKind::String,
                "Content body",
            ),
            Arc::new(Echo),
            "x",
        );
        registry
    }

    #[test]
    fn test_list_json_sorted_by_domain_then_name() {
        let registry = registry_with_two_tools();
        let out = list(&registry, OutputMode::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["name"], "a");
        assert_eq!(parsed[0]["domain"], "x");
        assert_eq!(parsed[1]["name"], "b");
        assert_eq!(parsed[1]["domain"], "y");
    }

    #[test]
    fn test_list_text_groups_by_domain() {
        let registry = registry_with_two_tools();
        let out = list(&registry, OutputMode::Text);
        let x = out.find("X\n").unwrap();
        let y = out.find("Y\n").unwrap();
        assert!(x < y);
        assert!(out.contains("first tool"));
    }

    #[test]
    fn test_help_unknown_tool() {
        let registry = registry_with_two_tools();
        let err = help(&registry, "missing_tool").unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { .. }));
    }

    #[test]
    fn test_help_lists_params() {
        let registry = registry_with_two_tools();
        let out = help(&registry, "a").unwrap();
        assert!(out.starts_with("a - first tool"));
        assert!(out.contains("message"));
        assert!(out.contains("required"));
    }

    #[tokio::test]
    async fn test_exec_renders_string_payload_verbatim() {
        let registry = registry_with_two_tools();
        let outcome = exec(&registry, "a", r#"{"message":"hi"}"#, OutputMode::Text)
            .await
            .unwrap();
        assert!(!outcome.is_error);
        assert_eq!(outcome.rendered, "hi");
    }

    #[tokio::test]
    async fn test_exec_unknown_tool_is_a_hard_error() {
        let registry = registry_with_two_tools();
        let err = exec(&registry, "missing_tool", "{}", OutputMode::Text)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { .. }));
    }

    #[tokio::test]
    async fn test_exec_validation_failure_is_error_outcome() {
        let registry = registry_with_two_tools();
        let outcome = exec(&registry, "a", "{}", OutputMode::Text).await.unwrap();
        assert!(outcome.is_error);
        assert_eq!(outcome.rendered, "missing required parameter: message");
    }

    #[tokio::test]
    async fn test_exec_rejects_non_object_arguments() {
        let registry = registry_with_two_tools();
        let err = exec(&registry, "a", "[1,2]", OutputMode::Text)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
