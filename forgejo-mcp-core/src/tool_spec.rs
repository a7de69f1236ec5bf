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

//! Tool descriptions.
//!
//! A [`ToolSpec`] is the immutable, schema-described contract for one remote
//! operation: its name, description, and parameter list. Specs are built once
//! at startup by the domain modules and never mutated afterwards.

use crate::args::ArgValue;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wire-level kind of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    /// JSON Schema type name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// One parameter of a tool. Unique by `name` within a spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Filled in for absent optional parameters before the handler runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgValue>,
}

/// Immutable description of one tool: the only lookup key is `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Add a required parameter.
    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            default: None,
        });
        self
    }

    /// Add an optional parameter without a default.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: None,
        });
        self
    }

    /// Add an optional parameter with a default value.
    pub fn optional_with_default(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
        default: ArgValue,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: Some(default),
        });
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Render the MCP `inputSchema` JSON object for `tools/list` discovery.
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.params {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": Value::Object(properties),
            "required": Value::Array(required),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_schema_shape() {
        let spec = ToolSpec::new("create_issue", "Create an issue")
            .required("owner", ParamKind::String, "Repository owner")
            .required("repo", ParamKind::String, "Repository name")
            .required("title", ParamKind::String, "Title")
            .optional("body", ParamKind::String, "Content body");

        let schema = spec.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["owner"]["type"], "string");
        assert_eq!(
            schema["required"],
            serde_json::json!(["owner", "repo", "title"])
        );
    }

    #[test]
    fn test_param_lookup() {
        let spec = ToolSpec::new("t", "").optional_with_default(
            "limit",
            ParamKind::Number,
            "Page size",
            ArgValue::Num(20.0),
        );
        let param = spec.param("limit").unwrap();
        assert!(!param.required);
        assert_eq!(param.default, Some(ArgValue::Num(20.0)));
        assert!(spec.param("missing").is_none());
    }
}
