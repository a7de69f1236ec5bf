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

//! The uniform result envelope.
//!
//! Every invocation, success or failure, produces exactly one
//! [`CallToolResult`]. A handler-reported failure is still a structurally
//! valid result with `is_error` set; only transport-level faults bypass this
//! envelope entirely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One part of a result. Only the text variant is currently produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Uniform success/error envelope returned from a dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// Success result with a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Success result carrying a compact JSON payload.
    pub fn json(value: &Value) -> Self {
        Self::text(value.to_string())
    }

    /// Error-flagged result with a single text part naming the failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Text of all parts, in order.
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().map(|part| match part {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_flags() {
        let result = CallToolResult::error("missing required parameter: owner");
        assert!(result.is_error);
        assert_eq!(
            result.text_parts().collect::<Vec<_>>(),
            vec!["missing required parameter: owner"]
        );
    }

    #[test]
    fn test_wire_shape() {
        let result = CallToolResult::json(&serde_json::json!({"login": "alice"}));
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["isError"], false);
        assert_eq!(wire["content"][0]["type"], "text");
        assert_eq!(wire["content"][0]["text"], r#"{"login":"alice"}"#);
    }
}
