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

use thiserror::Error;

/// Tool engine error taxonomy.
///
/// Validation and handler errors never unwind past the dispatcher; they are
/// converted into an error-flagged [`crate::CallToolResult`]. `UnknownTool`
/// and `InvalidArguments` are boundary errors raised before any dispatch
/// happens.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToolError {
    #[error("missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("parameter {name} must be a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("tool execution failed: {message}")]
    Handler { message: String },
}

impl ToolError {
    pub fn missing(name: impl Into<String>) -> Self {
        ToolError::MissingParameter { name: name.into() }
    }

    pub fn mismatch(name: impl Into<String>, expected: &'static str) -> Self {
        ToolError::TypeMismatch {
            name: name.into(),
            expected,
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        ToolError::UnknownTool { name: name.into() }
    }

    pub fn invalid_arguments(reason: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            reason: reason.into(),
        }
    }

    pub fn handler(message: impl Into<String>) -> Self {
        ToolError::Handler {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        assert_eq!(
            ToolError::missing("owner").to_string(),
            "missing required parameter: owner"
        );
        assert_eq!(
            ToolError::mismatch("index", "number").to_string(),
            "parameter index must be a number"
        );
        assert_eq!(
            ToolError::unknown_tool("nope").to_string(),
            "unknown tool: nope"
        );
    }
}
