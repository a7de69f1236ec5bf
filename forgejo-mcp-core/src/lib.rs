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

//! Core types for the forgejo-mcp tool engine.
//!
//! Everything here is transport-agnostic: tool descriptions, the tagged
//! argument values handed to handlers, the uniform result envelope, and the
//! handler trait. The registry and dispatcher that consume these live in
//! `forgejo-mcp-server`.

mod args;
mod error;
mod handler;
mod result;
mod tool_spec;

pub use args::{ArgValue, Arguments};
pub use error::ToolError;
pub use handler::{ExecutionContext, ToolHandler};
pub use result::{CallToolResult, ToolContent};
pub use tool_spec::{ParamKind, ParamSpec, ToolSpec};
