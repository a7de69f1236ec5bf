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

//! Tool registry: the concurrency-safe catalog of tools.
//!
//! Backed by a `DashMap` so `register`, `lookup`, and `list` can run from any
//! number of tasks without a reader ever observing a torn entry. Shard locks
//! are held only for the map operation itself, never across handler execution
//! or caller iteration.

use dashmap::DashMap;
use forgejo_mcp_core::{ToolHandler, ToolSpec};
use std::sync::Arc;

/// One registered tool: its spec, its handler, and its domain tag.
///
/// Cloning is cheap (Arc clones), so `lookup` and `list` hand copies out and
/// release the shard lock before the caller does anything with them.
#[derive(Clone)]
pub struct RegistryEntry {
    pub spec: Arc<ToolSpec>,
    pub handler: Arc<dyn ToolHandler>,
    pub domain: Arc<str>,
}

/// Outcome of a `register` call.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    /// True when an earlier registration under the same name was replaced.
    /// Later registrations win silently; collisions are never an error.
    pub is_replacement: bool,
}

/// Concurrency-safe catalog mapping tool name to [`RegistryEntry`].
///
/// Created once per server process (or per test/CLI invocation) and shared by
/// reference into every adapter and the direct invoker; there is no ambient
/// global registry.
pub struct ToolRegistry {
    tools: DashMap<String, RegistryEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Insert or replace the entry for `spec.name`. Safe to call concurrently
    /// with `lookup` and `list`.
    pub fn register(
        &self,
        spec: ToolSpec,
        handler: Arc<dyn ToolHandler>,
        domain: &str,
    ) -> Registration {
        let name = spec.name.clone();
        let entry = RegistryEntry {
            spec: Arc::new(spec),
            handler,
            domain: Arc::from(domain),
        };
        let previous = self.tools.insert(name.clone(), entry);
        Registration {
            name,
            is_replacement: previous.is_some(),
        }
    }

    /// O(1) lookup by name. Absence is `None`, never an error.
    pub fn lookup(&self, name: &str) -> Option<RegistryEntry> {
        self.tools.get(name).map(|entry| entry.clone())
    }

    /// Snapshot of all entries. The returned vector is owned by the caller;
    /// no registry lock is held while it is iterated or serialized.
    pub fn list(&self) -> Vec<RegistryEntry> {
        self.tools.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use forgejo_mcp_core::{Arguments, ExecutionContext, ParamKind, ToolError};
    use serde_json::json;

    struct StaticHandler(serde_json::Value);

    #[async_trait]
    impl ToolHandler for StaticHandler {
        async fn call(
            &self,
            _args: Arguments,
            _ctx: &ExecutionContext,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(self.0.clone())
        }
    }

    fn make_spec(name: &str) -> ToolSpec {
        ToolSpec::new(name, "test tool").required("owner", ParamKind::String, "Repository owner")
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new();
        let reg = registry.register(
            make_spec("get_issue_by_index"),
            Arc::new(StaticHandler(json!({}))),
            "issue",
        );
        assert!(!reg.is_replacement);

        let entry = registry.lookup("get_issue_by_index").unwrap();
        assert_eq!(entry.spec.name, "get_issue_by_index");
        assert_eq!(&*entry.domain, "issue");
    }

    #[test]
    fn test_lookup_absent() {
        let registry = ToolRegistry::new();
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_later_registration_wins() {
        let registry = ToolRegistry::new();
        registry.register(make_spec("t"), Arc::new(StaticHandler(json!(1))), "a");
        let reg = registry.register(make_spec("t"), Arc::new(StaticHandler(json!(2))), "b");
        assert!(reg.is_replacement);
        assert_eq!(registry.len(), 1);
        assert_eq!(&*registry.lookup("t").unwrap().domain, "b");
    }

    // Mirrors the upstream regression where registration raced listing on an
    // unguarded map: N tools from K registrant threads while M threads list
    // continuously must neither fault nor lose entries.
    #[test]
    fn test_concurrent_register_and_list() {
        const TOOLS_PER_THREAD: usize = 25;
        const REGISTRANTS: usize = 4;
        const LISTERS: usize = 10;

        let registry = Arc::new(ToolRegistry::new());
        let mut handles = Vec::new();

        for k in 0..REGISTRANTS {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for i in 0..TOOLS_PER_THREAD {
                    registry.register(
                        make_spec(&format!("tool_{}_{}", k, i)),
                        Arc::new(StaticHandler(json!(null))),
                        "test",
                    );
                }
            }));
        }

        for _ in 0..LISTERS {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let snapshot = registry.list();
                    // Entries must never be torn: every snapshot element has a
                    // spec whose name resolves back to itself.
                    for entry in &snapshot {
                        assert!(!entry.spec.name.is_empty());
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), TOOLS_PER_THREAD * REGISTRANTS);
        assert_eq!(registry.list().len(), TOOLS_PER_THREAD * REGISTRANTS);
    }
}
