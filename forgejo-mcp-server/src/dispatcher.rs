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

//! Dispatch engine: argument validation, handler execution, result
//! normalization.
//!
//! Every path through [`invoke`] produces a [`CallToolResult`]; validation
//! failures, handler errors, and even handler panics become error-flagged
//! results rather than unwinding into the serving loop. There are no retries:
//! handlers may be non-idempotent remote calls.

use crate::registry::RegistryEntry;
use forgejo_mcp_core::{ArgValue, Arguments, CallToolResult, ExecutionContext, ToolError};
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

/// Validate and coerce a raw argument bag against a spec, run the handler,
/// and normalize the outcome into the uniform envelope.
pub async fn invoke(
    entry: &RegistryEntry,
    raw_args: &HashMap<String, Value>,
    ctx: &ExecutionContext,
) -> CallToolResult {
    let args = match validate(entry, raw_args) {
        Ok(args) => args,
        Err(err) => {
            tracing::debug!(tool = %entry.spec.name, error = %err, "argument validation failed");
            return CallToolResult::error(err.to_string());
        }
    };

    let call = AssertUnwindSafe(entry.handler.call(args, ctx)).catch_unwind();
    match call.await {
        Ok(Ok(value)) => normalize(value),
        Ok(Err(err)) => {
            tracing::warn!(tool = %entry.spec.name, error = %err, "tool handler failed");
            CallToolResult::error(err.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(tool = %entry.spec.name, panic = %message, "tool handler panicked");
            CallToolResult::error(
                ToolError::handler(format!("panic in tool {}: {}", entry.spec.name, message))
                    .to_string(),
            )
        }
    }
}

/// Build the validated argument map. The handler does not run if this fails.
///
/// Rules, in order per declared parameter: a present non-null value must match
/// the declared kind (`TypeMismatch` otherwise); an absent or null value for a
/// required parameter is `MissingParameter`; an absent optional parameter is
/// filled from its default when one exists, else left absent. Unknown wire
/// keys are dropped.
fn validate(entry: &RegistryEntry, raw_args: &HashMap<String, Value>) -> Result<Arguments, ToolError> {
    let mut args = Arguments::new();
    for param in &entry.spec.params {
        let wire = raw_args.get(&param.name);
        let value = match wire {
            Some(Value::Null) | None => None,
            Some(other) => match ArgValue::from_json(other) {
                Some(v) => Some(v),
                None => return Err(ToolError::mismatch(&param.name, param.kind.as_str())),
            },
        };
        match value {
            Some(v) => {
                if !v.matches_kind(param.kind) {
                    return Err(ToolError::mismatch(&param.name, param.kind.as_str()));
                }
                args.insert(&param.name, v);
            }
            None if param.required => return Err(ToolError::missing(&param.name)),
            None => {
                if let Some(default) = &param.default {
                    args.insert(&param.name, default.clone());
                }
            }
        }
    }
    Ok(args)
}

/// A plain string payload is delivered verbatim; anything else is compact
/// JSON. Keeps CLI text output readable for tools that return prose.
fn normalize(value: Value) -> CallToolResult {
    match value {
        Value::String(text) => CallToolResult::text(text),
        other => CallToolResult::json(&other),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;
    use async_trait::async_trait;
    use forgejo_mcp_core::{ParamKind, ToolHandler, ToolSpec};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct EchoArgs;

    #[async_trait]
    impl ToolHandler for EchoArgs {
        async fn call(
            &self,
            args: Arguments,
            _ctx: &ExecutionContext,
        ) -> Result<Value, ToolError> {
            Ok(json!({
                "owner": args.str("owner"),
                "index": args.i64("index"),
                "limit": args.i64("limit"),
            }))
        }
    }

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl ToolHandler for CountingHandler {
        async fn call(
            &self,
            _args: Arguments,
            _ctx: &ExecutionContext,
        ) -> Result<Value, ToolError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn call(
            &self,
            _args: Arguments,
            _ctx: &ExecutionContext,
        ) -> Result<Value, ToolError> {
            Err(ToolError::handler("remote call failed: 502 Bad Gateway"))
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl ToolHandler for PanickingHandler {
        async fn call(
            &self,
            _args: Arguments,
            _ctx: &ExecutionContext,
        ) -> Result<Value, ToolError> {
            panic!("boom");
        }
    }

    fn spec_with_params() -> ToolSpec {
        ToolSpec::new("echo_args", "echo validated arguments")
            .required("owner", ParamKind::String, "Repository owner")
            .required("index", ParamKind::Number, "Issue index")
            .optional_with_default("limit", ParamKind::Number, "Page size", ArgValue::Num(20.0))
    }

    fn entry(spec: ToolSpec, handler: Arc<dyn ToolHandler>) -> RegistryEntry {
        let registry = ToolRegistry::new();
        registry.register(spec, handler, "test");
        registry.list().pop().unwrap()
    }

    fn raw(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_missing_required_parameter_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entry = entry(spec_with_params(), Arc::new(CountingHandler(calls.clone())));

        let result = invoke(
            &entry,
            &raw(json!({"owner": "alice"})),
            &ExecutionContext::default(),
        )
        .await;

        assert!(result.is_error);
        let text = result.text_parts().collect::<String>();
        assert!(text.contains("index"), "error must name the field: {text}");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_null_counts_as_absent() {
        let entry = entry(spec_with_params(), Arc::new(EchoArgs));
        let result = invoke(
            &entry,
            &raw(json!({"owner": "alice", "index": null})),
            &ExecutionContext::default(),
        )
        .await;
        assert!(result.is_error);
        assert!(result.text_parts().collect::<String>().contains("index"));
    }

    #[tokio::test]
    async fn test_type_mismatch() {
        let entry = entry(spec_with_params(), Arc::new(EchoArgs));
        let result = invoke(
            &entry,
            &raw(json!({"owner": "alice", "index": "not-a-number"})),
            &ExecutionContext::default(),
        )
        .await;
        assert!(result.is_error);
        let text = result.text_parts().collect::<String>();
        assert!(text.contains("index") && text.contains("number"), "{text}");
    }

    #[tokio::test]
    async fn test_structured_value_is_a_mismatch() {
        let entry = entry(spec_with_params(), Arc::new(EchoArgs));
        let result = invoke(
            &entry,
            &raw(json!({"owner": {"nested": true}, "index": 1})),
            &ExecutionContext::default(),
        )
        .await;
        assert!(result.is_error);
        assert!(result.text_parts().collect::<String>().contains("owner"));
    }

    #[tokio::test]
    async fn test_unknown_keys_ignored_and_defaults_filled() {
        let entry = entry(spec_with_params(), Arc::new(EchoArgs));
        let result = invoke(
            &entry,
            &raw(json!({"owner": "alice", "index": 7.0, "surprise": true})),
            &ExecutionContext::default(),
        )
        .await;

        assert!(!result.is_error);
        let payload: Value =
            serde_json::from_str(&result.text_parts().collect::<String>()).unwrap();
        assert_eq!(payload["owner"], "alice");
        assert_eq!(payload["index"], 7);
        assert_eq!(payload["limit"], 20, "default must be filled");
    }

    #[tokio::test]
    async fn test_handler_error_becomes_error_result() {
        let entry = entry(ToolSpec::new("failing", ""), Arc::new(FailingHandler));
        let result = invoke(&entry, &HashMap::new(), &ExecutionContext::default()).await;
        assert!(result.is_error);
        assert!(result
            .text_parts()
            .collect::<String>()
            .contains("502 Bad Gateway"));
    }

    #[tokio::test]
    async fn test_handler_panic_recovered_and_engine_stays_usable() {
        let registry = ToolRegistry::new();
        registry.register(ToolSpec::new("panics", ""), Arc::new(PanickingHandler), "test");
        registry.register(
            ToolSpec::new("fine", ""),
            Arc::new(CountingHandler(Arc::new(AtomicUsize::new(0)))),
            "test",
        );

        let panicking = registry.lookup("panics").unwrap();
        let result = invoke(&panicking, &HashMap::new(), &ExecutionContext::default()).await;
        assert!(result.is_error);
        let text = result.text_parts().collect::<String>();
        assert!(text.contains("tool execution failed"), "{text}");
        assert!(text.contains("boom"), "{text}");

        // Subsequent invocations through the same registry still work.
        let fine = registry.lookup("fine").unwrap();
        let result = invoke(&fine, &HashMap::new(), &ExecutionContext::default()).await;
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_plain_string_payload_rendered_verbatim() {
        struct Hello;

        #[async_trait]
        impl ToolHandler for Hello {
            async fn call(
                &self,
                _args: Arguments,
                _ctx: &ExecutionContext,
            ) -> Result<Value, ToolError> {
                Ok(Value::String("hi".to_string()))
            }
        }

        let entry = entry(ToolSpec::new("hello", ""), Arc::new(Hello));
        let result = invoke(&entry, &HashMap::new(), &ExecutionContext::default()).await;
        assert_eq!(result.text_parts().collect::<String>(), "hi");
    }
}
