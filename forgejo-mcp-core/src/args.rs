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

//! Tagged argument values.
//!
//! The wire format delivers arguments as an untyped JSON object; handlers
//! consume a validated [`Arguments`] map whose values are already coerced to
//! the declared parameter kinds, so no handler ever needs an unchecked type
//! assertion on a raw JSON value.

use crate::tool_spec::ParamKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A scalar argument value after wire decode.
///
/// JSON objects and arrays are not representable here on purpose: no tool in
/// the catalog takes structured arguments directly, they take JSON-encoded
/// strings where needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl ArgValue {
    /// Decode one JSON value. Objects and arrays yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ArgValue::Str(s.clone())),
            Value::Number(n) => n.as_f64().map(ArgValue::Num),
            Value::Bool(b) => Some(ArgValue::Bool(*b)),
            Value::Null => Some(ArgValue::Null),
            Value::Object(_) | Value::Array(_) => None,
        }
    }

    /// Whether this value satisfies the declared kind. `Null` counts as
    /// absent, never as a kind match.
    pub fn matches_kind(&self, kind: ParamKind) -> bool {
        matches!(
            (self, kind),
            (ArgValue::Str(_), ParamKind::String)
                | (ArgValue::Num(_), ParamKind::Number)
                | (ArgValue::Bool(_), ParamKind::Boolean)
        )
    }
}

/// Validated, coerced arguments handed to a handler.
///
/// Only declared parameters appear here; unknown wire keys are dropped during
/// validation and `Null` values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: HashMap<String, ArgValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Num(n)) => Some(*n),
            _ => None,
        }
    }

    /// Numbers arrive as doubles on the wire; integer-valued parameters are
    /// obtained by truncation.
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.f64(name).map(|n| n as i64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            ArgValue::from_json(&json!("main")),
            Some(ArgValue::Str("main".to_string()))
        );
        assert_eq!(ArgValue::from_json(&json!(3.0)), Some(ArgValue::Num(3.0)));
        assert_eq!(ArgValue::from_json(&json!(true)), Some(ArgValue::Bool(true)));
        assert_eq!(ArgValue::from_json(&json!(null)), Some(ArgValue::Null));
        assert_eq!(ArgValue::from_json(&json!({"a": 1})), None);
        assert_eq!(ArgValue::from_json(&json!([1, 2])), None);
    }

    #[test]
    fn test_kind_matching() {
        assert!(ArgValue::Str("x".into()).matches_kind(ParamKind::String));
        assert!(ArgValue::Num(1.0).matches_kind(ParamKind::Number));
        assert!(ArgValue::Bool(false).matches_kind(ParamKind::Boolean));
        assert!(!ArgValue::Num(1.0).matches_kind(ParamKind::String));
        assert!(!ArgValue::Null.matches_kind(ParamKind::String));
        assert!(!ArgValue::Null.matches_kind(ParamKind::Number));
    }

    #[test]
    fn test_i64_truncates_double() {
        let mut args = Arguments::new();
        args.insert("index", ArgValue::Num(7.9));
        assert_eq!(args.i64("index"), Some(7));
        assert_eq!(args.f64("index"), Some(7.9));
    }

    #[test]
    fn test_typed_accessors_reject_wrong_kind() {
        let mut args = Arguments::new();
        args.insert("owner", ArgValue::Str("alice".into()));
        assert_eq!(args.str("owner"), Some("alice"));
        assert_eq!(args.i64("owner"), None);
        assert_eq!(args.bool("owner"), None);
        assert_eq!(args.str("absent"), None);
    }
}
