//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Jsont.
//! The Jsont project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Accessor Module
//!
//! Compiles dotted/bracketed data paths such as `user.likes[0]` into a
//! reusable reader. Resolution never fails: any missing link, `null`, or
//! non-traversable intermediate resolves to `null`.
//!
//! ```rust
//! use jsont::accessor::JtAccessor;
//! use serde_json::json;
//!
//! let accessor = JtAccessor::parse("a.b[1]");
//! assert_eq!(accessor.resolve(&json!({"a": {"b": [1, 2]}})), json!(2));
//! assert_eq!(accessor.resolve(&json!({"a": {}})), json!(null));
//! ```

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn bracket_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\[\s*(?:"([^"]*)"|'([^']*)'|([^\]]*?))\s*\]"#)
            .expect("static bracket pattern")
    })
}

/// Compiled data path reader used for the first stage of a pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JtAccessor {
    segments: Vec<String>,
}

impl JtAccessor {
    /// Normalizes bracket indices (`a[0]` becomes `a.0`) and splits the
    /// path into keys. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        let normalized = bracket_pattern().replace_all(path.trim(), |caps: &regex::Captures| {
            let inner = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or("");
            format!(".{}", inner)
        });

        let segments = normalized
            .split('.')
            .map(|segment| segment.trim().to_string())
            .filter(|segment| !segment.is_empty())
            .collect();

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Borrowing lookup; `None` on the first missing link.
    pub fn lookup<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        if self.segments.is_empty() {
            return None;
        }

        let mut current = data;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Reads the value at this path, yielding `null` when any link is
    /// missing.
    pub fn resolve(&self, data: &Value) -> Value {
        self.lookup(data).cloned().unwrap_or(Value::Null)
    }
}
