//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Jsont.
//! The Jsont project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::sync::OnceLock;

use regex::Regex;

use crate::dsl::ir::JtStageDescriptor;

fn expression_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^`(.+)`$").expect("static expression pattern"))
}

fn pipe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" *\| *").expect("static pipe pattern"))
}

fn argument_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""([^"]*)"|'([^']*)'|([^ \t,]+)"#).expect("static argument pattern")
    })
}

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^'(.+)'$").expect("static literal pattern"))
}

/// Splits pipeline expressions into ordered stage descriptors.
///
/// Parsing never fails. A garbled stage simply ends up with an empty or
/// unknown name and is reported when the binding runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct JtPipelineParser;

impl JtPipelineParser {
    pub fn new() -> Self {
        Self
    }

    /// Returns the pipeline text when the whole string is a backtick
    /// delimited expression.
    pub fn extract_expression(value: &str) -> Option<&str> {
        expression_pattern()
            .captures(value)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Returns the constant when a first-stage name is single-quoted.
    pub fn literal_text(name: &str) -> Option<&str> {
        literal_pattern()
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Parses `a.b | helper:x,"y z" | other` into its descriptors.
    pub fn parse(&self, expression: &str) -> Vec<JtStageDescriptor> {
        pipe_pattern()
            .split(expression)
            .map(|call| {
                let mut parts = call.split(':');
                let name = parts.next().unwrap_or("").trim().to_string();
                let rest = parts.collect::<Vec<_>>().join(":");
                JtStageDescriptor::new(name, self.parse_args(&rest))
            })
            .collect()
    }

    /// Quote-aware tokenizer: quoted substrings stay intact, everything
    /// else splits on whitespace and commas.
    pub fn parse_args(&self, source: &str) -> Vec<String> {
        argument_pattern()
            .captures_iter(source)
            .filter_map(|caps| {
                caps.get(2)
                    .or_else(|| caps.get(1))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str().to_string())
            })
            .collect()
    }
}
