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

use serde_json::Value;

use crate::accessor::JtAccessor;
use crate::dsl::ir::{JtBinding, JtStage, JtStageDescriptor};
use crate::dsl::parser::JtPipelineParser;
use crate::errors::Result;
use crate::path::JtPath;

/// Output of a single template scan.
#[derive(Clone, Debug)]
pub struct JtCompiledTemplate {
    /// The original template, used only as a cloning source.
    pub skeleton: Value,
    pub bindings: Vec<JtBinding>,
}

/// Walks a template once and turns every expression leaf into a binding.
#[derive(Debug, Default)]
pub struct JtTemplateCompiler {
    parser: JtPipelineParser,
}

impl JtTemplateCompiler {
    pub fn new() -> Self {
        Self {
            parser: JtPipelineParser::new(),
        }
    }

    /// Parses template text and compiles it. Malformed JSON is fatal.
    pub fn compile_str(&self, source: &str) -> Result<JtCompiledTemplate> {
        let template: Value = serde_json::from_str(source)?;
        Ok(self.compile(template))
    }

    /// Depth-first scan; containers are recursed, string leaves matching the
    /// expression pattern become bindings and every other leaf is kept as is.
    pub fn compile(&self, template: Value) -> JtCompiledTemplate {
        let mut bindings = Vec::new();
        self.scan(&template, JtPath::root(), &mut bindings);

        JtCompiledTemplate {
            skeleton: template,
            bindings,
        }
    }

    /// Only containers are iterated, so a template that is itself a bare
    /// string has no bindings and renders unchanged.
    fn scan(&self, node: &Value, path: JtPath, bindings: &mut Vec<JtBinding>) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    self.visit(value, path.child(key.as_str()), bindings);
                }
            }
            Value::Array(items) => {
                for (index, value) in items.iter().enumerate() {
                    self.visit(value, path.child(index), bindings);
                }
            }
            _ => {}
        }
    }

    fn visit(&self, value: &Value, path: JtPath, bindings: &mut Vec<JtBinding>) {
        match value {
            Value::String(text) => {
                if let Some(binding) = self.compile_leaf(text, path) {
                    bindings.push(binding);
                }
            }
            Value::Object(_) | Value::Array(_) => self.scan(value, path, bindings),
            _ => {}
        }
    }

    /// Builds the binding for one leaf, or `None` when the string is plain
    /// text.
    pub fn compile_leaf(&self, text: &str, path: JtPath) -> Option<JtBinding> {
        let expression = JtPipelineParser::extract_expression(text)?;
        let descriptors = self.parser.parse(expression);
        let stages = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| {
                if index == 0 {
                    Self::first_stage(descriptor)
                } else {
                    JtStage::Helper {
                        name: descriptor.name,
                        args: descriptor.args,
                    }
                }
            })
            .collect();

        Some(JtBinding::new(path, expression, stages))
    }

    fn first_stage(descriptor: JtStageDescriptor) -> JtStage {
        match JtPipelineParser::literal_text(&descriptor.name) {
            Some(text) => JtStage::Literal(Value::String(text.to_string())),
            None => JtStage::Accessor(JtAccessor::parse(&descriptor.name)),
        }
    }
}
