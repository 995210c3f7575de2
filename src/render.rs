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

//! # Render Module
//!
//! Runs every binding of a compiled template against one data object and
//! writes the results into a fresh copy of the skeleton.
//!
//! Bindings run as independent tasks through [`JtBatch`]. Writes happen once
//! the join has finished; binding paths are pairwise disjoint, so the order
//! of writes never matters.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::batch::JtBatch;
use crate::context::JtRenderContext;
use crate::dsl::ir::JtBinding;
use crate::errors::{JtError, Result};
use crate::path::{JtPath, JtPathKey};
use crate::stack::JtStackExecutor;

/// Per-binding outcome of a collect-all render, indexed like the template's
/// bindings.
#[derive(Debug)]
pub struct JtSettledRender {
    pub errors: Vec<Option<JtError>>,
    pub results: Vec<Option<Value>>,
}

impl JtSettledRender {
    pub fn is_clean(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }

    pub fn first_error(&self) -> Option<&JtError> {
        self.errors.iter().flatten().next()
    }
}

/// Writes resolved values into a document.
///
/// Every intermediate container on the path must already exist; nothing is
/// created on the way down.
#[derive(Debug, Default, Clone, Copy)]
pub struct JtOutputAssembler;

impl JtOutputAssembler {
    /// Sets `value` at `path`. The root path replaces the whole document and
    /// an array index equal to the array length appends.
    pub fn set(document: &mut Value, path: &JtPath, value: Value) -> Result<()> {
        let Some((last, parents)) = path.keys().split_last() else {
            *document = value;
            return Ok(());
        };

        let mut node = document;
        for key in parents {
            let child = match node {
                Value::Object(map) => match key {
                    JtPathKey::Key(name) => map.get_mut(name),
                    JtPathKey::Index(_) => None,
                },
                Value::Array(items) => match key {
                    JtPathKey::Index(index) => items.get_mut(*index),
                    JtPathKey::Key(_) => None,
                },
                _ => None,
            };
            node = child.ok_or_else(|| {
                JtError::assemble(path.to_string(), format!("missing container at {}", key))
            })?;
        }

        match node {
            Value::Object(map) => match last {
                JtPathKey::Key(name) => {
                    map.insert(name.clone(), value);
                    Ok(())
                }
                JtPathKey::Index(index) => Err(JtError::assemble(
                    path.to_string(),
                    format!("cannot write index {} into object", index),
                )),
            },
            Value::Array(items) => match last {
                JtPathKey::Index(index) if *index < items.len() => {
                    items[*index] = value;
                    Ok(())
                }
                JtPathKey::Index(index) if *index == items.len() => {
                    items.push(value);
                    Ok(())
                }
                key => Err(JtError::assemble(
                    path.to_string(),
                    format!("cannot write key {} into array of length {}", key, items.len()),
                )),
            },
            other => Err(JtError::assemble(
                path.to_string(),
                format!("cannot write into {}", value_kind(other)),
            )),
        }
    }
}

/// JSON type name used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One render of a compiled template.
pub(crate) struct JtRenderJob<'a> {
    pub context: &'a Arc<JtRenderContext>,
    pub skeleton: &'a Value,
    pub bindings: &'a [Arc<JtBinding>],
}

impl JtRenderJob<'_> {
    fn batch(&self, data: Value) -> JtBatch<Value> {
        let data = Arc::new(data);
        let mut batch = JtBatch::new("render")
            .concurrency(self.context.config().concurrency)
            .on_progress(self.context.observer().cloned());
        for binding in self.bindings {
            batch.push(JtStackExecutor::run_binding(
                self.context.clone(),
                binding.clone(),
                data.clone(),
            ));
        }
        batch
    }

    /// Abort-on-first render. Any binding error discards the whole output.
    pub async fn run(&self, data: Value) -> Result<Value> {
        let started = Instant::now();
        log::debug!(
            "jsont.render.start: rendering template - bindings={}",
            self.bindings.len()
        );

        let values = self.batch(data).end().await.map_err(|err| {
            log::warn!("jsont.render.failed: binding failed - error={}", err);
            err
        })?;

        let mut document = self.skeleton.clone();
        for (binding, value) in self.bindings.iter().zip(values) {
            JtOutputAssembler::set(&mut document, &binding.path, value)?;
        }

        log::debug!(
            "jsont.render.finish: template rendered - bindings={}, duration_ms={}",
            self.bindings.len(),
            started.elapsed().as_millis()
        );
        Ok(document)
    }

    /// Collect-all render. Every binding runs to completion.
    pub async fn settle(&self, data: Value) -> JtSettledRender {
        let settled = self.batch(data).settle().await;
        for (binding, error) in self.bindings.iter().zip(&settled.errors) {
            if let Some(error) = error {
                log::warn!(
                    "jsont.render.failed: binding failed - path={}, error={}",
                    binding.path,
                    error
                );
            }
        }
        JtSettledRender {
            errors: settled.errors,
            results: settled.results,
        }
    }
}
