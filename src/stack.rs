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

//! # Stack Executor Module
//!
//! Runs one binding's stage chain, strictly in order, over an index range of
//! the binding's immutable stage list. The first error aborts the chain; a
//! panicking helper is caught and reported the same way as a returned error.

use std::any::Any;
use std::ops::Range;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::context::JtRenderContext;
use crate::dsl::ir::{JtBinding, JtStage};
use crate::errors::{JtError, Result};
use crate::helper::{JtFlow, JtHelperContext};

/// Sequential executor for stage chains.
#[derive(Debug, Default, Clone, Copy)]
pub struct JtStackExecutor;

impl JtStackExecutor {
    /// Runs a whole binding against the render's data object.
    ///
    /// The first stage reads `data` by reference; later stages only ever see
    /// derived values.
    pub fn run_binding(
        render: Arc<JtRenderContext>,
        binding: Arc<JtBinding>,
        data: Arc<Value>,
    ) -> BoxFuture<'static, Result<Value>> {
        async move {
            let end = binding.stages.len();
            let initial = match binding.stages.first() {
                Some(JtStage::Literal(value)) => value.clone(),
                Some(JtStage::Accessor(accessor)) => accessor.resolve(&data),
                Some(JtStage::Helper { name, .. }) => {
                    return Err(JtError::internal(format!(
                        "binding at {} starts with helper '{}'",
                        binding.path, name
                    )));
                }
                None => return Ok((*data).clone()),
            };
            if end > 1 && render.config().yield_between_stages {
                tokio::task::yield_now().await;
            }
            Self::run(render, binding, 1..end, initial).await
        }
        .boxed()
    }

    /// Runs `range` of the binding's stages starting from `input`.
    ///
    /// The returned future is boxed because helpers such as `map` re-enter
    /// the executor for their sub-chains.
    pub fn run(
        render: Arc<JtRenderContext>,
        binding: Arc<JtBinding>,
        range: Range<usize>,
        input: Value,
    ) -> BoxFuture<'static, Result<Value>> {
        async move {
            let end = range.end.min(binding.stages.len());
            let mut cursor = range.start;
            let mut value = input;

            while cursor < end {
                let flow = Self::step(&render, &binding, cursor, end, value).await?;
                match flow {
                    JtFlow::Next(next) => {
                        value = next;
                        cursor += 1;
                    }
                    JtFlow::Skip { value: next, stages } => {
                        value = next;
                        cursor = cursor.saturating_add(1).saturating_add(stages);
                    }
                    JtFlow::Exit(result) => {
                        log::debug!(
                            "jsont.stack.exit: chain exited early - path={}, stage={}",
                            binding.path,
                            cursor
                        );
                        return Ok(result);
                    }
                }

                if cursor < end && render.config().yield_between_stages {
                    tokio::task::yield_now().await;
                }
            }

            Ok(value)
        }
        .boxed()
    }

    async fn step(
        render: &Arc<JtRenderContext>,
        binding: &Arc<JtBinding>,
        cursor: usize,
        end: usize,
        input: Value,
    ) -> Result<JtFlow> {
        match &binding.stages[cursor] {
            JtStage::Literal(value) => Ok(JtFlow::Next(value.clone())),
            JtStage::Accessor(accessor) => Ok(JtFlow::Next(accessor.resolve(&input))),
            JtStage::Helper { name, args } => {
                let helper = render.resolve_helper(name).ok_or_else(|| JtError::InvalidHelper {
                    helper: name.clone(),
                    path: binding.path.to_string(),
                })?;

                let ctx = JtHelperContext::new(render.clone(), binding.clone(), cursor, end);
                let outcome = AssertUnwindSafe(helper.call(input, args, &ctx))
                    .catch_unwind()
                    .await;

                match outcome {
                    Ok(Ok(flow)) => Ok(flow),
                    Ok(Err(err)) if err.has_stage_context() => Err(err),
                    Ok(Err(err)) => Err(JtError::helper(
                        name.clone(),
                        binding.path.to_string(),
                        err.to_string(),
                    )),
                    Err(panic) => Err(JtError::Panic {
                        path: binding.path.to_string(),
                        message: panic_message(panic.as_ref()),
                    }),
                }
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
