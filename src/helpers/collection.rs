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

//! Collection helpers: `map` and the `reduce`/`collect` boundary stages.
//!
//! `map` consumes part of the chain it appears in. It looks ahead for the
//! first boundary stage, runs the stages before it once per element of the
//! input collection, and then either hands the same-shaped aggregate to the
//! boundary (which passes it on unchanged) or, when no boundary exists,
//! ends the chain with the aggregate as its result.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::batch::JtBatch;
use crate::errors::{JtError, Result};
use crate::helper::{JtFlow, JtHelper, JtHelperContext};
use crate::helpers::is_boundary;
use crate::render::value_kind;

/// Fans the rest of the chain out over a collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct JtMapHelper;

/// Identity stage. Only meaningful as a marker for `map`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JtPassThroughHelper;

#[async_trait]
impl JtHelper for JtPassThroughHelper {
    async fn call(&self, input: Value, _args: &[String], _ctx: &JtHelperContext) -> Result<JtFlow> {
        Ok(JtFlow::Next(input))
    }
}

#[async_trait]
impl JtHelper for JtMapHelper {
    async fn call(&self, input: Value, _args: &[String], ctx: &JtHelperContext) -> Result<JtFlow> {
        let remaining = ctx.remaining();
        let boundary = remaining
            .iter()
            .position(|stage| stage.helper_name().map_or(false, is_boundary));
        let sub_len = boundary.unwrap_or(remaining.len());

        let render = ctx.render_context();
        let mut batch = JtBatch::new(format!("map:{}", ctx.path()))
            .concurrency(render.config().map_concurrency)
            .on_progress(render.observer().cloned());

        let aggregate = match input {
            Value::Array(items) => {
                for item in items {
                    let element_ctx = ctx.clone();
                    batch.push(async move { element_ctx.run_remaining(sub_len, item).await });
                }
                Value::Array(batch.end().await?)
            }
            Value::Object(entries) => {
                let mut keys = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    keys.push(key);
                    let element_ctx = ctx.clone();
                    batch.push(async move { element_ctx.run_remaining(sub_len, item).await });
                }
                let values = batch.end().await?;
                Value::Object(keys.into_iter().zip(values).collect::<Map<String, Value>>())
            }
            other => {
                return Err(JtError::validation(format!(
                    "Incompatible type for `map`: {}",
                    value_kind(&other)
                )));
            }
        };

        log::debug!(
            "jsont.map.join: elements joined - path={}, sub_stages={}, boundary={}",
            ctx.path(),
            sub_len,
            boundary.is_some()
        );

        Ok(match boundary {
            Some(stages) => JtFlow::Skip {
                value: aggregate,
                stages,
            },
            None => JtFlow::Exit(aggregate),
        })
    }
}
