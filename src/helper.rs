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

//! # Jsont Helper Module
//!
//! Helpers are the named, possibly asynchronous transformation steps that
//! make up every stage after the first one in a pipeline. A helper receives
//! the upstream value, the literal arguments written in the template, and an
//! execution context for the binding it runs in.
//!
//! ## Implementing Helpers
//!
//! Most helpers are plain closures registered through
//! [`Jsont::use_fn`](crate::engine::Jsont::use_fn) or
//! [`Jsont::use_sync`](crate::engine::Jsont::use_sync). Helpers that need to
//! steer the chain (like the built-in `map`) implement [`JtHelper`] and
//! return a [`JtFlow`] other than `Next`.
//!
//! ```rust
//! use async_trait::async_trait;
//! use jsont::errors::Result;
//! use jsont::helper::{JtFlow, JtHelper, JtHelperContext};
//! use serde_json::{json, Value};
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl JtHelper for Greet {
//!     async fn call(&self, input: Value, args: &[String], _ctx: &JtHelperContext) -> Result<JtFlow> {
//!         let greeting = args.first().map(String::as_str).unwrap_or("hello");
//!         Ok(json!(format!("{}, {}", greeting, input.as_str().unwrap_or(""))).into())
//!     }
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::context::JtRenderContext;
use crate::dsl::ir::{JtBinding, JtStage};
use crate::errors::Result;
use crate::path::JtPath;
use crate::stack::JtStackExecutor;
use crate::template::JtTemplate;

/// What the executor does after a helper returns.
#[derive(Clone, Debug, PartialEq)]
pub enum JtFlow {
    /// Continue with the next stage.
    Next(Value),
    /// Continue after skipping the given number of following stages.
    Skip { value: Value, stages: usize },
    /// Stop the current chain; the value is the chain's result.
    Exit(Value),
}

impl From<Value> for JtFlow {
    fn from(value: Value) -> Self {
        JtFlow::Next(value)
    }
}

/// Contract every helper fulfills.
#[async_trait]
pub trait JtHelper: Send + Sync {
    /// Transforms `input`. `args` are the literal strings from the template;
    /// the engine performs no type coercion on them.
    async fn call(&self, input: Value, args: &[String], ctx: &JtHelperContext) -> Result<JtFlow>;
}

/// Shared, type-erased helper handle.
pub type JtHelperRef = Arc<dyn JtHelper>;

/// Execution context handed to a helper invocation.
///
/// The context is an immutable value: it names the binding, the position of
/// the running stage, and the end of the stage range the current executor
/// owns. Nested executors get their own context.
#[derive(Clone)]
pub struct JtHelperContext {
    render: Arc<JtRenderContext>,
    binding: Arc<JtBinding>,
    cursor: usize,
    end: usize,
}

impl JtHelperContext {
    pub(crate) fn new(
        render: Arc<JtRenderContext>,
        binding: Arc<JtBinding>,
        cursor: usize,
        end: usize,
    ) -> Self {
        Self {
            render,
            binding,
            cursor,
            end,
        }
    }

    /// Target path of the binding this helper runs for.
    pub fn path(&self) -> &JtPath {
        &self.binding.path
    }

    /// Compile-time options, forwarded unchanged.
    pub fn options(&self) -> &Value {
        self.render.options()
    }

    pub fn render_context(&self) -> &Arc<JtRenderContext> {
        &self.render
    }

    /// Stages after the running one, up to the end of the current range.
    pub fn remaining(&self) -> &[JtStage] {
        let start = (self.cursor + 1).min(self.end);
        &self.binding.stages[start..self.end]
    }

    /// Looks up a partial registered on the engine.
    pub fn partial(&self, name: &str) -> Option<&JtTemplate> {
        self.render.partial(name)
    }

    /// Runs the first `count` remaining stages on `input` through a fresh
    /// executor and returns the sub-chain's result.
    pub async fn run_remaining(&self, count: usize, input: Value) -> Result<Value> {
        let start = (self.cursor + 1).min(self.end);
        let end = (start + count).min(self.end);
        JtStackExecutor::run(self.render.clone(), self.binding.clone(), start..end, input).await
    }
}

/// Adapter turning an async closure into a helper.
pub struct JtFnHelper<F, Fut> {
    func: F,
    _marker: PhantomData<fn() -> Fut>,
}

impl<F, Fut> JtFnHelper<F, Fut>
where
    F: Fn(Value, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> JtHelper for JtFnHelper<F, Fut>
where
    F: Fn(Value, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    async fn call(&self, input: Value, args: &[String], _ctx: &JtHelperContext) -> Result<JtFlow> {
        (self.func)(input, args.to_vec()).await.map(JtFlow::Next)
    }
}

/// Adapter for helpers that finish without suspending.
pub struct JtSyncHelper<F> {
    func: F,
}

impl<F> JtSyncHelper<F>
where
    F: Fn(Value, &[String]) -> Result<Value> + Send + Sync + 'static,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> JtHelper for JtSyncHelper<F>
where
    F: Fn(Value, &[String]) -> Result<Value> + Send + Sync + 'static,
{
    async fn call(&self, input: Value, args: &[String], _ctx: &JtHelperContext) -> Result<JtFlow> {
        (self.func)(input, args).map(JtFlow::Next)
    }
}
