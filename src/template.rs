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

//! # Template Module
//!
//! A [`JtTemplate`] is the callable result of compiling a template: the
//! read-only skeleton and bindings, plus the render context (helpers,
//! options, configuration and partials) they run with. Cloning a template
//! is cheap and clones share the compiled source.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::config::JtRenderConfig;
use crate::context::JtRenderContext;
use crate::dsl::compiler::JtCompiledTemplate;
use crate::dsl::ir::JtBinding;
use crate::errors::Result;
use crate::helper::{JtFnHelper, JtHelper, JtSyncHelper};
use crate::render::{JtRenderJob, JtSettledRender};

#[derive(Debug)]
struct JtTemplateSource {
    skeleton: Value,
    bindings: Vec<Arc<JtBinding>>,
}

/// Compiled, renderable template.
#[derive(Clone, Debug)]
pub struct JtTemplate {
    source: Arc<JtTemplateSource>,
    context: Arc<JtRenderContext>,
}

impl JtTemplate {
    pub fn new(compiled: JtCompiledTemplate, context: JtRenderContext) -> Self {
        let JtCompiledTemplate { skeleton, bindings } = compiled;
        Self {
            source: Arc::new(JtTemplateSource {
                skeleton,
                bindings: bindings.into_iter().map(Arc::new).collect(),
            }),
            context: Arc::new(context),
        }
    }

    /// Registers a helper on this template only. It shadows engine helpers
    /// and defaults of the same name.
    pub fn use_helper(&mut self, name: impl Into<String>, helper: impl JtHelper + 'static) -> &mut Self {
        Arc::make_mut(&mut self.context)
            .helpers_mut()
            .register(name, helper);
        self
    }

    pub fn use_fn<F, Fut>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(Value, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.use_helper(name, JtFnHelper::new(func))
    }

    pub fn use_sync<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(Value, &[String]) -> Result<Value> + Send + Sync + 'static,
    {
        self.use_helper(name, JtSyncHelper::new(func))
    }

    pub fn with_config(mut self, config: JtRenderConfig) -> Self {
        *Arc::make_mut(&mut self.context).config_mut() = config;
        self
    }

    pub fn bindings(&self) -> &[Arc<JtBinding>] {
        &self.source.bindings
    }

    pub fn skeleton(&self) -> &Value {
        &self.source.skeleton
    }

    pub fn options(&self) -> &Value {
        self.context.options()
    }

    pub fn context(&self) -> &JtRenderContext {
        &self.context
    }

    /// Renders against `data`. The first failing binding fails the render
    /// and no output is produced.
    pub async fn render(&self, data: Value) -> Result<Value> {
        self.job().run(data).await
    }

    /// Renders against `data`, waiting for every binding and reporting each
    /// outcome separately.
    pub async fn render_settled(&self, data: Value) -> JtSettledRender {
        self.job().settle(data).await
    }

    fn job(&self) -> JtRenderJob<'_> {
        JtRenderJob {
            context: &self.context,
            skeleton: &self.source.skeleton,
            bindings: &self.source.bindings,
        }
    }
}
