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

//! # Jsont Engine Module
//!
//! [`Jsont`] is the entry point: it owns the helper registry, the render
//! configuration and the registered partials, and turns template documents
//! into [`JtTemplate`]s.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jsont::Jsont;
//! use serde_json::json;
//!
//! # async fn demo() -> jsont::Result<()> {
//! let mut engine = Jsont::new();
//! engine.use_sync("double", |v, _| Ok(json!(v.as_f64().unwrap_or(0.0) * 2.0)));
//!
//! let template = engine.compile(json!({"v": "`x | double`"}), json!({}));
//! let out = template.render(json!({"x": 3})).await?;
//! assert_eq!(out, json!({"v": 6.0}));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::batch::{JtBatchProgress, JtProgressObserver};
use crate::config::JtRenderConfig;
use crate::context::{JtPartials, JtRenderContext};
use crate::dsl::compiler::JtTemplateCompiler;
use crate::errors::Result;
use crate::helper::{JtFnHelper, JtHelper, JtSyncHelper};
use crate::registry::JtHelperRegistry;
use crate::template::JtTemplate;

/// Template engine instance.
#[derive(Default)]
pub struct Jsont {
    compiler: JtTemplateCompiler,
    helpers: JtHelperRegistry,
    partials: JtPartials,
    config: JtRenderConfig,
    observer: Option<JtProgressObserver>,
}

impl Jsont {
    /// Creates an engine with the built-in helpers registered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: JtRenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &JtRenderConfig {
        &self.config
    }

    pub fn helpers(&self) -> &JtHelperRegistry {
        &self.helpers
    }

    /// Registers a helper, replacing any earlier helper of the same name and
    /// shadowing a default.
    pub fn use_helper(&mut self, name: impl Into<String>, helper: impl JtHelper + 'static) -> &mut Self {
        self.helpers.register(name, helper);
        self
    }

    /// Registers an async closure as a helper.
    pub fn use_fn<F, Fut>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(Value, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.use_helper(name, JtFnHelper::new(func))
    }

    /// Registers a closure that never suspends as a helper.
    pub fn use_sync<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(Value, &[String]) -> Result<Value> + Send + Sync + 'static,
    {
        self.use_helper(name, JtSyncHelper::new(func))
    }

    /// Applies a registration function, typically one that adds a family of
    /// related helpers.
    pub fn plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Jsont),
    {
        plugin(self);
        self
    }

    /// Sets a callback that observes every completed binding and `map`
    /// element.
    pub fn on_progress<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&JtBatchProgress) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Makes `template` available to the `partial:<name>` helper of templates
    /// compiled afterwards.
    pub fn register_partial(&mut self, name: impl Into<String>, template: JtTemplate) -> &mut Self {
        self.partials.insert(name.into(), template);
        self
    }

    /// Compiles a template document. `options` are handed unchanged to every
    /// helper invocation.
    pub fn compile(&self, template: Value, options: Value) -> JtTemplate {
        let compiled = self.compiler.compile(template);
        log::info!(
            "jsont.compile.done: template compiled - bindings={}, helpers={}, partials={}",
            compiled.bindings.len(),
            self.helpers.names().len(),
            self.partials.len()
        );

        let context = JtRenderContext::new(self.helpers.clone(), options)
            .with_config(self.config.clone())
            .with_partials(Arc::new(self.partials.clone()))
            .with_observer(self.observer.clone());
        JtTemplate::new(compiled, context)
    }

    /// Parses template text as JSON and compiles it.
    pub fn compile_str(&self, source: &str, options: Value) -> Result<JtTemplate> {
        let template: Value = serde_json::from_str(source)?;
        Ok(self.compile(template, options))
    }

    /// Compiles and renders in one call; `data` doubles as the compile
    /// options.
    pub async fn render(&self, template: Value, data: Value) -> Result<Value> {
        self.compile(template, data.clone()).render(data).await
    }

    /// Loads a template file and renders it.
    pub async fn render_file(&self, path: impl AsRef<Path>, data: Value) -> Result<Value> {
        let template = Self::load_template_file(path)?;
        self.render(template, data).await
    }

    /// Reads a template document. Files ending in `.yaml` or `.yml` are read
    /// as YAML, anything else as JSON.
    pub fn load_template_file(path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        log::debug!(
            "jsont.engine.load: template file read - path={}, yaml={}",
            path.display(),
            is_yaml
        );

        if is_yaml {
            Ok(serde_yaml::from_str(&text)?)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

impl fmt::Debug for Jsont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut partials: Vec<&String> = self.partials.keys().collect();
        partials.sort();
        f.debug_struct("Jsont")
            .field("helpers", &self.helpers)
            .field("partials", &partials)
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
