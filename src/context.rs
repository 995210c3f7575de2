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

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::batch::JtProgressObserver;
use crate::config::JtRenderConfig;
use crate::helper::JtHelperRef;
use crate::registry::JtHelperRegistry;
use crate::template::JtTemplate;

/// Named sub-templates available to the `partial` helper.
pub type JtPartials = HashMap<String, JtTemplate>;

/// Read-only environment shared by every render of one compiled template.
///
/// Nothing in here changes while a render runs; template-level helper
/// registration copies the context before modifying it.
#[derive(Clone)]
pub struct JtRenderContext {
    helpers: JtHelperRegistry,
    options: Arc<Value>,
    config: JtRenderConfig,
    partials: Arc<JtPartials>,
    observer: Option<JtProgressObserver>,
}

impl JtRenderContext {
    pub fn new(helpers: JtHelperRegistry, options: Value) -> Self {
        Self {
            helpers,
            options: Arc::new(options),
            config: JtRenderConfig::default(),
            partials: Arc::new(HashMap::new()),
            observer: None,
        }
    }

    pub fn with_config(mut self, config: JtRenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_partials(mut self, partials: Arc<JtPartials>) -> Self {
        self.partials = partials;
        self
    }

    pub fn with_observer(mut self, observer: Option<JtProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn helpers(&self) -> &JtHelperRegistry {
        &self.helpers
    }

    pub fn helpers_mut(&mut self) -> &mut JtHelperRegistry {
        &mut self.helpers
    }

    /// Lazy lookup performed when a helper stage runs.
    pub fn resolve_helper(&self, name: &str) -> Option<JtHelperRef> {
        self.helpers.get(name)
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    pub fn config(&self) -> &JtRenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut JtRenderConfig {
        &mut self.config
    }

    pub fn partial(&self, name: &str) -> Option<&JtTemplate> {
        self.partials.get(name)
    }

    pub fn observer(&self) -> Option<&JtProgressObserver> {
        self.observer.as_ref()
    }
}

impl fmt::Debug for JtRenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JtRenderContext")
            .field("helpers", &self.helpers)
            .field("options", &self.options)
            .field("config", &self.config)
            .field("partials", &self.partials.keys().collect::<Vec<_>>())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
