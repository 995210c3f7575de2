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

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Render-time scheduling knobs.
///
/// ```yaml
/// concurrency: 4
/// map_concurrency: 16
/// yield_between_stages: true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JtRenderConfig {
    /// Maximum bindings running at once per render; `None` is unbounded.
    pub concurrency: Option<usize>,
    /// Maximum collection elements running at once inside one `map`.
    pub map_concurrency: Option<usize>,
    /// Defer to the scheduler between stages of a chain.
    pub yield_between_stages: bool,
}

impl Default for JtRenderConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            map_concurrency: None,
            yield_between_stages: true,
        }
    }
}

impl JtRenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn concurrency(mut self, max: usize) -> Self {
        self.concurrency = Some(max);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.concurrency = None;
        self
    }

    pub fn map_concurrency(mut self, max: usize) -> Self {
        self.map_concurrency = Some(max);
        self
    }

    pub fn yield_between_stages(mut self, enabled: bool) -> Self {
        self.yield_between_stages = enabled;
        self
    }
}
