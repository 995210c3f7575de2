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

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accessor::JtAccessor;
use crate::path::JtPath;

/// One `name[:arg,...]` segment of a pipeline expression, as parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JtStageDescriptor {
    pub name: String,
    pub args: Vec<String>,
}

impl JtStageDescriptor {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Executable unit of a binding's chain.
#[derive(Clone, Debug, PartialEq)]
pub enum JtStage {
    /// Ignores its input and yields a constant.
    Literal(Value),
    /// Reads from the render-time data object.
    Accessor(JtAccessor),
    /// Named helper plus literal arguments; the name is resolved against the
    /// helper registry only when the stage runs.
    Helper { name: String, args: Vec<String> },
}

impl JtStage {
    /// Name used for logs and for boundary scanning. Only helper stages have
    /// a name that can act as a `reduce`/`collect` marker.
    pub fn helper_name(&self) -> Option<&str> {
        match self {
            JtStage::Helper { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Compiled location of one expression and its ordered stage chain.
///
/// The stage list is fixed after compilation and shared by every render.
#[derive(Clone, Debug)]
pub struct JtBinding {
    pub path: JtPath,
    pub expression: String,
    pub stages: Arc<[JtStage]>,
}

impl JtBinding {
    pub fn new(path: JtPath, expression: impl Into<String>, stages: Vec<JtStage>) -> Self {
        Self {
            path,
            expression: expression.into(),
            stages: stages.into(),
        }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}
