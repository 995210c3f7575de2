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

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{JtError, Result};
use crate::helper::{JtFlow, JtHelper, JtHelperContext};

/// `partial:<name>` renders a registered sub-template with the input as its
/// data. A `null` input yields `null` without rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct JtPartialHelper;

#[async_trait]
impl JtHelper for JtPartialHelper {
    async fn call(&self, input: Value, args: &[String], ctx: &JtHelperContext) -> Result<JtFlow> {
        if input.is_null() {
            return Ok(JtFlow::Next(Value::Null));
        }

        let name = args
            .first()
            .ok_or_else(|| JtError::validation("partial requires a template name"))?;
        let template = ctx
            .partial(name)
            .cloned()
            .ok_or_else(|| JtError::validation(format!("unknown partial \"{}\"", name)))?;

        template.render(input).await.map(JtFlow::Next)
    }
}
