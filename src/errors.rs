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

//! # Jsont Error Module
//!
//! This module defines the error types used throughout Jsont for compiling
//! templates and rendering them against data.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors while loading templates
//! - **Serde**: Malformed template or configuration text
//! - **Validation**: Invalid inputs handed to the engine or to a helper
//! - **InvalidHelper**: A pipeline names a helper that is not registered
//! - **Helper**: A helper reported a failure
//! - **Panic**: A helper panicked while running
//! - **Assemble**: A resolved value could not be written into the output
//! - **Internal**: Unexpected internal failures
//!
//! Compile-time errors are returned directly from `compile`. Render-time
//! errors travel through the stage chain as ordinary `Err` values; they are
//! never thrown across task boundaries.
//!
//! ## Usage
//!
//! ```rust
//! use jsont::errors::{Result, JtError};
//!
//! fn double(input: &serde_json::Value) -> Result<serde_json::Value> {
//!     let n = input
//!         .as_f64()
//!         .ok_or_else(|| JtError::validation("double expects a number"))?;
//!     Ok(serde_json::json!(n * 2.0))
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Jsont.
pub type Result<T> = std::result::Result<T, JtError>;

/// Canonical error enumeration for Jsont.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum JtError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Malformed template or configuration text.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A pipeline stage names a helper that no registry level provides.
    #[error("Invalid helper \"{helper}\" at {path}")]
    InvalidHelper { helper: String, path: String },

    /// Any failure reported by a helper implementation.
    #[error("helper '{helper}' failed at {path}: {message}")]
    Helper {
        helper: String,
        path: String,
        message: String,
    },

    /// A helper panicked; the panic was caught at the stage boundary.
    #[error("helper panicked at {path}: {message}")]
    Panic { path: String, message: String },

    /// The output assembler could not reach the binding's location.
    #[error("cannot write output at {path}: {message}")]
    Assemble { path: String, message: String },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for JtError {
    fn from(err: io::Error) -> Self {
        JtError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for JtError {
    fn from(err: serde_json::Error) -> Self {
        JtError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for JtError {
    fn from(err: serde_yaml::Error) -> Self {
        JtError::Serde(err.to_string())
    }
}

impl JtError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        JtError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct helper failures.
    pub fn helper(
        helper: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        JtError::Helper {
            helper: helper.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Helper to construct output assembly errors.
    pub fn assemble(path: impl Into<String>, message: impl Into<String>) -> Self {
        JtError::Assemble {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        JtError::Internal(message.into())
    }

    /// Whether the error already carries stage context (helper name or
    /// binding path) and must not be wrapped again.
    pub fn has_stage_context(&self) -> bool {
        matches!(
            self,
            JtError::InvalidHelper { .. }
                | JtError::Helper { .. }
                | JtError::Panic { .. }
                | JtError::Assemble { .. }
        )
    }
}
