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

//! # Jsont Core Library
//!
//! Jsont renders JSON templates. A template is an ordinary JSON document in
//! which some string leaves are pipeline expressions delimited by backticks.
//! Each expression reads a value from the data object (or starts from a
//! quoted literal) and passes it through a chain of named, possibly
//! asynchronous helpers. The result replaces the expression in a copy of the
//! template.
//!
//! ## Module Overview
//!
//! - **dsl**: Expression parser, stage IR and the template compiler
//! - **accessor**: Data path lookup for the first stage of a pipeline
//! - **path**: Locations of expression leaves inside a template
//! - **helper**: The helper trait, closure adapters and execution context
//! - **helpers**: Built-in helpers (`map`, `reduce`, `collect`, `partial`)
//! - **registry**: Two-level helper lookup (instance, then defaults)
//! - **stack**: Sequential stage-chain executor
//! - **batch**: Concurrency-bounded join of independent tasks
//! - **render**: Render jobs and the output assembler
//! - **template**: Compiled, renderable templates
//! - **engine**: The [`Jsont`] entry point
//! - **config** / **context**: Render configuration and shared render state
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jsont::Jsont;
//! use serde_json::json;
//!
//! # async fn demo() -> jsont::Result<()> {
//! let mut engine = Jsont::new();
//! engine.use_sync("double", |v, _| Ok(json!(v.as_i64().unwrap_or(0) * 2)));
//!
//! let template = engine.compile(
//!     json!({"total": "`items | map | double | reduce | sum`", "first": "`items[0]`"}),
//!     json!({}),
//! );
//! # let _ = template;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Compilation fails only on malformed template text. Render-time failures
//! (unknown helpers, helper errors, panics inside helpers, unwritable output
//! paths) are returned as [`JtError`] values; by default the first one fails
//! the whole render.

pub mod accessor;
pub mod batch;
pub mod config;
pub mod context;
pub mod dsl;
pub mod engine;
pub mod errors;
pub mod helper;
pub mod helpers;
pub mod path;
pub mod registry;
pub mod render;
pub mod stack;
pub mod template;

pub use accessor::JtAccessor;
pub use batch::{JtBatch, JtBatchProgress, JtBatchSettled, JtProgressObserver};
pub use config::JtRenderConfig;
pub use context::{JtPartials, JtRenderContext};
pub use dsl::{JtBinding, JtCompiledTemplate, JtPipelineParser, JtStage, JtStageDescriptor, JtTemplateCompiler};
pub use engine::Jsont;
pub use errors::{JtError, Result};
pub use helper::{JtFlow, JtFnHelper, JtHelper, JtHelperContext, JtHelperRef, JtSyncHelper};
pub use path::{JtPath, JtPathKey};
pub use registry::JtHelperRegistry;
pub use render::{JtOutputAssembler, JtSettledRender};
pub use stack::JtStackExecutor;
pub use template::JtTemplate;
