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

//! # Pipeline Expression Module
//!
//! Templates embed pipelines as backtick-delimited strings:
//!
//! ```json
//! {
//!   "greeting": "`'world' | hello | exclaim`",
//!   "author": "`post.author_id | user`",
//!   "total": "`orders | price | reduce | sum`"
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Parser** ([parser.rs](parser/index.html)): splits an expression on `|`
//!   into `name[:arg,...]` stage descriptors
//! - **IR** ([ir.rs](ir/index.html)): stages and bindings
//! - **Compiler** ([compiler.rs](compiler/index.html)): scans a template once
//!   and produces one binding per expression leaf
//!
//! The first stage of a pipeline is either a single-quoted literal or a data
//! path; every later stage names a helper. Helper names are not checked here;
//! an unknown name only fails when its binding runs.

pub mod compiler;
pub mod ir;
pub mod parser;

pub use compiler::{JtCompiledTemplate, JtTemplateCompiler};
pub use ir::{JtBinding, JtStage, JtStageDescriptor};
pub use parser::JtPipelineParser;
