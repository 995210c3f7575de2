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

//! # Built-in Helpers Module
//!
//! Helpers every registry carries as defaults. Instance-registered helpers
//! with the same name shadow them.
//!
//! ## Defaults
//!
//! - **map**: runs the rest of the chain, up to a `reduce`/`collect`
//!   boundary, once per collection element
//! - **reduce** / **collect**: identity stages marking where `map` hands the
//!   aggregate back to the outer chain
//! - **partial**: renders a named sub-template with its input as data

use std::collections::HashMap;
use std::sync::Arc;

use crate::helper::JtHelperRef;

pub mod collection;
pub mod partial;

pub use collection::{JtMapHelper, JtPassThroughHelper};
pub use partial::JtPartialHelper;

/// Stage names that end the sub-chain a `map` distributes.
pub const BOUNDARY_HELPERS: [&str; 2] = ["reduce", "collect"];

pub fn is_boundary(name: &str) -> bool {
    BOUNDARY_HELPERS.contains(&name)
}

pub(crate) fn register_defaults(map: &mut HashMap<String, JtHelperRef>) {
    map.insert("map".to_string(), Arc::new(JtMapHelper));
    for name in BOUNDARY_HELPERS {
        map.insert(name.to_string(), Arc::new(JtPassThroughHelper));
    }
    map.insert("partial".to_string(), Arc::new(JtPartialHelper));
}
