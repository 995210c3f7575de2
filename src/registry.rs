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

//! # Helper Registry Module
//!
//! Two-level name lookup for helpers: helpers registered on an instance are
//! checked first, then the built-in defaults (`map`, `reduce`, `collect`,
//! `partial`). Lookups happen when a stage runs, never at compile time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::helper::{JtHelper, JtHelperRef};
use crate::helpers;

/// Registry mapping helper names to implementations.
#[derive(Clone)]
pub struct JtHelperRegistry {
    instance: HashMap<String, JtHelperRef>,
    defaults: Arc<HashMap<String, JtHelperRef>>,
}

impl Default for JtHelperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JtHelperRegistry {
    /// Creates a registry backed by the built-in defaults.
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        helpers::register_defaults(&mut defaults);
        Self {
            instance: HashMap::new(),
            defaults: Arc::new(defaults),
        }
    }

    /// Registers an instance-level helper, shadowing any default with the
    /// same name.
    pub fn register(&mut self, name: impl Into<String>, helper: impl JtHelper + 'static) -> &mut Self {
        self.register_ref(name, Arc::new(helper))
    }

    pub fn register_ref(&mut self, name: impl Into<String>, helper: JtHelperRef) -> &mut Self {
        let name = name.into();
        if self.instance.contains_key(&name) {
            log::debug!("jsont.registry.replace: helper replaced - helper={}", name);
        }
        self.instance.insert(name, helper);
        self
    }

    pub fn get(&self, name: &str) -> Option<JtHelperRef> {
        self.instance
            .get(name)
            .or_else(|| self.defaults.get(name))
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instance.contains_key(name) || self.defaults.contains_key(name)
    }

    pub fn is_default(&self, name: &str) -> bool {
        !self.instance.contains_key(name) && self.defaults.contains_key(name)
    }

    /// Every resolvable name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .instance
            .keys()
            .chain(self.defaults.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl fmt::Debug for JtHelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut instance: Vec<&String> = self.instance.keys().collect();
        instance.sort();
        let mut defaults: Vec<&String> = self.defaults.keys().collect();
        defaults.sort();
        f.debug_struct("JtHelperRegistry")
            .field("instance", &instance)
            .field("defaults", &defaults)
            .finish()
    }
}
