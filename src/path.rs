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

//! Locations inside a template document.
//!
//! A [`JtPath`] is the ordered list of object keys and array indices leading
//! from the template root to one leaf. Paths are produced once by the
//! compiler and then shared read-only by every render.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a [`JtPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JtPathKey {
    Index(usize),
    Key(String),
}

impl fmt::Display for JtPathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JtPathKey::Index(index) => write!(f, "{}", index),
            JtPathKey::Key(key) => write!(f, "{}", key),
        }
    }
}

impl From<usize> for JtPathKey {
    fn from(index: usize) -> Self {
        JtPathKey::Index(index)
    }
}

impl From<&str> for JtPathKey {
    fn from(key: &str) -> Self {
        JtPathKey::Key(key.to_string())
    }
}

impl From<String> for JtPathKey {
    fn from(key: String) -> Self {
        JtPathKey::Key(key)
    }
}

/// Ordered location of a leaf inside a template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JtPath(Vec<JtPathKey>);

impl JtPath {
    /// The empty path addressing the document root.
    pub fn root() -> Self {
        JtPath(Vec::new())
    }

    /// Returns a new path extended by one key.
    pub fn child(&self, key: impl Into<JtPathKey>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        JtPath(keys)
    }

    pub fn keys(&self) -> &[JtPathKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether one path is a prefix of the other. Two bindings may never
    /// share a location or nest inside each other.
    pub fn overlaps(&self, other: &JtPath) -> bool {
        let shared = self.0.len().min(other.0.len());
        self.0[..shared] == other.0[..shared]
    }
}

impl fmt::Display for JtPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, key) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl<K: Into<JtPathKey>> FromIterator<K> for JtPath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        JtPath(iter.into_iter().map(Into::into).collect())
    }
}
