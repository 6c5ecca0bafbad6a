// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! In-memory script registry

use super::SourceProvider;
use crate::error::Result;
use crate::path;
use dashmap::DashMap;

/// Scripts registered by the host, keyed by absolute virtual path
#[derive(Debug, Default)]
pub struct RegistrySource {
    scripts: DashMap<String, String>,
}

impl RegistrySource {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_script(self, location: &str, text: impl Into<String>) -> Self {
        self.insert(location, text);
        self
    }

    /// Register `text` at `location`, replacing any previous text
    pub fn insert(&self, location: &str, text: impl Into<String>) {
        self.scripts.insert(Self::key(location), text.into());
    }

    /// Number of registered scripts
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    fn key(location: &str) -> String {
        path::join(&["/", location])
    }
}

impl SourceProvider for RegistrySource {
    fn name(&self) -> &str {
        "registry"
    }

    fn try_read(&self, location: &str) -> Result<Option<String>> {
        // Empty entries are treated as missing.
        Ok(self
            .scripts
            .get(&Self::key(location))
            .filter(|text| !text.is_empty())
            .map(|text| text.value().clone()))
    }
}
