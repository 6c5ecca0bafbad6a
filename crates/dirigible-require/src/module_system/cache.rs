// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module registry for require()
//!
//! One registry per script context. Entries are never removed: a module that
//! failed to load stays registered, and later requires get its partial
//! exports back instead of a second attempt.

use crate::module_system::module::{Module, ModuleRef};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Map from module id to its single instance
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: DashMap<String, ModuleRef>,
}

impl ModuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a registered module by id
    pub fn get(&self, id: &str) -> Option<ModuleRef> {
        self.modules.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a module is registered
    pub fn has(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Return the module for `id`, creating it with `create` if absent.
    ///
    /// The flag is true when this call created it.
    pub fn get_or_insert_with(
        &self,
        id: &str,
        create: impl FnOnce() -> Module,
    ) -> (ModuleRef, bool) {
        match self.modules.entry(id.to_string()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let module = Arc::new(create());
                entry.insert(Arc::clone(&module));
                (module, true)
            }
        }
    }

    /// Get all registered ids
    pub fn keys(&self) -> Vec<String> {
        self.modules.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Get the number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
