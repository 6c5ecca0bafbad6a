// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! A single loaded unit of script

use crate::value::Exports;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to a registered module
pub type ModuleRef = Arc<Module>;

/// Where a module is in its one-way lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Registered; body not run yet, still running, or threw
    Pending,
    /// Body returned normally
    Loaded,
}

#[derive(Debug, Default)]
struct ModuleInner {
    filename: Option<String>,
    loaded: bool,
    children: Vec<String>,
}

/// A module and its exports
#[derive(Debug)]
pub struct Module {
    id: String,
    exports: Exports,
    // Id only: the parent is looked up through the registry, never owned.
    parent: Option<String>,
    inner: RwLock<ModuleInner>,
}

impl Module {
    /// Create a pending module with empty exports
    pub fn new(id: impl Into<String>, parent: Option<&Module>) -> Self {
        Self {
            id: id.into(),
            exports: Exports::new(),
            parent: parent.map(|p| p.id.clone()),
            inner: RwLock::new(ModuleInner::default()),
        }
    }

    /// Canonical id (registry key)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The module's exports object
    pub fn exports(&self) -> &Exports {
        &self.exports
    }

    /// Id of the module that first required this one
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Resolved location, once loading has started
    pub fn filename(&self) -> Option<String> {
        self.inner.read().filename.clone()
    }

    pub(crate) fn set_filename(&self, filename: &str) {
        self.inner.write().filename = Some(filename.to_string());
    }

    /// Whether the body ran to completion
    pub fn is_loaded(&self) -> bool {
        self.inner.read().loaded
    }

    pub(crate) fn mark_loaded(&self) {
        self.inner.write().loaded = true;
    }

    /// Current lifecycle state
    pub fn state(&self) -> ModuleState {
        if self.is_loaded() {
            ModuleState::Loaded
        } else {
            ModuleState::Pending
        }
    }

    /// Ids this module has required, in first-require order
    pub fn children(&self) -> Vec<String> {
        self.inner.read().children.clone()
    }

    pub(crate) fn add_child(&self, id: &str) {
        let mut inner = self.inner.write();
        if !inner.children.iter().any(|c| c == id) {
            inner.children.push(id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_module_is_pending() {
        let parent = Module::new("/main", None);
        let module = Module::new("/lib/a", Some(&parent));

        assert_eq!(module.id(), "/lib/a");
        assert_eq!(module.parent_id(), Some("/main"));
        assert_eq!(module.filename(), None);
        assert_eq!(module.state(), ModuleState::Pending);
        assert!(module.exports().is_empty());
    }

    #[test]
    fn test_mark_loaded() {
        let module = Module::new("/a", None);
        module.set_filename("/a.js");
        module.mark_loaded();
        assert_eq!(module.state(), ModuleState::Loaded);
        assert_eq!(module.filename().as_deref(), Some("/a.js"));
    }

    #[test]
    fn test_children_are_recorded_once() {
        let module = Module::new("/a", None);
        module.add_child("/b");
        module.add_child("/c");
        module.add_child("/b");
        assert_eq!(module.children(), vec!["/b", "/c"]);
    }
}
