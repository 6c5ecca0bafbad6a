// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module location search

use crate::path;
use crate::source::SourceProvider;
use std::sync::Arc;

/// File name probed when a request names a directory
pub const INDEX_FILE: &str = "index.js";

/// Extension appended to extensionless requests
pub const SCRIPT_EXTENSION: &str = ".js";

/// Finds the concrete location for a request
#[derive(Clone)]
pub struct ModuleLocator {
    source: Arc<dyn SourceProvider>,
}

impl ModuleLocator {
    /// Create a locator probing `source`
    pub fn new(source: Arc<dyn SourceProvider>) -> Self {
        Self { source }
    }

    /// Candidate locations for `id` under `dir`, in probe order
    pub fn candidates(dir: &str, id: &str) -> [String; 3] {
        let base = path::join(&[dir, id]);
        let with_extension = format!("{}{}", base, SCRIPT_EXTENSION);
        let index = path::join(&[dir, id, INDEX_FILE]);
        [base, with_extension, index]
    }

    /// First existing candidate across `dirs`.
    ///
    /// An absolute `id` is looked up once from the root, ignoring `dirs`
    /// beyond requiring it to be non-empty. Probing stops at the first hit.
    pub fn find_module_path(&self, id: &str, dirs: &[String]) -> Option<String> {
        if dirs.is_empty() {
            return None;
        }

        let root = [String::new()];
        let dirs = if path::is_absolute(id) { &root[..] } else { dirs };

        for dir in dirs {
            for location in Self::candidates(dir, id) {
                let found = self.source.exists(&location);
                tracing::trace!(location = %location, found, "probe");
                if found {
                    return Some(location);
                }
            }
        }

        None
    }
}
