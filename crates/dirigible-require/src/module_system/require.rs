// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS require() bound to one module

use crate::error::Result;
use crate::module_system::loader::ModuleLoader;
use crate::module_system::module::ModuleRef;
use crate::value::Exports;
use std::fmt;

/// The `require` function handed to a module body
#[derive(Clone)]
pub struct Require {
    loader: ModuleLoader,
    module: ModuleRef,
}

impl Require {
    pub(crate) fn new(loader: ModuleLoader, module: ModuleRef) -> Self {
        Self { loader, module }
    }

    /// require(request)
    pub fn call(&self, request: &str) -> Result<Exports> {
        self.loader.load_module(request, &self.module)
    }

    /// require.resolve() - the location `request` would load from
    pub fn resolve(&self, request: &str) -> Result<String> {
        self.loader.resolve(request, &self.module)
    }

    /// require.paths - directories searched for bare requests
    pub fn paths(&self) -> &[String] {
        &self.loader.config().search_paths
    }

    /// require.main - the context's entry module
    pub fn main(&self) -> Option<ModuleRef> {
        self.loader.main_module()
    }

    /// The module this function resolves relative requests against
    pub fn module(&self) -> &ModuleRef {
        &self.module
    }
}

impl fmt::Debug for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Require")
            .field("module", &self.module.id())
            .finish()
    }
}
