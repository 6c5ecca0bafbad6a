// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS module system
//!
//! - `require()` bound per module, synchronous and re-entrant
//! - `module.exports` / `exports` sharing one object
//! - One instance per module id, registered before its body runs, so cyclic
//!   requires see partial exports instead of recursing

mod cache;
mod loader;
mod module;
mod require;
mod resolver;

pub use cache::ModuleRegistry;
pub use loader::ModuleLoader;
pub use module::{Module, ModuleRef, ModuleState};
pub use require::Require;
pub use resolver::{ModuleLocator, INDEX_FILE, SCRIPT_EXTENSION};
