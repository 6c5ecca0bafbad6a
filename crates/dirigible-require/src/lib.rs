// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # dirigible-require
//!
//! CommonJS `require()` for scripts served from a virtual repository and run
//! by an embedded engine.
//!
//! This crate provides:
//!
//! - Module ids, singleton caching and cycle-tolerant loading
//! - Search over `<dir>/<id>`, `<dir>/<id>.js` and `<dir>/<id>/index.js`
//! - Source lookup through a chain of stores (repository on disk, in-memory
//!   registry)
//! - The `(exports, require, module, __filename, __dirname)` wrapper,
//!   compiled by the host through [`Compiler`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dirigible_require::{ModuleLoader, RegistrySource, SourceChain, RepositorySource};
//! use std::sync::Arc;
//!
//! let sources = SourceChain::new()
//!     .with(Arc::new(RepositorySource::new("/srv/repository")))
//!     .with(Arc::new(RegistrySource::new()));
//! let loader = ModuleLoader::new(Arc::new(sources), Arc::new(host_compiler));
//! let exports = loader.run_main("/app/main.js")?;
//! ```
//!
//! Every script context gets its own [`ModuleLoader`]; modules and their
//! exports are never shared between loaders.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compiler;
pub mod config;
pub mod error;
pub mod logging;
pub mod module_system;
pub mod path;
pub mod source;
pub mod value;

// Re-exports
pub use compiler::{Compiler, Invokable, ScriptedCompiler, WrapperArgs};
pub use config::LoaderConfig;
pub use error::{RequireError, Result};
pub use module_system::{Module, ModuleLoader, ModuleRef, ModuleRegistry, ModuleState, Require};
pub use source::{RegistrySource, RepositorySource, SourceChain, SourceProvider};
pub use value::{Exports, Value};

/// Version of the dirigible-require crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
