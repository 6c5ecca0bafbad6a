// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host engine seam
//!
//! The loader never evaluates script text itself. It wraps each module body
//! in a function literal taking `(exports, require, module, __filename,
//! __dirname)`, hands that text to a [`Compiler`], and calls the resulting
//! [`Invokable`] with `this` bound to the module's exports.

use crate::error::{RequireError, Result};
use crate::module_system::{ModuleRef, Require};
use crate::value::Exports;
use dashmap::DashMap;
use std::sync::Arc;

/// Parameter list every module body sees
pub const WRAPPER_PARAMS: [&str; 5] = ["exports", "require", "module", "__filename", "__dirname"];

const WRAPPER_HEAD: &str = "(function (exports, require, module, __filename, __dirname) { ";
const WRAPPER_TAIL: &str = "\n})";

/// Wrap a module body in the CommonJS function literal
pub fn wrap(body: &str) -> String {
    let mut wrapped = String::with_capacity(WRAPPER_HEAD.len() + body.len() + WRAPPER_TAIL.len());
    wrapped.push_str(WRAPPER_HEAD);
    wrapped.push_str(body);
    wrapped.push_str(WRAPPER_TAIL);
    wrapped
}

/// Inverse of [`wrap`]
pub fn unwrap_body(wrapped: &str) -> Option<&str> {
    wrapped.strip_prefix(WRAPPER_HEAD)?.strip_suffix(WRAPPER_TAIL)
}

/// Arguments the wrapper function is invoked with, in parameter order
#[derive(Debug, Clone)]
pub struct WrapperArgs {
    /// `exports`
    pub exports: Exports,
    /// `require`, bound to the module being run
    pub require: Require,
    /// `module`
    pub module: ModuleRef,
    /// `__filename`
    pub filename: String,
    /// `__dirname`
    pub dirname: String,
}

/// A compiled wrapper, ready to call
pub trait Invokable: Send + Sync {
    /// Call the wrapper with `this` bound to `this`
    fn apply(&self, this: &Exports, args: WrapperArgs) -> Result<()>;
}

/// The host engine's single compilation primitive
pub trait Compiler: Send + Sync {
    /// Compile wrapped source text, `name` being the script's filename
    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn Invokable>>;
}

/// Module body implemented in Rust
pub type ScriptFn = Arc<dyn Fn(&WrapperArgs) -> Result<()> + Send + Sync>;

/// Compiler whose "scripts" are Rust closures keyed by body text.
///
/// Lets a host serve native modules through the ordinary resolution path,
/// and gives tests an engine whose side effects are observable. Keys and
/// incoming bodies are compared after trimming surrounding whitespace.
#[derive(Default)]
pub struct ScriptedCompiler {
    scripts: DashMap<String, ScriptFn>,
}

impl ScriptedCompiler {
    /// Create a compiler with no scripts
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `body` to `f`
    pub fn define<F>(&self, body: &str, f: F)
    where
        F: Fn(&WrapperArgs) -> Result<()> + Send + Sync + 'static,
    {
        self.scripts.insert(body.trim().to_string(), Arc::new(f));
    }

    /// Builder-style [`define`](Self::define)
    pub fn with<F>(self, body: &str, f: F) -> Self
    where
        F: Fn(&WrapperArgs) -> Result<()> + Send + Sync + 'static,
    {
        self.define(body, f);
        self
    }
}

struct ScriptedInvokable {
    script: ScriptFn,
}

impl Invokable for ScriptedInvokable {
    fn apply(&self, _this: &Exports, args: WrapperArgs) -> Result<()> {
        (self.script)(&args)
    }
}

impl Compiler for ScriptedCompiler {
    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn Invokable>> {
        let body = unwrap_body(source)
            .ok_or_else(|| RequireError::compile(name, "source is not a module wrapper"))?;
        let script = self
            .scripts
            .get(body.trim())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RequireError::compile(name, format!("no script for body {:?}", body.trim())))?;
        Ok(Box::new(ScriptedInvokable { script }))
    }
}
