// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves, fetches, wraps and runs modules

use crate::compiler::{self, Compiler, WrapperArgs};
use crate::config::LoaderConfig;
use crate::error::{RequireError, Result};
use crate::module_system::cache::ModuleRegistry;
use crate::module_system::module::{Module, ModuleRef};
use crate::module_system::require::Require;
use crate::module_system::resolver::{ModuleLocator, INDEX_FILE};
use crate::path;
use crate::source::SourceProvider;
use crate::value::Exports;
use parking_lot::RwLock;
use regex::Regex;
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

static SHEBANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#![^\r\n]*").expect("shebang pattern is valid"));

/// Filename reported for scripts run from a string
pub const SCRIPT_STRING_FILENAME: &str = INDEX_FILE;

/// Dirname reported for scripts run from a string
pub const SCRIPT_STRING_DIRNAME: &str = ".";

struct LoaderInner {
    config: LoaderConfig,
    registry: ModuleRegistry,
    locator: ModuleLocator,
    source: Arc<dyn SourceProvider>,
    compiler: Arc<dyn Compiler>,
    main_module: RwLock<Option<ModuleRef>>,
}

/// Module loader for one script context.
///
/// Cloning is cheap and shares the registry; create a separate loader for
/// every isolated context.
#[derive(Clone)]
pub struct ModuleLoader {
    inner: Arc<LoaderInner>,
}

impl ModuleLoader {
    /// Create a loader with the default configuration
    pub fn new(source: Arc<dyn SourceProvider>, compiler: Arc<dyn Compiler>) -> Self {
        Self::with_config(LoaderConfig::default(), source, compiler)
    }

    /// Create a loader with an explicit configuration
    pub fn with_config(
        config: LoaderConfig,
        source: Arc<dyn SourceProvider>,
        compiler: Arc<dyn Compiler>,
    ) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                config,
                registry: ModuleRegistry::new(),
                locator: ModuleLocator::new(Arc::clone(&source)),
                source,
                compiler,
                main_module: RwLock::new(None),
            }),
        }
    }

    /// Get the loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Get the module registry
    pub fn registry(&self) -> &ModuleRegistry {
        &self.inner.registry
    }

    /// The entry module, if one has been created
    pub fn main_module(&self) -> Option<ModuleRef> {
        self.inner.main_module.read().clone()
    }

    /// Publish `module` as the entry module
    pub fn set_main_module(&self, module: ModuleRef) {
        *self.inner.main_module.write() = Some(module);
    }

    /// Register the entry module and publish it as `require.main`
    pub fn create_main_module(&self) -> ModuleRef {
        let id = self.inner.config.main_module_id.as_str();
        let (module, _) = self.registry().get_or_insert_with(id, || Module::new(id, None));
        self.set_main_module(Arc::clone(&module));
        module
    }

    /// Load `filename` as the entry module
    pub fn run_main(&self, filename: &str) -> Result<Exports> {
        let main = self.create_main_module();
        self.load(&main, filename)
    }

    /// Run `script` as the entry module
    pub fn eval_main(&self, script: &str) -> Result<Exports> {
        let main = self.create_main_module();
        self.load_script_string(&main, script)
    }

    /// The module that first required `module`
    pub fn parent_of(&self, module: &Module) -> Option<ModuleRef> {
        module.parent_id().and_then(|id| self.registry().get(id))
    }

    /// Module id and search path for `request` made from `parent`
    pub fn request_target(&self, request: &str, parent: &Module) -> (String, Vec<String>) {
        if path::is_relative(request) {
            let parent_filename = parent.filename().unwrap_or_else(|| parent.id().to_string());
            // An index file stands for its directory.
            let base = if is_index_file(&parent_filename) {
                Cow::Owned(format!("{}/", parent.id()))
            } else {
                Cow::Borrowed(parent.id())
            };
            let id = path::join(&[path::dirname(&base), request]);
            let paths = vec![path::dirname(&parent_filename).to_string()];
            (id, paths)
        } else {
            (request.to_string(), self.inner.config.search_paths.clone())
        }
    }

    /// require.resolve(): the location `request` would load from
    pub fn resolve(&self, request: &str, parent: &Module) -> Result<String> {
        let (_, paths) = self.request_target(request, parent);
        self.inner
            .locator
            .find_module_path(request, &paths)
            .ok_or_else(|| RequireError::module_not_found(request))
    }

    /// require(): return the exports of `request` as seen from `parent`.
    ///
    /// A registered id is returned as-is, whether it finished loading,
    /// is still running higher up the stack, or threw.
    pub fn load_module(&self, request: &str, parent: &Module) -> Result<Exports> {
        let (id, paths) = self.request_target(request, parent);

        if let Some(module) = self.registry().get(&id) {
            tracing::debug!(id = %id, loaded = module.is_loaded(), "found in cache");
            parent.add_child(&id);
            return Ok(module.exports().clone());
        }

        tracing::debug!(id = %id, ?paths, request, "looking up module");
        let filename = self
            .inner
            .locator
            .find_module_path(request, &paths)
            .ok_or_else(|| RequireError::module_not_found(request))?;

        let (module, _) = self
            .registry()
            .get_or_insert_with(&id, || Module::new(id.as_str(), Some(parent)));
        parent.add_child(&id);

        self.load(&module, &filename)
    }

    /// Fetch, wrap and run `filename` as `module`
    pub fn load(&self, module: &ModuleRef, filename: &str) -> Result<Exports> {
        tracing::debug!(filename, id = module.id(), "load");
        module.set_filename(filename);

        let content = self.inner.source.read(filename)?;
        self.execute(module, &content, filename, path::dirname(filename))
    }

    /// Run in-memory `script` as `module`
    pub fn load_script_string(&self, module: &ModuleRef, script: &str) -> Result<Exports> {
        tracing::debug!(id = module.id(), "load script string");
        module.set_filename(SCRIPT_STRING_FILENAME);
        self.execute(module, script, SCRIPT_STRING_FILENAME, SCRIPT_STRING_DIRNAME)
    }

    fn execute(
        &self,
        module: &ModuleRef,
        content: &str,
        filename: &str,
        dirname: &str,
    ) -> Result<Exports> {
        let body = strip_shebang(content);
        let wrapped = compiler::wrap(&body);
        let compiled = self.inner.compiler.compile(filename, &wrapped)?;

        let exports = module.exports().clone();
        let args = WrapperArgs {
            exports: exports.clone(),
            require: Require::new(self.clone(), Arc::clone(module)),
            module: Arc::clone(module),
            filename: filename.to_string(),
            dirname: dirname.to_string(),
        };

        // Errors leave the module registered and pending.
        compiled.apply(&exports, args)?;
        module.mark_loaded();
        Ok(exports)
    }
}

/// Drop a leading `#!` line, keeping its newline
pub fn strip_shebang(content: &str) -> Cow<'_, str> {
    SHEBANG.replace(content, "")
}

fn is_index_file(filename: &str) -> bool {
    matches!(path::basename(filename, None), "index.js" | "index.addon")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ScriptedCompiler;
    use crate::module_system::ModuleState;
    use crate::source::RegistrySource;
    use crate::value::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn loader(store: RegistrySource, compiler: ScriptedCompiler) -> ModuleLoader {
        ModuleLoader::new(Arc::new(store), Arc::new(compiler))
    }

    fn loaded(id: &str, filename: &str) -> Module {
        let module = Module::new(id, None);
        module.set_filename(filename);
        module
    }

    #[test]
    fn test_relative_request_target() {
        let loader = loader(RegistrySource::new(), ScriptedCompiler::new());
        let parent = loaded("/a/b", "/a/b.js");

        let (id, paths) = loader.request_target("./x", &parent);
        assert_eq!(id, "/a/x");
        assert_eq!(paths, vec!["/a"]);

        let (id, _) = loader.request_target("../x", &parent);
        assert_eq!(id, "/x");
    }

    #[test]
    fn test_relative_request_from_index_file() {
        let loader = loader(RegistrySource::new(), ScriptedCompiler::new());
        let parent = loaded("/lib/util", "/lib/util/index.js");

        let (id, paths) = loader.request_target("./fmt", &parent);
        assert_eq!(id, "/lib/util/fmt");
        assert_eq!(paths, vec!["/lib/util"]);
    }

    #[test]
    fn test_bare_request_target_ignores_parent() {
        let loader = loader(RegistrySource::new(), ScriptedCompiler::new());

        for parent in [loaded("/a/b", "/a/b.js"), loaded("/deep/x/y", "/deep/x/y/index.js")] {
            let (id, paths) = loader.request_target("y", &parent);
            assert_eq!(id, "y");
            assert_eq!(paths, vec!["/"]);
        }
    }

    #[test]
    fn test_strip_shebang() {
        assert_eq!(strip_shebang("#!/usr/bin/env example\nexports.x = 1;"), "\nexports.x = 1;");
        assert_eq!(strip_shebang("exports.x = 1;"), "exports.x = 1;");
        assert_eq!(strip_shebang("a;\n#!not-first"), "a;\n#!not-first");
        assert_eq!(strip_shebang("#!x\r\nbody"), "\r\nbody");
    }

    #[test]
    fn test_body_runs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let compiler = ScriptedCompiler::new().with("counted", move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            args.exports.set("n", 1);
            Ok(())
        });
        let loader = loader(RegistrySource::new().with_script("/counted.js", "counted"), compiler);
        let main = loader.create_main_module();

        let first = loader.load_module("counted", &main).unwrap();
        let second = loader.load_module("counted", &main).unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(main.children(), vec!["counted"]);

        let module = loader.registry().get("counted").unwrap();
        assert_eq!(module.filename().as_deref(), Some("/counted.js"));
        assert_eq!(module.parent_id(), Some("."));
        assert!(Arc::ptr_eq(&loader.parent_of(&module).unwrap(), &main));
    }

    #[test]
    fn test_not_found_names_request() {
        let loader = loader(RegistrySource::new(), ScriptedCompiler::new());
        let main = loader.create_main_module();

        let err = loader.load_module("nonexistent/thing", &main).unwrap_err();
        assert!(err.to_string().contains("Cannot find module 'nonexistent/thing'"));
        assert!(!loader.registry().has("nonexistent/thing"));
    }

    #[test]
    fn test_failed_load_stays_cached() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let compiler = ScriptedCompiler::new().with("fails", move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            args.exports.set("before", true);
            Err(RequireError::script("Error: boom"))
        });
        let loader = loader(RegistrySource::new().with_script("/fails.js", "fails"), compiler);
        let main = loader.create_main_module();

        let err = loader.load_module("fails", &main).unwrap_err();
        assert!(matches!(err, RequireError::Script(ref msg) if msg == "Error: boom"));

        // No retry: the partial exports come back.
        let stale = loader.load_module("fails", &main).unwrap();
        assert_eq!(stale.get("before"), Some(Value::Boolean(true)));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(
            loader.registry().get("fails").unwrap().state(),
            ModuleState::Pending
        );
    }

    #[test]
    fn test_compile_error_leaves_module_registered() {
        let loader = loader(
            RegistrySource::new().with_script("/bad.js", "not registered"),
            ScriptedCompiler::new(),
        );
        let main = loader.create_main_module();

        let err = loader.load_module("bad", &main).unwrap_err();
        assert!(matches!(err, RequireError::Compile { ref filename, .. } if filename == "/bad.js"));
        assert!(loader.registry().has("bad"));
    }

    #[test]
    fn test_resolve_does_not_load() {
        let loader = loader(
            RegistrySource::new().with_script("/lib/a/index.js", "a"),
            ScriptedCompiler::new(),
        );
        let main = loader.create_main_module();

        assert_eq!(loader.resolve("lib/a", &main).unwrap(), "/lib/a/index.js");
        assert!(!loader.registry().has("lib/a"));
        assert!(matches!(
            loader.resolve("lib/b", &main),
            Err(RequireError::ModuleNotFound(_))
        ));
    }

    #[test]
    fn test_script_string_reports_fixed_location() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let compiler = ScriptedCompiler::new().with("where", move |args| {
            sink.lock().push((args.filename.clone(), args.dirname.clone()));
            Ok(())
        });
        let loader = loader(RegistrySource::new(), compiler);

        loader.eval_main("where").unwrap();
        assert_eq!(*seen.lock(), vec![("index.js".to_string(), ".".to_string())]);

        let main = loader.main_module().unwrap();
        assert_eq!(main.id(), ".");
        assert!(main.is_loaded());
    }
}
