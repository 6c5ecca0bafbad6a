// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RequireError, Result};
use crate::source::DEFAULT_PUBLIC_PREFIX;

/// Prefix for environment overrides, e.g. `DIRIGIBLE_REQUIRE_SEARCH_PATHS`
pub const ENV_PREFIX: &str = "DIRIGIBLE_REQUIRE_";

/// Id given to the entry module of a context
pub const MAIN_MODULE_ID: &str = ".";

/// Configuration for a [`ModuleLoader`](crate::ModuleLoader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Repository root on disk; no repository store when unset
    pub repository_root: Option<PathBuf>,

    /// Folder under the root that published scripts live in
    pub public_prefix: String,

    /// Directories searched for bare requests
    pub search_paths: Vec<String>,

    /// Id of the entry module
    pub main_module_id: String,

    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            repository_root: None,
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            search_paths: vec!["/".to_string()],
            main_module_id: MAIN_MODULE_ID.to_string(),
            log_filter: "dirigible_require=warn".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Read a JSON config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: LoaderConfig = serde_json::from_str(&content)?;
        config.apply_vars(std::env::vars());
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Defaults plus overrides from `DIRIGIBLE_REQUIRE_*` pairs in `vars`.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = LoaderConfig::default();
        config.apply_vars(vars);
        config.validate()?;
        Ok(config)
    }

    fn apply_vars<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                let config_key = config_key.to_lowercase().replace('_', "-");
                self.set(&config_key, &value);
            }
        }
    }

    /// Install the fmt subscriber with `log_filter` as the default filter.
    ///
    /// Returns false if a global subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        crate::logging::init_tracing(&self.log_filter)
    }

    /// Set a configuration value by its dashed name. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            "repository-root" => self.repository_root = Some(PathBuf::from(value)),
            "public-prefix" => self.public_prefix = value.to_string(),
            "search-paths" => {
                self.search_paths = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
            }
            "main-module-id" => self.main_module_id = value.to_string(),
            "log-filter" => self.log_filter = value.to_string(),
            _ => tracing::debug!(key, "ignoring unknown config key"),
        }
    }

    /// Reject configurations the loader cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.search_paths.is_empty() {
            return Err(RequireError::Config(
                "search_paths must name at least one directory".to_string(),
            ));
        }
        if self.main_module_id.is_empty() {
            return Err(RequireError::Config(
                "main_module_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
