// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! File-system backed repository store

use super::SourceProvider;
use crate::error::{RequireError, Result};
use crate::path;
use std::path::{Path, PathBuf};

/// Folder, relative to the repository root, that published scripts live in
pub const DEFAULT_PUBLIC_PREFIX: &str = "registry/public";

/// Reads scripts from `<root>/<prefix>/<virtual path>`
#[derive(Debug, Clone)]
pub struct RepositorySource {
    root: PathBuf,
    prefix: String,
}

impl RepositorySource {
    /// Repository rooted at `root`, serving the default public folder
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_prefix(root, DEFAULT_PUBLIC_PREFIX)
    }

    /// Repository rooted at `root`, serving `prefix`
    pub fn with_prefix(root: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// Repository root on disk
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a virtual path to its file, refusing anything that climbs out
    pub fn physical_path(&self, location: &str) -> Result<PathBuf> {
        let normalized = path::normalize(location, false);
        if normalized.split('/').any(|segment| segment == "..") {
            return Err(RequireError::InvalidPath(location.to_string()));
        }

        let mut full = self.root.clone();
        for segment in self.prefix.split('/').chain(normalized.split('/')) {
            if !segment.is_empty() && segment != "." {
                full.push(segment);
            }
        }
        Ok(full)
    }
}

impl SourceProvider for RepositorySource {
    fn name(&self) -> &str {
        "repository"
    }

    fn try_read(&self, location: &str) -> Result<Option<String>> {
        let file = self.physical_path(location)?;
        if !file.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&file)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn publish(root: &Path, rel: &str, text: &str) {
        let file = root.join(DEFAULT_PUBLIC_PREFIX).join(rel);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, text).unwrap();
    }

    #[test]
    fn test_reads_published_script() {
        let dir = tempdir().unwrap();
        publish(dir.path(), "lib/util.js", "exports.a = 1;");

        let repo = RepositorySource::new(dir.path());
        assert_eq!(
            repo.try_read("/lib/util.js").unwrap().as_deref(),
            Some("exports.a = 1;")
        );
        assert_eq!(
            repo.try_read("lib/util.js").unwrap().as_deref(),
            Some("exports.a = 1;")
        );
    }

    #[test]
    fn test_missing_and_directories_are_absent() {
        let dir = tempdir().unwrap();
        publish(dir.path(), "lib/util.js", "");

        let repo = RepositorySource::new(dir.path());
        assert_eq!(repo.try_read("/lib/other.js").unwrap(), None);
        assert_eq!(repo.try_read("/lib").unwrap(), None);
        assert!(repo.exists("/lib/util.js"));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        let repo = RepositorySource::new(dir.path());

        let err = repo.try_read("../secret.js").unwrap_err();
        assert!(matches!(err, RequireError::InvalidPath(_)));
        assert!(!repo.exists("/../secret.js"));
    }

    #[test]
    fn test_custom_prefix() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("scripts").join("main.js");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "1").unwrap();

        let repo = RepositorySource::with_prefix(dir.path(), "/scripts/");
        assert_eq!(repo.physical_path("/main.js").unwrap(), file);
        assert!(repo.exists("/main.js"));
    }
}
