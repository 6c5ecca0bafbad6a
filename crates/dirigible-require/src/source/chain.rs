// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Prioritized chain of stores

use super::{RepositorySource, SourceProvider};
use crate::config::LoaderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Stores consulted in order; the first hit wins.
///
/// An error from a store ends the lookup: later stores are not consulted,
/// so during an existence probe the path counts as missing even if a
/// lower-priority store holds it.
#[derive(Default, Clone)]
pub struct SourceChain {
    stores: Vec<Arc<dyn SourceProvider>>,
}

impl SourceChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with the repository named by `config` (if any) in front
    pub fn from_config(config: &LoaderConfig) -> Self {
        let mut chain = Self::new();
        if let Some(root) = &config.repository_root {
            chain.push(Arc::new(RepositorySource::with_prefix(
                root,
                &config.public_prefix,
            )));
        }
        chain
    }

    /// Append a lower-priority store
    pub fn push(&mut self, store: Arc<dyn SourceProvider>) {
        self.stores.push(store);
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, store: Arc<dyn SourceProvider>) -> Self {
        self.push(store);
        self
    }

    /// Number of stores
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Whether the chain has no stores
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl SourceProvider for SourceChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn try_read(&self, location: &str) -> Result<Option<String>> {
        for store in &self.stores {
            if let Some(text) = store.try_read(location)? {
                tracing::trace!(store = store.name(), location, "source hit");
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequireError;
    use crate::source::RegistrySource;
    use tempfile::tempdir;

    #[test]
    fn test_first_store_wins() {
        let first = RegistrySource::new().with_script("/a.js", "first");
        let second = RegistrySource::new()
            .with_script("/a.js", "second")
            .with_script("/b.js", "only-second");

        let chain = SourceChain::new()
            .with(Arc::new(first))
            .with(Arc::new(second));

        assert_eq!(chain.read("/a.js").unwrap(), "first");
        assert_eq!(chain.read("/b.js").unwrap(), "only-second");
        assert_eq!(chain.try_read("/c.js").unwrap(), None);
    }

    #[test]
    fn test_store_error_stops_the_chain() {
        let dir = tempdir().unwrap();
        let chain = SourceChain::new()
            .with(Arc::new(RepositorySource::new(dir.path())))
            .with(Arc::new(RegistrySource::new().with_script("/x.js", "x")));

        assert!(matches!(
            chain.read("../x.js"),
            Err(RequireError::InvalidPath(_))
        ));
        assert!(!chain.exists("../x.js"));
    }

    struct Unavailable;

    impl SourceProvider for Unavailable {
        fn try_read(&self, location: &str) -> Result<Option<String>> {
            Err(RequireError::InvalidPath(location.to_string()))
        }
    }

    #[test]
    fn test_store_error_hides_lower_stores() {
        let chain = SourceChain::new()
            .with(Arc::new(Unavailable))
            .with(Arc::new(RegistrySource::new().with_script("/x.js", "x")));

        assert!(!chain.exists("/x.js"));
        assert!(matches!(chain.read("/x.js"), Err(RequireError::InvalidPath(_))));
    }

    #[test]
    fn test_from_config() {
        let dir = tempdir().unwrap();
        let config = LoaderConfig {
            repository_root: Some(dir.path().to_path_buf()),
            ..LoaderConfig::default()
        };
        assert_eq!(SourceChain::from_config(&config).len(), 1);
        assert!(SourceChain::from_config(&LoaderConfig::default()).is_empty());
    }
}
