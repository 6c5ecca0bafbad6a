// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Script source stores
//!
//! A [`SourceProvider`] answers one question: what text lives at a virtual
//! path. Two stores back a typical deployment:
//!
//! - [`RepositorySource`] - the workspace repository on disk, published under
//!   `registry/public`
//! - [`RegistrySource`] - scripts registered in memory (bundled or built-in)
//!
//! [`SourceChain`] tries them in priority order.

mod chain;
mod registry;
mod repository;

pub use chain::SourceChain;
pub use registry::RegistrySource;
pub use repository::{RepositorySource, DEFAULT_PUBLIC_PREFIX};

use crate::error::{RequireError, Result};

/// Access to script text by virtual path
pub trait SourceProvider: Send + Sync {
    /// Short label used in log output
    fn name(&self) -> &str {
        "source"
    }

    /// Fetch the text at `path`; `Ok(None)` when nothing is there
    fn try_read(&self, path: &str) -> Result<Option<String>>;

    /// Existence probe used while locating modules.
    ///
    /// Store failures count as "not found" here and nowhere else.
    fn exists(&self, path: &str) -> bool {
        match self.try_read(path) {
            Ok(found) => found.is_some(),
            Err(err) => {
                tracing::trace!(store = self.name(), path, error = %err, "probe failed");
                false
            }
        }
    }

    /// Content fetch; every failure propagates
    fn read(&self, path: &str) -> Result<String> {
        self.try_read(path)?
            .ok_or_else(|| RequireError::SourceNotFound(path.to_string()))
    }
}
