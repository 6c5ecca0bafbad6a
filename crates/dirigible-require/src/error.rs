// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loader

use thiserror::Error;

/// Result type for module loader operations
pub type Result<T> = std::result::Result<T, RequireError>;

/// Errors that can occur while resolving, fetching or running a module
#[derive(Debug, Error)]
pub enum RequireError {
    /// No candidate location matched the request
    #[error("Cannot find module '{0}'")]
    ModuleNotFound(String),

    /// Content fetch found nothing at a path the locator accepted
    #[error("Cannot read source '{0}'")]
    SourceNotFound(String),

    /// Backing store I/O failure
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// Virtual path rejected by a backing store
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The host engine refused the wrapped source
    #[error("Error compiling module '{filename}': {message}")]
    Compile {
        /// Name the wrapper was compiled under
        filename: String,
        /// Engine message
        message: String,
    },

    /// A module body threw
    #[error("{0}")]
    Script(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RequireError {
    /// Create a module not found error
    pub fn module_not_found(request: impl Into<String>) -> Self {
        Self::ModuleNotFound(request.into())
    }

    /// Create an error for a value thrown by a module body
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Create a compile error for `filename`
    pub fn compile(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a backing store rather than the script
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound(_) | Self::Io(_) | Self::InvalidPath(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = RequireError::module_not_found("nonexistent/thing");
        assert_eq!(err.to_string(), "Cannot find module 'nonexistent/thing'");
    }

    #[test]
    fn test_source_error_classification() {
        assert!(RequireError::SourceNotFound("/a.js".into()).is_source_error());
        assert!(RequireError::InvalidPath("../x".into()).is_source_error());
        assert!(!RequireError::script("boom").is_source_error());
        assert!(!RequireError::module_not_found("x").is_source_error());
    }
}
