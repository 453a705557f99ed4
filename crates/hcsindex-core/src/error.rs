//! Error types for the hcsindex core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for hcsindex.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The manifest file does not exist yet.
    #[error("Index not built: no manifest at {path}, run `hcsindex build` first")]
    ManifestMissing { path: PathBuf },

    /// The manifest file exists but cannot be decoded at all.
    #[error("Manifest error in {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new manifest decoding error.
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the index has simply not been built yet.
    pub fn is_manifest_missing(&self) -> bool {
        matches!(self, Self::ManifestMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CoreError::config("missing field");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_manifest_missing_error() {
        let err = CoreError::ManifestMissing {
            path: PathBuf::from("data/metadata/manifest.json"),
        };
        assert!(err.is_manifest_missing());
        assert!(err.to_string().contains("Index not built"));
        assert!(err.to_string().contains("data/metadata/manifest.json"));
    }

    #[test]
    fn test_manifest_error() {
        let err = CoreError::manifest("manifest.json", "expected an object");
        assert!(err.to_string().contains("Manifest error"));
        assert!(err.to_string().contains("expected an object"));
        assert!(!err.is_manifest_missing());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
