//! Error types for the catalog crate.

#[cfg(feature = "persistence")]
use std::path::PathBuf;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading or caching metadata.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The discovery source could not provide metadata.
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Cache key that cannot be stored safely.
    #[error("Invalid cache key '{key}'")]
    InvalidKey { key: String },

    /// I/O error during persistence operations.
    #[cfg(feature = "persistence")]
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[cfg(feature = "persistence")]
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A cached entry could not be decoded.
    #[cfg(feature = "persistence")]
    #[error("Corrupt cache entry '{key}': {message}")]
    Corrupt { key: String, message: String },
}

impl CatalogError {
    /// Creates a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery(message.into())
    }

    /// Creates an I/O error with path context.
    #[cfg(feature = "persistence")]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt-entry error.
    #[cfg(feature = "persistence")]
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_message() {
        let err = CatalogError::discovery("remote unavailable");
        assert_eq!(err.to_string(), "Discovery error: remote unavailable");
    }

    #[cfg(feature = "persistence")]
    #[test]
    fn test_io_error_keeps_path() {
        let err = CatalogError::io_error(
            "/tmp/cache/SCHEMA.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("I/O error at /tmp/cache/SCHEMA.json"));
    }
}
