//! Error types for Stepwise.
//!
//! Navigation never fails: a step that refuses to advance reports its
//! problems through a validation result, not through this type. These errors
//! cover the surfaces around the engine (configuration, schemas, form data).

use std::path::PathBuf;

/// Result type alias for Stepwise operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of form navigation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration text could not be parsed.
    #[error("Invalid form configuration: {source}")]
    Config {
        #[source]
        source: toml::de::Error,
    },

    /// Configuration file could not be read.
    #[error("Failed to read form configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema rule carries a pattern that does not compile.
    #[error("Invalid pattern for field '{field}': {message}")]
    InvalidPattern { field: String, message: String },

    /// Form data could not be converted to or from JSON.
    #[error("Form data conversion failed: {0}")]
    FormData(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration parse error.
    pub fn config(source: toml::de::Error) -> Self {
        Self::Config { source }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a pattern error.
    pub fn invalid_pattern(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_pattern("phone", "unclosed group");
        assert_eq!(
            err.to_string(),
            "Invalid pattern for field 'phone': unclosed group"
        );

        let io = Error::io(
            "forms/enroll.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(io.to_string().contains("forms/enroll.toml"));
        assert!(std::error::Error::source(&io).is_some());
    }
}
