//! Error handling for Kerfline
//!
//! Provides error types for the layers that can actually fail:
//! - Designer errors (shape store lookups, parameter validation)
//! - Configuration errors (engine settings files)
//!
//! Geometry operations themselves are best-effort and infallible; only
//! lookups, documents and configuration return `Result`.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Designer error type
///
/// Represents errors raised by the shape model and shape store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    /// No shape with the given id is registered
    #[error("Unknown shape {id}")]
    UnknownShape {
        /// The id that failed to resolve.
        id: String,
    },

    /// No derived toolpath with the given id is registered
    #[error("Unknown toolpath {id}")]
    UnknownToolpath {
        /// The id that failed to resolve.
        id: String,
    },

    /// A shape parameter is outside its legal range
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

impl DesignerError {
    /// Shorthand for an invalid parameter error.
    pub fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignerError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A setting failed validation
    #[error("Invalid setting '{key}': {reason}")]
    Invalid {
        /// The setting name.
        key: String,
        /// The reason the value was rejected.
        reason: String,
    },

    /// The file extension is neither `.json` nor `.toml`
    #[error("Config file must be .json or .toml, got {path}")]
    UnsupportedFormat {
        /// The offending path.
        path: String,
    },

    /// The file could not be parsed
    #[error("Invalid config: {reason}")]
    Parse {
        /// The parser message.
        reason: String,
    },
}

/// Main error type for Kerfline
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Designer error
    #[error(transparent)]
    Designer(#[from] DesignerError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a lookup failure for a shape or toolpath
    pub fn is_unknown_entity(&self) -> bool {
        matches!(
            self,
            Error::Designer(DesignerError::UnknownShape { .. })
                | Error::Designer(DesignerError::UnknownToolpath { .. })
        )
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
