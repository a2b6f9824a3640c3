//! Error types for jotter-core

use thiserror::Error;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jotter-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The backend answered with a non-success HTTP status
    #[error("{message} (HTTP {status})")]
    Remote { status: u16, message: String },

    /// Transport failure, passed through untouched
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Preference storage could not be read or written
    #[error("Preference storage error: {0}")]
    Preferences(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status carried by a backend failure, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_exposes_status() {
        let error = Error::Remote {
            status: 500,
            message: "API Error: Internal Server Error".to_string(),
        };
        assert_eq!(error.status(), Some(500));
        assert_eq!(
            error.to_string(),
            "API Error: Internal Server Error (HTTP 500)"
        );
    }

    #[test]
    fn non_remote_errors_have_no_status() {
        assert_eq!(Error::InvalidInput("x".to_string()).status(), None);
    }
}
