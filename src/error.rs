//! Error types and handling for the Meshcast assistant

use thiserror::Error;

/// Main error type for the Meshcast assistant
#[derive(Error, Debug)]
pub enum MeshcastError {
    /// No classification path produced a usable location
    #[error("could not resolve location: {query}")]
    Classification { query: String },

    /// An HTTP call failed, timed out, or returned a non-success status
    #[error("transport failure: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// An expected field or block was missing from an otherwise successful response
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// Configuration-related errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MeshcastError {
    /// Create a new classification error
    pub fn classification<S: Into<String>>(query: S) -> Self {
        Self::Classification {
            query: query.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the fixed user-facing text for this failure. Raw error detail
    /// stays in the logs and never reaches the messaging network.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            MeshcastError::Classification { .. } => {
                "I couldn't understand that location. Type 'help' for format examples."
            }
            MeshcastError::Transport { .. } | MeshcastError::MalformedResponse { .. } => {
                "Sorry, I couldn't fetch the weather for that location."
            }
            MeshcastError::Config { .. } => "Configuration error. Please check your config file.",
            MeshcastError::Io { .. } => "File operation failed. Please check file permissions.",
        }
    }
}
