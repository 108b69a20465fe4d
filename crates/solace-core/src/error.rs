//! Error types for solace-core
//!
//! This module provides the error taxonomy of the conversation core and
//! user-friendly error formatting.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input; nothing was changed
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the current session state; nothing was changed
    #[error("state conflict: {0}")]
    StateConflict(String),

    /// An external collaborator failed
    #[error("{service} unavailable: {message}")]
    ExternalService {
        /// Service name
        service: String,
        /// Detailed message
        message: String,
    },

    /// Missing or invalid configuration, fatal at startup
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown session
    #[error("session not found: {0}")]
    NotFound(String),

    /// Session passed its idle or duration limit and was closed
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// Storage backend error
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] solace_llm::Error),

    /// Signal extraction error
    #[error("nlp error: {0}")]
    Nlp(#[from] solace_nlp::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error must stop the process before serving traffic
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Configuration(_) => true,
            Error::Llm(e) => e.is_configuration(),
            Error::Nlp(solace_nlp::Error::Configuration(_)) => true,
            _ => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::Storage(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => format!("Invalid input: {}", msg),
            Error::StateConflict(msg) => format!("Not possible right now: {}", msg),
            Error::ExternalService { service, .. } => {
                format!("The {} service is not responding.", service)
            }
            Error::Configuration(msg) => format!("Configuration error: {}", msg),
            Error::NotFound(id) => format!("No active session '{}'.", id),
            Error::SessionExpired(id) => format!("Session '{}' has ended.", id),
            Error::Storage(_) => "Session storage is unavailable.".to_string(),
            Error::Serialization(_) => "Stored session data could not be read.".to_string(),
            Error::Llm(e) if e.is_configuration() => {
                format!("Language model is not configured: {}", e)
            }
            Error::Llm(_) => "The language model is not responding.".to_string(),
            Error::Nlp(e) => format!("Signal extraction error: {}", e),
            Error::Internal(msg) => format!("Internal error: {}", msg),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Configuration(_) => {
                Some("Check config/default.toml, config/local.toml or SOLACE_* environment variables.".to_string())
            }
            Error::Llm(e) if e.is_configuration() => Some(
                "Set OPENAI_API_KEY in your environment or .env file, or run with --offline."
                    .to_string(),
            ),
            Error::SessionExpired(_) | Error::NotFound(_) => {
                Some("Start a new session to continue.".to_string())
            }
            Error::StateConflict(_) => {
                Some("Finish the current assessment before starting another.".to_string())
            }
            Error::Storage(_) => Some("Check the [storage] settings and backend.".to_string()),
            _ => None,
        }
    }
}

/// Format an error for display in the CLI
#[must_use]
pub fn format_error_for_cli(error: &Error) -> String {
    let mut output = error.user_message();
    if let Some(suggestion) = error.suggestion() {
        output.push_str("\n\n");
        output.push_str(&suggestion);
    }
    output.push('\n');
    output
}
