//! Error types for the EcoWeek backend.
//!
//! Ingestion and aggregation are total over their inputs, so the error
//! hierarchy only covers the edges of the system:
//!
//! - [`SourceError`] - the survey export could not be obtained or written
//! - [`CommentError`] - comment validation and comment store failures
//! - [`TriviaError`] - invalid moves in a trivia game
//! - [`ConfigError`] - environment configuration problems
//! - [`ServerError`] - top-level HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Survey Source Errors
// =============================================================================

/// The survey export could not be obtained.
///
/// Callers treat every variant as the same "source unavailable" condition;
/// the variants only exist to make the message useful.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read the file.
    #[error("Failed to read survey export: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded as text.
    #[error("Failed to decode survey export: {0}")]
    Encoding(String),

    /// Failed to serialize records back to CSV.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Comment Errors
// =============================================================================

/// Errors from comment validation or the comment store.
#[derive(Debug, Error)]
pub enum CommentError {
    /// The submitted comment failed validation.
    #[error("Invalid comment: {}", .0.join(", "))]
    Invalid(Vec<String>),

    /// The remote store could not be reached.
    #[error("Comment store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote store answered with an error status.
    #[error("Comment store returned {status}: {message}")]
    Store { status: u16, message: String },

    /// The remote store answered with an unexpected body.
    #[error("Unexpected comment store response: {0}")]
    UnexpectedResponse(String),
}

// =============================================================================
// Trivia Errors
// =============================================================================

/// Invalid moves in a trivia game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriviaError {
    /// No category with this id or index.
    #[error("Unknown trivia category: {0}")]
    UnknownCategory(String),

    /// Selected option does not exist for the current question.
    #[error("Option {option} out of range (question has {available} options)")]
    OptionOutOfRange { option: usize, available: usize },

    /// The current question already has an answer.
    #[error("Question already answered")]
    AlreadyAnswered,

    /// Tried to advance before answering.
    #[error("Question not answered yet")]
    NotAnswered,

    /// The quiz is over.
    #[error("Quiz already complete")]
    QuizComplete,
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Environment configuration problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but unparseable.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    /// Only one half of a required pair was set.
    #[error("{present} is set but {missing} is missing")]
    Incomplete { present: String, missing: String },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Socket error.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for comment operations.
pub type CommentResult<T> = Result<T, CommentError>;

/// Result type for trivia operations.
pub type TriviaResult<T> = Result<T, TriviaError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let source: SourceError = io.into();
        assert!(source.to_string().contains("missing.csv"));

        let config = ConfigError::InvalidValue {
            name: "ECOWEEK_PORT".into(),
            value: "abc".into(),
        };
        let server: ServerError = config.into();
        assert!(server.to_string().contains("ECOWEEK_PORT"));
    }

    #[test]
    fn test_invalid_comment_lists_every_problem() {
        let err = CommentError::Invalid(vec!["name is required".into(), "email is invalid".into()]);
        let msg = err.to_string();
        assert!(msg.contains("name is required"));
        assert!(msg.contains("email is invalid"));
    }
}
