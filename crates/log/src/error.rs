//! Error types for logger setup

/// Result type for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while building the logger
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// Filter directive could not be parsed
    #[error("Invalid filter '{filter}': {reason}")]
    Filter {
        /// Directive as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// Configuration value is not recognized
    #[error("Configuration error: {0}")]
    Config(String),

    /// A global subscriber is already installed
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

impl LogError {
    /// Create a filter parsing error
    pub fn filter(filter: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }
}
