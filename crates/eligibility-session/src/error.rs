//! Error types for rule authoring sessions.

use eligibility_rules::RuleError;
use thiserror::Error;

/// Errors that can occur while processing a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The caller supplied a blank session id.
    #[error("Session ID is missing.")]
    MissingSessionId,

    /// A repository could not load or store a record.
    #[error("Repository error: {0}")]
    Repository(String),

    /// The draft rule could not be exported.
    #[error("{0}")]
    Export(#[from] RuleError),
}

impl SessionError {
    /// Creates a repository error.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository(message.into())
    }
}

/// Result type for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_session_id() {
        assert_eq!(SessionError::MissingSessionId.to_string(), "Session ID is missing.");
    }

    #[test]
    fn test_error_display_repository() {
        let err = SessionError::repository("connection refused");
        assert_eq!(err.to_string(), "Repository error: connection refused");
    }

    #[test]
    fn test_error_from_rule_error() {
        let err: SessionError = RuleError::Export("non-finite number NaN".to_string()).into();
        assert!(matches!(err, SessionError::Export(_)));
        assert_eq!(err.to_string(), "cannot export rule: non-finite number NaN");
    }
}
