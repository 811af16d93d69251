//! Error types for rule compilation.

use thiserror::Error;

/// Internal faults raised while compiling a rule.
///
/// Ordinary parse problems (unknown attributes, missing values, stray
/// tokens) are reported as data on [`TurnResult`](crate::TurnResult), not as
/// errors. These variants cover the cases where the parser cannot continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A numeric literal could not be represented.
    #[error("invalid number literal '{literal}': {reason}")]
    InvalidNumber {
        /// The literal text as typed.
        literal: String,
        /// Why conversion failed.
        reason: String,
    },

    /// Parenthesis or `NOT` nesting exceeded the configured limit.
    #[error("expression nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },

    /// A rule could not be exported.
    #[error("cannot export rule: {0}")]
    Export(String),
}

/// Result type for rule operations.
pub type RuleResult<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_number() {
        let err = RuleError::InvalidNumber {
            literal: "99999999999999999999".to_string(),
            reason: "number too large to fit in target type".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid number literal '99999999999999999999': number too large to fit in target type"
        );
    }

    #[test]
    fn test_error_display_nesting() {
        let err = RuleError::NestingTooDeep { limit: 64 };
        assert_eq!(err.to_string(), "expression nested deeper than 64 levels");
    }
}
