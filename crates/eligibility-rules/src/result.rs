//! Outcome of one parse attempt.

use serde::{Deserialize, Serialize};

use crate::ast::RuleNode;

/// Result of turning one user message into a draft rule.
///
/// A parse attempt ends in one of three shapes: a complete rule, a single
/// clarifying question, or one or more error messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    /// The rule built from the message (merged with the session draft when
    /// returned by the orchestrator).
    pub draft_rule: Option<RuleNode>,
    /// Reply shown to the user.
    pub bot_reply: String,
    /// Clarifying questions (at most one per parse).
    pub questions: Vec<String>,
    /// Error messages, in the order they were found.
    pub errors: Vec<String>,
    /// Attribute name awaiting an operator and value.
    pub pending_attribute_candidate: Option<String>,
    /// True when the draft is complete enough to finalize.
    pub ready_to_finalize: bool,
}

impl TurnResult {
    /// Creates an empty result carrying only a reply.
    pub fn reply(bot_reply: impl Into<String>) -> Self {
        Self {
            bot_reply: bot_reply.into(),
            ..Self::default()
        }
    }

    /// True if a rule was produced.
    pub fn has_draft(&self) -> bool {
        self.draft_rule.is_some()
    }

    /// True if the parser is asking for clarification.
    pub fn is_asking_question(&self) -> bool {
        !self.questions.is_empty()
    }

    /// True if any error was reported.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
