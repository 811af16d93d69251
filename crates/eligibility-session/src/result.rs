//! Outcome of finalizing a session.

use serde::{Deserialize, Serialize};

/// Result of [`RuleAuthoringOrchestrator::finalize_rule`](crate::RuleAuthoringOrchestrator::finalize_rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResult {
    /// True when the rule was published.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Exported rule, present only on success.
    pub final_rule_json: Option<String>,
    /// Serialized validation report, present once validation ran.
    pub validation_report_json: Option<String>,
}

impl FinalizeResult {
    /// A successful publication.
    pub fn published(final_rule_json: String, validation_report_json: String) -> Self {
        Self {
            success: true,
            message: "Rule Published!".to_string(),
            final_rule_json: Some(final_rule_json),
            validation_report_json: Some(validation_report_json),
        }
    }

    /// A failed finalization.
    pub fn failure(message: impl Into<String>, validation_report_json: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            final_rule_json: None,
            validation_report_json,
        }
    }
}
