//! Multi-turn rule authoring.
//!
//! Each user message is parsed into a rule fragment and folded into the
//! session's draft:
//!
//! ```text
//! turn 1: "income > 50000"        draft = income > 50000
//! turn 2: "AND in vip_list"       draft = (income > 50000 AND IN vip_list)
//! turn 3: "age"                   question, pending = age
//! turn 4: ">= 21"                 parses "age >= 21", replaces the draft
//! ```
//!
//! Turns and finalization for the same session are serialized; different
//! sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use eligibility_rules::{
    LogicalOperator, PolicyValidator, RuleExporter, RuleNode, TurnResult, ValidationReport,
};
use parking_lot::Mutex;

use crate::config::OrchestratorConfig;
use crate::error::{SessionError, SessionResult};
use crate::result::FinalizeResult;
use crate::state::{ConversationState, FinalizedRule, Sender};
use crate::traits::{ConversationRepository, DraftParser, FinalizedRuleRepository};

const FINALIZED_MESSAGE: &str = "Finalized and saved.";
const REPORT_FALLBACK: &str = r#"{"valid":false, "errors":["Report Serialization Failed"]}"#;

/// Drives conversations from first message to published rule.
pub struct RuleAuthoringOrchestrator {
    conversations: Arc<dyn ConversationRepository>,
    finalized: Arc<dyn FinalizedRuleRepository>,
    parser: Arc<dyn DraftParser>,
    validator: PolicyValidator,
    exporter: RuleExporter,
    config: OrchestratorConfig,
    session_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RuleAuthoringOrchestrator {
    /// Creates an orchestrator with the default configuration.
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        finalized: Arc<dyn FinalizedRuleRepository>,
        parser: Arc<dyn DraftParser>,
    ) -> Self {
        Self::with_config(conversations, finalized, parser, OrchestratorConfig::default())
    }

    /// Creates an orchestrator with a custom configuration.
    pub fn with_config(
        conversations: Arc<dyn ConversationRepository>,
        finalized: Arc<dyn FinalizedRuleRepository>,
        parser: Arc<dyn DraftParser>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            conversations,
            finalized,
            parser,
            validator: PolicyValidator::new(config.policy.clone()),
            exporter: RuleExporter::new(),
            config,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Processes one user message and persists the updated session.
    ///
    /// The returned result carries the session's merged draft, not just the
    /// fragment parsed from this message.
    ///
    /// # Errors
    ///
    /// Returns an error if `session_id` is blank or the conversation
    /// repository fails. Parse problems are reported inside the result.
    pub fn process_user_message(&self, session_id: &str, text: &str) -> SessionResult<TurnResult> {
        if session_id.trim().is_empty() {
            return Err(SessionError::MissingSessionId);
        }
        self.with_session(session_id, || self.run_turn(session_id, text))
    }

    /// Validates, exports and publishes the session's draft.
    ///
    /// Never fails outright: every problem is described by the returned
    /// [`FinalizeResult`].
    ///
    /// The published rule is stored before the session is updated. If that
    /// second save fails the result reports `"Export failed: ..."` although
    /// the rule is already published, so a retry publishes it again.
    pub fn finalize_rule(&self, session_id: &str) -> FinalizeResult {
        if session_id.trim().is_empty() {
            return FinalizeResult::failure(SessionError::MissingSessionId.to_string(), None);
        }
        let result = self.with_session(session_id, || self.run_finalize(session_id));
        tracing::info!(
            session_id,
            success = result.success,
            message = %result.message,
            "finalize requested"
        );
        result
    }

    /// Loads a session's stored state.
    pub fn history(&self, session_id: &str) -> SessionResult<Option<ConversationState>> {
        self.conversations.find(session_id)
    }

    // ========================================================================
    // Turn processing
    // ========================================================================

    fn run_turn(&self, session_id: &str, text: &str) -> SessionResult<TurnResult> {
        let mut state = self
            .conversations
            .find(session_id)?
            .unwrap_or_else(|| ConversationState::new(session_id));
        state.add_message(Sender::User, text);

        let mut text_to_parse = text.trim().to_string();
        if let Some(pending) = state.pending_attribute.take() {
            text_to_parse = format!("{} {}", pending, text_to_parse);
        }

        let mut join = None;
        if state.current_draft_rule.is_some() {
            if let Some((operator, rest)) = split_join_prefix(&text_to_parse) {
                join = Some(operator);
                text_to_parse = rest.to_string();
            }
        }

        let mut result = self.parser.parse_to_draft(&text_to_parse);

        if let Some(fragment) = result.draft_rule.take() {
            match (join, state.current_draft_rule.take()) {
                (Some(operator), Some(existing)) => {
                    let depth = existing.nesting_depth().max(fragment.nesting_depth()) + 1;
                    if depth > self.config.max_draft_depth {
                        let message = format!(
                            "Rule is nested deeper than {} levels and cannot be extended. \
                             Finalize it or start a new rule.",
                            self.config.max_draft_depth
                        );
                        result.bot_reply = message.clone();
                        result.errors.push(message);
                        result.ready_to_finalize = false;
                        state.current_draft_rule = Some(existing);
                    } else {
                        let draft = RuleNode::binary(operator, existing, fragment);
                        result.bot_reply = format!("Updated rule with {} condition.", operator);
                        state.current_draft_rule = Some(draft.clone());
                        result.draft_rule = Some(draft);
                    }
                }
                _ => {
                    state.current_draft_rule = Some(fragment.clone());
                    result.draft_rule = Some(fragment);
                }
            }
        } else if result.is_asking_question() {
            if let Some(candidate) = &result.pending_attribute_candidate {
                state.pending_attribute = Some(candidate.clone());
            } else if is_bare_word(&text_to_parse) {
                state.pending_attribute = Some(text_to_parse.clone());
            }
        }

        state.add_message(Sender::Bot, result.bot_reply.clone());
        self.save_state(&mut state)?;

        tracing::debug!(
            session_id,
            join = ?join,
            has_draft = result.has_draft(),
            questions = result.questions.len(),
            errors = result.errors.len(),
            "turn processed"
        );
        Ok(result)
    }

    // ========================================================================
    // Finalization
    // ========================================================================

    fn run_finalize(&self, session_id: &str) -> FinalizeResult {
        let mut state = match self.conversations.find(session_id) {
            Ok(Some(state)) => state,
            Ok(None) => return FinalizeResult::failure("No active rule to finalize.", None),
            Err(e) => return FinalizeResult::failure(format!("Could not load session: {}", e), None),
        };
        let Some(draft) = state.current_draft_rule.clone() else {
            return FinalizeResult::failure("No active rule to finalize.", None);
        };

        let report = self.validator.validate(&draft);
        let report_json = serialize_report(&report);

        if !report.valid {
            let first = report.first_error().unwrap_or_default();
            return FinalizeResult::failure(format!("Validation Failed: {}", first), Some(report_json));
        }

        match self.publish(&mut state, &draft, &report_json) {
            Ok(final_json) => FinalizeResult::published(final_json, report_json),
            Err(e) => {
                tracing::warn!(session_id, error = %e, "rule publication failed");
                FinalizeResult::failure(format!("Export failed: {}", e), Some(report_json))
            }
        }
    }

    fn publish(
        &self,
        state: &mut ConversationState,
        draft: &RuleNode,
        report_json: &str,
    ) -> SessionResult<String> {
        let exported = self.exporter.to_value(draft)?;
        let final_json = serde_json::to_string_pretty(&exported)
            .map_err(|e| SessionError::Export(eligibility_rules::RuleError::Export(e.to_string())))?;

        self.finalized
            .save(&FinalizedRule::new(state.id.clone(), final_json.clone(), report_json))?;

        state.add_message(Sender::Bot, FINALIZED_MESSAGE);
        self.save_state(state)?;
        Ok(final_json)
    }

    fn save_state(&self, state: &mut ConversationState) -> SessionResult<()> {
        if let Some(max) = self.config.max_history {
            state.truncate_history(max);
        }
        self.conversations.save(state)
    }

    // ========================================================================
    // Per-session serialization
    // ========================================================================

    fn with_session<R>(&self, session_id: &str, f: impl FnOnce() -> R) -> R {
        let lock = Arc::clone(
            self.session_locks
                .lock()
                .entry(session_id.to_string())
                .or_default(),
        );

        let output = {
            let _guard = lock.lock();
            f()
        };
        drop(lock);

        // Entries are cloned only under the map lock, so a count of one means
        // no other caller holds or waits on this session
        let mut locks = self.session_locks.lock();
        if locks
            .get(session_id)
            .is_some_and(|l| Arc::strong_count(l) == 1)
        {
            locks.remove(session_id);
        }
        output
    }
}

/// Generates an id for a new session.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Splits a leading `AND ` / `OR ` (any case) off `text`.
fn split_join_prefix(text: &str) -> Option<(LogicalOperator, &str)> {
    let bytes = text.as_bytes();
    [LogicalOperator::And, LogicalOperator::Or]
        .into_iter()
        .find_map(|operator| {
            let keyword = operator.as_str().as_bytes();
            let n = keyword.len();
            let matches = bytes.len() > n
                && bytes[..n].eq_ignore_ascii_case(keyword)
                && bytes[n] == b' ';
            matches.then(|| (operator, text[n + 1..].trim()))
        })
}

fn is_bare_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

fn serialize_report(report: &ValidationReport) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| REPORT_FALLBACK.to_string())
}
