//! Persisted session records.

use chrono::{DateTime, Utc};
use eligibility_rules::RuleNode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// The person describing the rule.
    User,
    /// The rule authoring assistant.
    Bot,
}

/// One entry of a session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub sender: Sender,
    /// Message text as sent.
    pub text: String,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// State of one rule authoring conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// Session id.
    pub id: String,
    /// Transcript, oldest first.
    pub history: Vec<ChatMessage>,
    /// Rule built so far.
    pub current_draft_rule: Option<RuleNode>,
    /// Attribute named in an earlier turn that still needs an operator and value.
    pub pending_attribute: Option<String>,
}

impl ConversationState {
    /// Creates an empty conversation.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
            current_draft_rule: None,
            pending_attribute: None,
        }
    }

    /// Appends a message to the transcript.
    pub fn add_message(&mut self, sender: Sender, text: impl Into<String>) {
        self.history.push(ChatMessage::new(sender, text));
    }

    /// Drops the oldest messages beyond `max`.
    pub fn truncate_history(&mut self, max: usize) {
        if self.history.len() > max {
            let excess = self.history.len() - max;
            self.history.drain(..excess);
        }
    }
}

/// A published rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedRule {
    /// Generated record id.
    pub id: Uuid,
    /// Session the rule was authored in.
    pub session_id: String,
    /// Exported rule JSON.
    pub final_rule_json: String,
    /// Serialized validation report.
    pub validation_report_json: String,
    /// When the rule was published.
    pub created_at: DateTime<Utc>,
}

impl FinalizedRule {
    /// Creates a record with a fresh id and the current time.
    pub fn new(
        session_id: impl Into<String>,
        final_rule_json: impl Into<String>,
        validation_report_json: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            final_rule_json: final_rule_json.into(),
            validation_report_json: validation_report_json.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_history_keeps_newest() {
        let mut state = ConversationState::new("s1");
        for i in 0..5 {
            state.add_message(Sender::User, format!("message {}", i));
        }
        state.truncate_history(2);
        let texts: Vec<&str> = state.history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["message 3", "message 4"]);

        state.truncate_history(10);
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn test_state_serde_shape() {
        let mut state = ConversationState::new("s1");
        state.add_message(Sender::Bot, "hi");
        state.current_draft_rule = Some(RuleNode::list("vip_list"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["id"], "s1");
        assert_eq!(json["history"][0]["sender"], "Bot");
        assert_eq!(json["currentDraftRule"]["type"], "LIST");
        assert!(json["pendingAttribute"].is_null());

        let back: ConversationState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_finalized_rule_ids_are_unique() {
        let a = FinalizedRule::new("s1", "{}", "{}");
        let b = FinalizedRule::new("s1", "{}", "{}");
        assert_ne!(a.id, b.id);
        assert_eq!(a.session_id, "s1");
    }
}
