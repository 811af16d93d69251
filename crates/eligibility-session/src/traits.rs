//! Seams between the orchestrator and its collaborators.
//!
//! The orchestrator only talks to storage and parsing through these traits.
//! In-memory implementations live in [`store`](crate::store); the
//! catalog-backed parser is [`RuleAgent`](crate::RuleAgent).
//!
//! # Example: A repository that never stores anything
//!
//! ```rust
//! use eligibility_session::{ConversationRepository, ConversationState, SessionResult};
//!
//! struct Forgetful;
//!
//! impl ConversationRepository for Forgetful {
//!     fn find(&self, _id: &str) -> SessionResult<Option<ConversationState>> {
//!         Ok(None)
//!     }
//!
//!     fn save(&self, _state: &ConversationState) -> SessionResult<()> {
//!         Ok(())
//!     }
//! }
//! ```

use eligibility_rules::TurnResult;

use crate::error::SessionResult;
use crate::state::{ConversationState, FinalizedRule};

/// Storage for conversation state, keyed by session id.
pub trait ConversationRepository: Send + Sync {
    /// Loads a session.
    fn find(&self, id: &str) -> SessionResult<Option<ConversationState>>;

    /// Inserts or replaces a session.
    fn save(&self, state: &ConversationState) -> SessionResult<()>;
}

/// Storage for published rules.
pub trait FinalizedRuleRepository: Send + Sync {
    /// Stores a published rule.
    fn save(&self, rule: &FinalizedRule) -> SessionResult<()>;
}

/// Turns one message into a draft rule.
pub trait DraftParser: Send + Sync {
    /// Parses rule text.
    fn parse_to_draft(&self, text: &str) -> TurnResult;
}
