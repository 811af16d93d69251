//! # eligibility-session
//!
//! Multi-turn authoring of eligibility rules.
//!
//! A session accumulates a draft rule across chat turns. Each message is
//! parsed against the live metadata catalog; fragments that start with
//! `AND` or `OR` are merged into the existing draft, and a lone attribute
//! name is remembered until the user supplies its operator and value.
//! Finalizing validates the draft against policy, exports it to canonical
//! JSON and stores the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use eligibility_catalog::{MetadataCatalog, MetadataDiscovery, StaticDiscovery};
//! use eligibility_session::{
//!     InMemoryConversationStore, InMemoryFinalizedRuleStore, RuleAgent,
//!     RuleAuthoringOrchestrator,
//! };
//!
//! let demo = StaticDiscovery::demo();
//! let catalog = Arc::new(MetadataCatalog::new());
//! catalog.apply(demo.fetch_schema()?.into_values(), demo.fetch_lists()?);
//!
//! let orchestrator = RuleAuthoringOrchestrator::new(
//!     Arc::new(InMemoryConversationStore::new()),
//!     Arc::new(InMemoryFinalizedRuleStore::new()),
//!     Arc::new(RuleAgent::new(catalog)),
//! );
//!
//! orchestrator.process_user_message("s1", "income > 50000").unwrap();
//! let turn = orchestrator.process_user_message("s1", "AND in premium_users").unwrap();
//! assert_eq!(turn.bot_reply, "Updated rule with AND condition.");
//!
//! let published = orchestrator.finalize_rule("s1");
//! assert!(published.success);
//! # Ok::<(), eligibility_catalog::CatalogError>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use eligibility_rules::PolicyConfig;
//! use eligibility_session::OrchestratorConfig;
//!
//! let config = OrchestratorConfig::builder()
//!     .with_policy(PolicyConfig::builder().with_minimum_credit_score(650).build())
//!     .with_max_history(200)
//!     .build();
//! assert_eq!(config.max_history, Some(200));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod agent;
mod config;
mod error;
mod orchestrator;
mod result;
mod state;
mod store;
mod traits;

// Public re-exports
pub use agent::RuleAgent;
pub use config::{OrchestratorConfig, OrchestratorConfigBuilder, SessionStoreConfig};
pub use error::{SessionError, SessionResult};
pub use orchestrator::{new_session_id, RuleAuthoringOrchestrator};
pub use result::FinalizeResult;
pub use state::{ChatMessage, ConversationState, FinalizedRule, Sender};
pub use store::{InMemoryConversationStore, InMemoryFinalizedRuleStore};
pub use traits::{ConversationRepository, DraftParser, FinalizedRuleRepository};

// Re-export the rule types callers see in turn results
pub use eligibility_rules::{RuleNode, TurnResult};
