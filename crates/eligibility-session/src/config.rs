//! Configuration types for rule authoring sessions.

use eligibility_rules::{ParserConfig, PolicyConfig};

/// Configuration for the rule authoring orchestrator.
///
/// # Example
///
/// ```rust
/// use eligibility_rules::PolicyConfig;
/// use eligibility_session::OrchestratorConfig;
///
/// let config = OrchestratorConfig::builder()
///     .with_policy(PolicyConfig::builder().with_minimum_credit_score(350).build())
///     .with_max_history(200)
///     .build();
///
/// assert_eq!(config.policy.minimum_credit_score, 350);
/// assert_eq!(config.max_history, Some(200));
/// ```
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Policy applied at finalization.
    pub policy: PolicyConfig,
    /// Maximum messages kept per session (None = unlimited). Oldest go first.
    pub max_history: Option<usize>,
    /// Combinator levels a merged draft may reach through `AND`/`OR` turns.
    pub max_draft_depth: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            max_history: None,
            max_draft_depth: ParserConfig::default().max_depth,
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new builder for OrchestratorConfig.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }
}

/// Builder for OrchestratorConfig.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfigBuilder {
    policy: PolicyConfig,
    max_history: Option<usize>,
    max_draft_depth: Option<usize>,
}

impl OrchestratorConfigBuilder {
    /// Sets the finalization policy.
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Caps the stored history per session.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = Some(max_history);
        self
    }

    /// Caps how deep turn-by-turn joins may nest the draft.
    pub fn with_max_draft_depth(mut self, max_draft_depth: usize) -> Self {
        self.max_draft_depth = Some(max_draft_depth);
        self
    }

    /// Builds the OrchestratorConfig.
    pub fn build(self) -> OrchestratorConfig {
        let defaults = OrchestratorConfig::default();
        OrchestratorConfig {
            policy: self.policy,
            max_history: self.max_history,
            max_draft_depth: self.max_draft_depth.unwrap_or(defaults.max_draft_depth),
        }
    }
}

/// Configuration for the in-memory conversation store.
///
/// # Example
///
/// ```rust
/// use eligibility_session::SessionStoreConfig;
///
/// let config = SessionStoreConfig { max_sessions: 500 };
/// assert_eq!(SessionStoreConfig::default().max_sessions, 10_000);
/// # let _ = config;
/// ```
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Sessions kept before the least recently used one is evicted.
    pub max_sessions: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
        }
    }
}
