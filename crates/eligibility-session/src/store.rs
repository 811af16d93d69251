//! In-memory repositories.
//!
//! Conversations live in an LRU map so abandoned sessions are evicted once
//! the configured capacity is reached.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::{Mutex, RwLock};

use crate::config::SessionStoreConfig;
use crate::error::SessionResult;
use crate::state::{ConversationState, FinalizedRule};
use crate::traits::{ConversationRepository, FinalizedRuleRepository};

/// Thread-safe, bounded conversation store.
///
/// # Example
///
/// ```rust
/// use eligibility_session::{
///     ConversationRepository, ConversationState, InMemoryConversationStore, SessionStoreConfig,
/// };
///
/// let store = InMemoryConversationStore::with_config(SessionStoreConfig { max_sessions: 1 });
/// store.save(&ConversationState::new("a")).unwrap();
/// store.save(&ConversationState::new("b")).unwrap();
///
/// // "a" was least recently used
/// assert!(store.find("a").unwrap().is_none());
/// assert!(store.find("b").unwrap().is_some());
/// ```
pub struct InMemoryConversationStore {
    inner: Mutex<LruCache<String, ConversationState>>,
}

impl InMemoryConversationStore {
    /// Creates a store with the default capacity.
    pub fn new() -> Self {
        Self::with_config(SessionStoreConfig::default())
    }

    /// Creates a store with the given configuration.
    pub fn with_config(config: SessionStoreConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if no session is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationRepository for InMemoryConversationStore {
    fn find(&self, id: &str) -> SessionResult<Option<ConversationState>> {
        Ok(self.inner.lock().get(id).cloned())
    }

    fn save(&self, state: &ConversationState) -> SessionResult<()> {
        self.inner.lock().put(state.id.clone(), state.clone());
        Ok(())
    }
}

/// Append-only store of published rules.
#[derive(Debug, Default)]
pub struct InMemoryFinalizedRuleStore {
    rules: RwLock<Vec<FinalizedRule>>,
}

impl InMemoryFinalizedRuleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All published rules, oldest first.
    pub fn all(&self) -> Vec<FinalizedRule> {
        self.rules.read().clone()
    }

    /// Published rules of one session, oldest first.
    pub fn for_session(&self, session_id: &str) -> Vec<FinalizedRule> {
        self.rules
            .read()
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect()
    }

    /// Number of published rules.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns true if nothing was published.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl FinalizedRuleRepository for InMemoryFinalizedRuleStore {
    fn save(&self, rule: &FinalizedRule) -> SessionResult<()> {
        self.rules.write().push(rule.clone());
        Ok(())
    }
}
