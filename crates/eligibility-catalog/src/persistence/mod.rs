//! Persistent cache for fetched metadata.
//!
//! Metadata is cached as JSON documents keyed by a short id (`SCHEMA`,
//! `LISTS`) so a restart can skip the remote discovery round-trip.
//!
//! # File Format
//!
//! [`FileMetadataCache`] stores one pretty-printed JSON file per key:
//!
//! ```text
//! <dir>/SCHEMA.json
//! {
//!   "id": "SCHEMA",
//!   "json": "{\"age\":{...}}",
//!   "updatedAt": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use eligibility_catalog::persistence::{CachedMetadata, InMemoryMetadataCache, MetadataCache};
//!
//! let cache = InMemoryMetadataCache::new();
//! cache.save(&CachedMetadata::new("LISTS", r#"["vip_list"]"#)).unwrap();
//!
//! let entry = cache.find("LISTS").unwrap().unwrap();
//! assert_eq!(entry.json, r#"["vip_list"]"#);
//! ```

mod file;

pub use file::FileMetadataCache;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CatalogResult;

/// A cached metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedMetadata {
    /// Cache key.
    pub id: String,
    /// The cached payload as a JSON string.
    pub json: String,
    /// When the entry was written.
    pub updated_at: DateTime<Utc>,
}

impl CachedMetadata {
    /// Creates an entry stamped with the current time.
    pub fn new(id: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            json: json.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Key-value store for cached metadata documents.
pub trait MetadataCache: Send + Sync {
    /// Looks up an entry by key.
    fn find(&self, id: &str) -> CatalogResult<Option<CachedMetadata>>;

    /// Inserts or replaces an entry.
    fn save(&self, entry: &CachedMetadata) -> CatalogResult<()>;
}

/// Process-local cache, mainly for tests and single-run tools.
#[derive(Debug, Default)]
pub struct InMemoryMetadataCache {
    entries: RwLock<HashMap<String, CachedMetadata>>,
}

impl InMemoryMetadataCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl MetadataCache for InMemoryMetadataCache {
    fn find(&self, id: &str) -> CatalogResult<Option<CachedMetadata>> {
        Ok(self.entries.read().get(id).cloned())
    }

    fn save(&self, entry: &CachedMetadata) -> CatalogResult<()> {
        self.entries.write().insert(entry.id.clone(), entry.clone());
        Ok(())
    }
}
