//! Startup routine that fills the [`MetadataCatalog`].
//!
//! For each metadata part the persistent cache is consulted first. A missing
//! or unreadable entry falls back to the discovery source, and the fetched
//! value is written back to the cache. Both parts are then installed as one
//! snapshot.

use std::collections::{BTreeMap, BTreeSet};

use eligibility_rules::AttributeDef;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::MetadataCatalog;
use crate::discovery::MetadataDiscovery;
use crate::error::{CatalogError, CatalogResult};
use crate::persistence::{CachedMetadata, MetadataCache};
use crate::snapshot::MetadataSnapshot;

/// Cache key of the attribute schema.
pub const SCHEMA_KEY: &str = "SCHEMA";

/// Cache key of the list names.
pub const LISTS_KEY: &str = "LISTS";

/// Where a metadata part was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// Read from the persistent cache.
    Cache,
    /// Fetched from the discovery source (and written to the cache).
    Remote,
}

/// Summary of a warmup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmupReport {
    /// Origin of the attribute schema.
    pub schema_source: MetadataSource,
    /// Origin of the list names.
    pub lists_source: MetadataSource,
    /// Attributes in the installed snapshot.
    pub attribute_count: usize,
    /// Lists in the installed snapshot.
    pub list_count: usize,
}

/// Loads metadata through the cache and installs it into a catalog.
///
/// # Example
///
/// ```rust
/// use eligibility_catalog::persistence::InMemoryMetadataCache;
/// use eligibility_catalog::{MetadataCatalog, MetadataSource, MetadataWarmup, StaticDiscovery};
///
/// let cache = InMemoryMetadataCache::new();
/// let discovery = StaticDiscovery::demo();
/// let catalog = MetadataCatalog::new();
///
/// let warmup = MetadataWarmup::new(&cache, &discovery, &catalog);
/// let first = warmup.run().unwrap();
/// let second = warmup.run().unwrap();
///
/// assert_eq!(first.schema_source, MetadataSource::Remote);
/// assert_eq!(second.schema_source, MetadataSource::Cache);
/// assert_eq!(catalog.snapshot().attribute_count(), 4);
/// ```
pub struct MetadataWarmup<'a> {
    cache: &'a dyn MetadataCache,
    discovery: &'a dyn MetadataDiscovery,
    catalog: &'a MetadataCatalog,
}

impl<'a> MetadataWarmup<'a> {
    /// Creates a warmup over the given cache, discovery source and catalog.
    pub fn new(
        cache: &'a dyn MetadataCache,
        discovery: &'a dyn MetadataDiscovery,
        catalog: &'a MetadataCatalog,
    ) -> Self {
        Self {
            cache,
            discovery,
            catalog,
        }
    }

    /// Runs the warmup and installs the resulting snapshot.
    ///
    /// Discovery and cache-write failures are returned; the catalog keeps
    /// its previous snapshot in that case.
    pub fn run(&self) -> CatalogResult<WarmupReport> {
        let (schema, schema_source): (BTreeMap<String, AttributeDef>, _) =
            self.load_or_fetch(SCHEMA_KEY, || self.discovery.fetch_schema())?;
        let (lists, lists_source): (BTreeSet<String>, _) =
            self.load_or_fetch(LISTS_KEY, || self.discovery.fetch_lists())?;

        let snapshot = MetadataSnapshot::new(schema.into_values(), lists);
        let report = WarmupReport {
            schema_source,
            lists_source,
            attribute_count: snapshot.attribute_count(),
            list_count: snapshot.list_count(),
        };
        self.catalog.install(snapshot);

        tracing::info!(
            schema_source = ?report.schema_source,
            lists_source = ?report.lists_source,
            "metadata warmup complete"
        );
        Ok(report)
    }

    fn load_or_fetch<T, F>(&self, key: &str, fetch: F) -> CatalogResult<(T, MetadataSource)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> CatalogResult<T>,
    {
        match self.read_cached(key) {
            Ok(Some(value)) => {
                tracing::debug!(key, "metadata loaded from cache");
                return Ok((value, MetadataSource::Cache));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key, error = %e, "ignoring unreadable metadata cache entry"),
        }

        tracing::info!(key, "fetching metadata from discovery source");
        let value = fetch()?;
        let json = serde_json::to_string(&value)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        self.cache.save(&CachedMetadata::new(key, json))?;
        Ok((value, MetadataSource::Remote))
    }

    fn read_cached<T: DeserializeOwned>(&self, key: &str) -> CatalogResult<Option<T>> {
        let Some(entry) = self.cache.find(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&entry.json)
            .map_err(|e| CatalogError::corrupt(key, e.to_string()))?;
        Ok(Some(value))
    }
}
