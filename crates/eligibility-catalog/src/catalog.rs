//! Hot-swappable holder of the current metadata snapshot.

use std::sync::Arc;

use eligibility_rules::AttributeDef;
use parking_lot::RwLock;

use crate::snapshot::MetadataSnapshot;

/// Shared, copy-on-write access to the current [`MetadataSnapshot`].
///
/// Readers take an `Arc` to whichever snapshot is current and keep using it
/// for the whole operation, even if a new snapshot is installed meanwhile.
///
/// # Example
///
/// ```rust
/// use eligibility_catalog::{MetadataCatalog, MetadataSnapshot};
/// use eligibility_rules::{AttributeDef, ListCatalog};
///
/// let catalog = MetadataCatalog::new();
/// let before = catalog.snapshot();
///
/// catalog.install(MetadataSnapshot::new(Vec::<AttributeDef>::new(), ["vip_list"]));
///
/// assert!(!before.list_exists("vip_list"));
/// assert!(catalog.snapshot().list_exists("vip_list"));
/// ```
#[derive(Debug, Default)]
pub struct MetadataCatalog {
    current: RwLock<Arc<MetadataSnapshot>>,
}

impl MetadataCatalog {
    /// Creates a catalog holding an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the given snapshot.
    pub fn with_snapshot(snapshot: MetadataSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<MetadataSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the current snapshot, returning the previous one.
    pub fn install(&self, snapshot: MetadataSnapshot) -> Arc<MetadataSnapshot> {
        tracing::info!(
            attributes = snapshot.attribute_count(),
            lists = snapshot.list_count(),
            "metadata snapshot applied"
        );
        let next = Arc::new(snapshot);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Builds a snapshot from parts and installs it.
    pub fn apply<A, L, S>(&self, attributes: A, lists: L) -> Arc<MetadataSnapshot>
    where
        A: IntoIterator<Item = AttributeDef>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.install(MetadataSnapshot::new(attributes, lists))
    }
}
