//! # eligibility-catalog
//!
//! Attribute schema and list catalog for the `eligibility-rules` parser.
//!
//! The parser resolves names through the `SchemaLookup` and `ListCatalog`
//! traits. This crate implements them over immutable metadata snapshots
//! and keeps the current snapshot in a hot-swappable catalog.
//!
//! ## Features
//!
//! - **`persistence`** (default): persistent metadata cache (file or
//!   in-memory) and the warmup routine that reads it
//!
//! ## Quick Start
//!
//! ### Installing metadata directly
//!
//! ```rust
//! use eligibility_catalog::MetadataCatalog;
//! use eligibility_rules::{parse_to_draft, AttributeDef, AttributeType};
//!
//! let catalog = MetadataCatalog::new();
//! catalog.apply(
//!     [AttributeDef::new("income", AttributeType::Integer, [">", "<"])],
//!     ["blocked_users"],
//! );
//!
//! // One snapshot per parse
//! let snapshot = catalog.snapshot();
//! let turn = parse_to_draft("INCOME > 100 AND NOT in blocked_users", &*snapshot, &*snapshot);
//! assert!(turn.has_draft());
//! ```
//!
//! ### Warming up from cache or discovery (feature: `persistence`)
//!
//! ```ignore
//! use eligibility_catalog::persistence::FileMetadataCache;
//! use eligibility_catalog::{MetadataCatalog, MetadataWarmup, StaticDiscovery};
//!
//! let cache = FileMetadataCache::new("/var/cache/eligibility");
//! let catalog = MetadataCatalog::new();
//! MetadataWarmup::new(&cache, &StaticDiscovery::demo(), &catalog).run()?;
//! ```

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod snapshot;

// Feature-gated modules
#[cfg(feature = "persistence")]
pub mod persistence;

#[cfg(feature = "persistence")]
pub mod warmup;

// Re-export commonly used types
pub use catalog::MetadataCatalog;
pub use discovery::{MetadataDiscovery, StaticDiscovery};
pub use error::{CatalogError, CatalogResult};
pub use snapshot::MetadataSnapshot;

#[cfg(feature = "persistence")]
pub use warmup::{MetadataSource, MetadataWarmup, WarmupReport, LISTS_KEY, SCHEMA_KEY};
