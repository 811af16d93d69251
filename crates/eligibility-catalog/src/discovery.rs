//! Sources of authoritative metadata.

use std::collections::{BTreeMap, BTreeSet};

use eligibility_rules::{AttributeDef, AttributeType};

use crate::error::CatalogResult;

const NUMERIC_OPERATORS: [&str; 6] = [">", "<", ">=", "<=", "==", "!="];

/// A remote (or otherwise authoritative) source of schema and list metadata.
pub trait MetadataDiscovery: Send + Sync {
    /// Fetches attribute definitions keyed by attribute name.
    fn fetch_schema(&self) -> CatalogResult<BTreeMap<String, AttributeDef>>;

    /// Fetches the known list names.
    fn fetch_lists(&self) -> CatalogResult<BTreeSet<String>>;
}

/// Discovery source backed by fixed data.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    schema: BTreeMap<String, AttributeDef>,
    lists: BTreeSet<String>,
}

impl StaticDiscovery {
    /// Creates a source serving the given metadata.
    pub fn new<A, L, S>(attributes: A, lists: L) -> Self
    where
        A: IntoIterator<Item = AttributeDef>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema: attributes
                .into_iter()
                .map(|def| (def.name.clone(), def))
                .collect(),
            lists: lists.into_iter().map(Into::into).collect(),
        }
    }

    /// Reference metadata for a lending product: numeric `income`, `age` and
    /// `credit_score`, a string `city`, and four user lists.
    pub fn demo() -> Self {
        Self::new(
            [
                AttributeDef::new("income", AttributeType::Integer, NUMERIC_OPERATORS),
                AttributeDef::new("age", AttributeType::Integer, NUMERIC_OPERATORS),
                AttributeDef::new("city", AttributeType::String, ["==", "!=", "IN"]),
                AttributeDef::new("credit_score", AttributeType::Integer, NUMERIC_OPERATORS),
            ],
            ["premium_users", "blocked_users", "vip_list", "employees"],
        )
    }
}

impl MetadataDiscovery for StaticDiscovery {
    fn fetch_schema(&self) -> CatalogResult<BTreeMap<String, AttributeDef>> {
        Ok(self.schema.clone())
    }

    fn fetch_lists(&self) -> CatalogResult<BTreeSet<String>> {
        Ok(self.lists.clone())
    }
}
