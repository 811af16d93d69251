//! Immutable view of the attribute schema and list catalog.

use std::collections::{BTreeMap, BTreeSet};

use eligibility_rules::{AttributeDef, ListCatalog, SchemaLookup};

/// One consistent set of attribute definitions and list names.
///
/// Names are keyed lowercase, so lookups ignore case. A snapshot never
/// changes after construction; the [`MetadataCatalog`](crate::MetadataCatalog)
/// swaps whole snapshots instead.
///
/// # Example
///
/// ```rust
/// use eligibility_catalog::MetadataSnapshot;
/// use eligibility_rules::{AttributeDef, AttributeType, ListCatalog, SchemaLookup};
///
/// let snapshot = MetadataSnapshot::new(
///     [AttributeDef::new("income", AttributeType::Integer, [">"])],
///     ["VIP_List"],
/// );
///
/// assert!(snapshot.get_attribute("Income").is_some());
/// assert!(snapshot.list_exists("vip_list"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSnapshot {
    attributes: BTreeMap<String, AttributeDef>,
    lists: BTreeSet<String>,
}

impl MetadataSnapshot {
    /// Builds a snapshot from attribute definitions and list names.
    pub fn new<A, L, S>(attributes: A, lists: L) -> Self
    where
        A: IntoIterator<Item = AttributeDef>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|def| (def.name.to_lowercase(), def))
                .collect(),
            lists: lists
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// An empty snapshot; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of attribute definitions.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Number of lists.
    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    /// True if the snapshot holds neither attributes nor lists.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.lists.is_empty()
    }

    /// Iterates over the attribute definitions in name order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.values()
    }
}

impl SchemaLookup for MetadataSnapshot {
    fn get_attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.get(&name.to_lowercase())
    }

    fn all_attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }
}

impl ListCatalog for MetadataSnapshot {
    fn list_exists(&self, name: &str) -> bool {
        self.lists.contains(&name.to_lowercase())
    }

    fn all_lists(&self) -> Vec<String> {
        self.lists.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eligibility_rules::AttributeType;

    fn sample() -> MetadataSnapshot {
        MetadataSnapshot::new(
            [
                AttributeDef::new("income", AttributeType::Integer, [">", "<"]),
                AttributeDef::new("age", AttributeType::Integer, [">", "<"]),
            ],
            ["premium_users", "Blocked_Users"],
        )
    }

    #[test]
    fn test_lookups_ignore_case() {
        let snapshot = sample();
        assert_eq!(snapshot.get_attribute("AGE").map(|d| d.name.as_str()), Some("age"));
        assert!(snapshot.list_exists("BLOCKED_USERS"));
        assert!(!snapshot.list_exists("vip_list"));
    }

    #[test]
    fn test_names_are_sorted() {
        let snapshot = sample();
        assert_eq!(snapshot.all_attribute_names(), vec!["age", "income"]);
        assert_eq!(snapshot.all_lists(), vec!["blocked_users", "premium_users"]);
    }

    #[test]
    fn test_suggestions_use_snapshot_names() {
        let snapshot = sample();
        assert_eq!(snapshot.suggest_attributes("incom"), vec!["income".to_string()]);
        assert_eq!(snapshot.suggest_lists("premium_user"), vec!["premium_users".to_string()]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MetadataSnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.attribute_count(), 0);
        assert!(snapshot.get_attribute("income").is_none());
    }
}
