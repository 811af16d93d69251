//! Parser bound to the live metadata catalog.

use std::sync::Arc;

use eligibility_catalog::MetadataCatalog;
use eligibility_rules::{parse_to_draft_with_config, ParserConfig, TurnResult};

use crate::traits::DraftParser;

/// Parses messages against whatever metadata snapshot is current.
///
/// Each parse pins one snapshot, so a concurrent metadata refresh never
/// mixes old and new definitions within a single message.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use eligibility_catalog::{MetadataCatalog, MetadataDiscovery, StaticDiscovery};
/// use eligibility_session::{DraftParser, RuleAgent};
///
/// let demo = StaticDiscovery::demo();
/// let catalog = Arc::new(MetadataCatalog::new());
/// catalog.apply(demo.fetch_schema()?.into_values(), demo.fetch_lists()?);
///
/// let agent = RuleAgent::new(catalog);
/// assert!(agent.parse_to_draft("age >= 21").has_draft());
/// # Ok::<(), eligibility_catalog::CatalogError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuleAgent {
    catalog: Arc<MetadataCatalog>,
    config: ParserConfig,
}

impl RuleAgent {
    /// Creates an agent with the default parser configuration.
    pub fn new(catalog: Arc<MetadataCatalog>) -> Self {
        Self::with_config(catalog, ParserConfig::default())
    }

    /// Creates an agent with a custom parser configuration.
    pub fn with_config(catalog: Arc<MetadataCatalog>, config: ParserConfig) -> Self {
        Self { catalog, config }
    }

    /// The catalog this agent reads from.
    pub fn catalog(&self) -> &Arc<MetadataCatalog> {
        &self.catalog
    }
}

impl DraftParser for RuleAgent {
    fn parse_to_draft(&self, text: &str) -> TurnResult {
        let snapshot = self.catalog.snapshot();
        parse_to_draft_with_config(text, &*snapshot, &*snapshot, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eligibility_rules::{AttributeDef, AttributeType};

    fn agent() -> RuleAgent {
        let catalog = Arc::new(MetadataCatalog::new());
        catalog.apply(
            [AttributeDef::new("income", AttributeType::Integer, [">", "<"])],
            ["blocked_users"],
        );
        RuleAgent::new(catalog)
    }

    #[test]
    fn test_lookups_ignore_case_through_catalog() {
        let turn = agent().parse_to_draft("INCOME > 5 AND NOT in BLOCKED_USERS");
        assert_eq!(
            turn.draft_rule.map(|r| r.to_string()).as_deref(),
            Some("(income > 5 AND NOT (IN blocked_users))")
        );
    }

    #[test]
    fn test_sees_newly_installed_metadata() {
        let agent = agent();
        assert!(!agent.parse_to_draft("in vip_list").has_draft());

        agent.catalog().apply(Vec::<AttributeDef>::new(), ["vip_list"]);
        assert!(agent.parse_to_draft("in vip_list").has_draft());
    }

    #[test]
    fn test_parser_config_applies() {
        let catalog = Arc::clone(agent().catalog());
        let shallow = RuleAgent::with_config(catalog, ParserConfig::default().with_max_depth(1));
        let turn = shallow.parse_to_draft("NOT NOT in blocked_users");
        assert!(turn.errors[0].starts_with("Parsing error:"));
    }
}
