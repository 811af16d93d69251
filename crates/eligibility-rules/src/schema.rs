//! Attribute schema and list catalog interfaces.
//!
//! The parser resolves names through the [`SchemaLookup`] and
//! [`ListCatalog`] traits. Implementations live outside this crate (see
//! `eligibility-catalog`); the traits provide default fuzzy suggestions so
//! implementors only need to supply the name sets.
//!
//! # Example: Implementing the lookups for a fixed schema
//!
//! ```rust
//! use std::collections::HashMap;
//! use eligibility_rules::{AttributeDef, AttributeType, SchemaLookup};
//!
//! struct FixedSchema(HashMap<String, AttributeDef>);
//!
//! impl SchemaLookup for FixedSchema {
//!     fn get_attribute(&self, name: &str) -> Option<&AttributeDef> {
//!         self.0.get(name)
//!     }
//!
//!     fn all_attribute_names(&self) -> Vec<String> {
//!         self.0.keys().cloned().collect()
//!     }
//! }
//!
//! let mut defs = HashMap::new();
//! defs.insert(
//!     "income".to_string(),
//!     AttributeDef::new("income", AttributeType::Integer, [">", "<"]),
//! );
//! let schema = FixedSchema(defs);
//! assert_eq!(schema.suggest_attributes("incme"), vec!["income".to_string()]);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOperator, RuleValue};

/// Maximum edit distance for a name to be offered as a suggestion.
pub const SUGGESTION_DISTANCE: usize = 2;

// =============================================================================
// Attribute definitions
// =============================================================================

/// Declared value type of a schema attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    /// Whole numbers; decimals are accepted as numeric too.
    Integer,
    /// Any numeric value.
    Number,
    /// Text.
    String,
    /// `true` / `false`.
    Boolean,
    /// A type name this crate does not know; accepts any value.
    Other(String),
}

impl AttributeType {
    /// Checks whether a literal is compatible with this type.
    pub fn accepts(&self, value: &RuleValue) -> bool {
        match self {
            AttributeType::Integer | AttributeType::Number => value.is_numeric(),
            AttributeType::String => matches!(value, RuleValue::String(_)),
            AttributeType::Boolean => matches!(value, RuleValue::Boolean(_)),
            AttributeType::Other(_) => true,
        }
    }

    /// Returns the type name.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::Integer => "Integer",
            AttributeType::Number => "Number",
            AttributeType::String => "String",
            AttributeType::Boolean => "Boolean",
            AttributeType::Other(name) => name,
        }
    }
}

impl From<&str> for AttributeType {
    fn from(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "integer" => AttributeType::Integer,
            "number" => AttributeType::Number,
            "string" => AttributeType::String,
            "boolean" => AttributeType::Boolean,
            _ => AttributeType::Other(name.to_string()),
        }
    }
}

impl From<String> for AttributeType {
    fn from(name: String) -> Self {
        AttributeType::from(name.as_str())
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a schema attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    /// Canonical attribute name.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Operator symbols allowed for this attribute (e.g. `>`, `==`, `IN`).
    pub operators: BTreeSet<String>,
}

impl AttributeDef {
    /// Creates an attribute definition.
    pub fn new<I, S>(name: impl Into<String>, attribute_type: AttributeType, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            attribute_type,
            operators: operators.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks whether the operator may be used with this attribute.
    pub fn allows(&self, operator: ComparisonOperator) -> bool {
        self.operators.contains(operator.as_str())
    }

    /// True if the attribute is boolean-typed.
    pub fn is_boolean(&self) -> bool {
        self.attribute_type == AttributeType::Boolean
    }
}

// =============================================================================
// Lookup traits
// =============================================================================

/// Read access to attribute definitions.
pub trait SchemaLookup {
    /// Resolves an attribute by the name typed by the user.
    fn get_attribute(&self, name: &str) -> Option<&AttributeDef>;

    /// Returns every known attribute name.
    fn all_attribute_names(&self) -> Vec<String>;

    /// Suggests known attributes for a mistyped name.
    ///
    /// Default: names within [`SUGGESTION_DISTANCE`] edits, ignoring case,
    /// plus the fixed alias `active → [status, is_verified]`.
    fn suggest_attributes(&self, word: &str) -> Vec<String> {
        attribute_suggestions(word, &self.all_attribute_names())
    }
}

/// Read access to the named lists usable with `IN`.
pub trait ListCatalog {
    /// Checks whether a (normalized) list name exists.
    fn list_exists(&self, name: &str) -> bool;

    /// Returns every known list name.
    fn all_lists(&self) -> Vec<String>;

    /// Suggests known lists for a mistyped name.
    fn suggest_lists(&self, word: &str) -> Vec<String> {
        near_matches(word, &self.all_lists(), SUGGESTION_DISTANCE)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Suggestions for an unknown attribute name.
pub fn attribute_suggestions(word: &str, names: &[String]) -> Vec<String> {
    if word.to_lowercase() == "active" {
        return vec!["status".to_string(), "is_verified".to_string()];
    }
    near_matches(word, names, SUGGESTION_DISTANCE)
}

/// Candidates within `max_distance` Levenshtein edits of `word`, ignoring case.
pub fn near_matches(word: &str, candidates: &[String], max_distance: usize) -> Vec<String> {
    let input = word.to_lowercase();
    candidates
        .iter()
        .filter(|c| strsim::levenshtein(&input, &c.to_lowercase()) <= max_distance)
        .cloned()
        .collect()
}

/// Normalizes a list name: trimmed, lowercase, spaces replaced by `_`.
pub fn normalize_list_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Renders names as `[a, b, c]`.
pub(crate) fn bracketed<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect();
    format!("[{}]", joined.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_attribute_type_from_name_ignores_case() {
        assert_eq!(AttributeType::from("integer"), AttributeType::Integer);
        assert_eq!(AttributeType::from("BOOLEAN"), AttributeType::Boolean);
        assert_eq!(
            AttributeType::from("Date"),
            AttributeType::Other("Date".to_string())
        );
    }

    #[test]
    fn test_attribute_type_accepts() {
        assert!(AttributeType::Integer.accepts(&RuleValue::Decimal(1.5)));
        assert!(AttributeType::Number.accepts(&RuleValue::Integer(1)));
        assert!(!AttributeType::Integer.accepts(&RuleValue::String("1".into())));
        assert!(AttributeType::String.accepts(&RuleValue::String("x".into())));
        assert!(!AttributeType::Boolean.accepts(&RuleValue::Integer(1)));
        assert!(AttributeType::Other("Date".into()).accepts(&RuleValue::Boolean(true)));
    }

    #[test]
    fn test_attribute_def_serde_shape() {
        let def = AttributeDef::new("income", AttributeType::Integer, [">", "<"]);
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["type"], "Integer");
        assert_eq!(json["operators"], serde_json::json!(["<", ">"]));

        let back: AttributeDef =
            serde_json::from_str(r#"{"name":"city","type":"string","operators":["=="]}"#).unwrap();
        assert_eq!(back.attribute_type, AttributeType::String);
        assert!(back.allows(ComparisonOperator::Equal));
        assert!(!back.allows(ComparisonOperator::GreaterThan));
    }

    #[test]
    fn test_near_matches_within_two_edits() {
        let candidates = names(&["premium_users", "blocked_users", "vip_list"]);
        assert_eq!(
            near_matches("premum_users", &candidates, SUGGESTION_DISTANCE),
            names(&["premium_users"])
        );
        assert_eq!(
            near_matches("VIP_LST", &candidates, SUGGESTION_DISTANCE),
            names(&["vip_list"])
        );
        assert!(near_matches("zzz", &candidates, SUGGESTION_DISTANCE).is_empty());
    }

    #[test]
    fn test_active_alias() {
        let suggestions = attribute_suggestions("Active", &names(&["age"]));
        assert_eq!(suggestions, names(&["status", "is_verified"]));
    }

    #[test]
    fn test_normalize_list_name() {
        assert_eq!(normalize_list_name("  Premium Users "), "premium_users");
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(bracketed(["a", "b"]), "[a, b]");
        assert_eq!(bracketed(Vec::<String>::new()), "[]");
    }
}
