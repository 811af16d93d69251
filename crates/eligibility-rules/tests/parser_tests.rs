//! Integration tests for parsing, validation and export.
//!
//! The fixtures mirror a typical lending schema: numeric income/age/credit
//! score, a string city, a boolean verification flag and a few user lists.

use eligibility_rules::{
    parse_to_draft, AttributeDef, AttributeType, ComparisonOperator, ListCatalog, PolicyValidator,
    RuleExporter, RuleNode, SchemaLookup, TurnResult,
};
use std::collections::{BTreeMap, BTreeSet};

const NUMERIC_OPS: [&str; 6] = [">", "<", ">=", "<=", "==", "!="];

/// Mock schema keyed by exact attribute name.
struct InMemorySchema {
    attributes: BTreeMap<String, AttributeDef>,
}

impl InMemorySchema {
    fn new() -> Self {
        let mut schema = InMemorySchema {
            attributes: BTreeMap::new(),
        };
        schema.add(AttributeDef::new("income", AttributeType::Integer, NUMERIC_OPS));
        schema.add(AttributeDef::new("age", AttributeType::Integer, NUMERIC_OPS));
        schema.add(AttributeDef::new("credit_score", AttributeType::Integer, NUMERIC_OPS));
        schema.add(AttributeDef::new("city", AttributeType::String, ["==", "!=", "IN"]));
        schema.add(AttributeDef::new("is_verified", AttributeType::Boolean, ["==", "!="]));
        schema
    }

    fn add(&mut self, def: AttributeDef) {
        self.attributes.insert(def.name.clone(), def);
    }
}

impl SchemaLookup for InMemorySchema {
    fn get_attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.get(name)
    }

    fn all_attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }
}

/// Mock list catalog.
struct InMemoryLists {
    lists: BTreeSet<String>,
}

impl InMemoryLists {
    fn new() -> Self {
        InMemoryLists {
            lists: ["premium_users", "blocked_users", "vip_list", "employees"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ListCatalog for InMemoryLists {
    fn list_exists(&self, name: &str) -> bool {
        self.lists.contains(name)
    }

    fn all_lists(&self) -> Vec<String> {
        self.lists.iter().cloned().collect()
    }
}

fn parse(text: &str) -> TurnResult {
    parse_to_draft(text, &InMemorySchema::new(), &InMemoryLists::new())
}

fn attr(name: &str, op: ComparisonOperator, value: i64) -> RuleNode {
    RuleNode::attribute(name, op, value)
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_simple_comparison() {
    let result = parse("income > 50000");
    assert_eq!(
        result.draft_rule,
        Some(attr("income", ComparisonOperator::GreaterThan, 50000))
    );
    assert!(result.errors.is_empty());
    assert!(result.questions.is_empty());
    assert!(result.ready_to_finalize);
    assert_eq!(
        result.bot_reply,
        "Draft rule updated. You can refine it or finalize."
    );
}

#[test]
fn test_bare_attribute_asks_how_to_check() {
    let result = parse("income");
    assert!(result.draft_rule.is_none());
    assert_eq!(
        result.questions,
        vec!["How should I check 'income'? (e.g., income > 50000)".to_string()]
    );
    assert_eq!(result.pending_attribute_candidate.as_deref(), Some("income"));
    assert!(!result.ready_to_finalize);
}

#[test]
fn test_not_with_quoted_string() {
    let result = parse("NOT city == \"San Francisco\"");
    assert_eq!(
        result.draft_rule,
        Some(RuleNode::not(RuleNode::attribute(
            "city",
            ComparisonOperator::Equal,
            "San Francisco"
        )))
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    let result = parse("income > 10 OR age > 1 AND age < 99");
    let expected = RuleNode::or(
        attr("income", ComparisonOperator::GreaterThan, 10),
        RuleNode::and(
            attr("age", ComparisonOperator::GreaterThan, 1),
            attr("age", ComparisonOperator::LessThan, 99),
        ),
    );
    assert_eq!(result.draft_rule, Some(expected));
}

#[test]
fn test_parentheses_override_precedence() {
    let result = parse("(income > 10 OR age > 1) AND in vip_list");
    let expected = RuleNode::and(
        RuleNode::or(
            attr("income", ComparisonOperator::GreaterThan, 10),
            attr("age", ComparisonOperator::GreaterThan, 1),
        ),
        RuleNode::list("vip_list"),
    );
    assert_eq!(result.draft_rule, Some(expected));
}

#[test]
fn test_known_list() {
    let result = parse("in premium_users");
    assert_eq!(result.draft_rule, Some(RuleNode::list("premium_users")));
}

#[test]
fn test_unknown_list() {
    let result = parse("in gold_members");
    assert!(result.draft_rule.is_none());
    assert!(result.errors[0].contains("Unknown list"));
    assert!(result.bot_reply.starts_with("I didn't understand that. Unknown list"));
}

#[test]
fn test_keywords_ignore_case() {
    let result = parse("income > 1 and not IN Blocked_Users");
    let expected = RuleNode::and(
        attr("income", ComparisonOperator::GreaterThan, 1),
        RuleNode::not(RuleNode::list("blocked_users")),
    );
    assert_eq!(result.draft_rule, Some(expected));
}

#[test]
fn test_attribute_names_are_case_sensitive() {
    let result = parse("Income > 1");
    assert!(result.draft_rule.is_none());
    assert!(result.errors[0].starts_with("Unknown attribute 'Income'"));
    assert_eq!(result.errors[1], "Did you mean: [income] ?");
}

#[test]
fn test_active_alias_suggestion() {
    let result = parse("active == true");
    assert_eq!(result.errors[1], "Did you mean: [status, is_verified] ?");
}

#[test]
fn test_errors_from_both_sides_are_collected() {
    let result = parse("in nowhere AND incme > 1");
    assert!(result.draft_rule.is_none());
    assert!(result.errors.iter().any(|e| e.starts_with("Unknown attribute 'incme'")));
    assert!(result.errors.iter().any(|e| e.starts_with("Unknown list 'nowhere'")));
}

#[test]
fn test_trailing_tokens_reported() {
    let result = parse("income > 50000 vip_list");
    assert!(result.draft_rule.is_none());
    assert_eq!(result.errors, vec!["Unexpected token: vip_list".to_string()]);
    assert_eq!(
        result.bot_reply,
        "I didn't understand that. Unexpected token: vip_list"
    );
}

#[test]
fn test_unbalanced_closing_paren() {
    let result = parse("income > 1)");
    assert!(result.draft_rule.is_none());
    assert_eq!(result.errors, vec!["Unexpected token: )".to_string()]);
}

#[test]
fn test_operator_only_input() {
    let result = parse(">= 5");
    assert!(result.draft_rule.is_none());
    assert_eq!(
        result.errors[0],
        "Expected a condition (attribute or 'IN list')."
    );
}

// =============================================================================
// Parse, validate, export
// =============================================================================

#[test]
fn test_pipeline_valid_rule() {
    let result = parse("income >= 40000 AND credit_score > 650 AND NOT in blocked_users");
    let rule = result.draft_rule.expect("rule should parse");

    let report = PolicyValidator::default().validate(&rule);
    assert!(report.valid, "unexpected errors: {:?}", report.errors);

    let json: serde_json::Value =
        serde_json::from_str(&RuleExporter::new().export(&rule)).unwrap();
    assert_eq!(json["op"], "AND");
    assert_eq!(json["children"][0]["op"], "AND");
    assert_eq!(json["children"][1]["op"], "NOT");
    assert_eq!(json["children"][1]["child"]["list"], "blocked_users");
}

#[test]
fn test_pipeline_policy_violations() {
    let validator = PolicyValidator::default();

    let low_score = parse("credit_score < 250").draft_rule.unwrap();
    assert_eq!(
        validator.validate(&low_score).first_error(),
        Some("Policy Violation: Credit score minimum is 300.")
    );

    let excluded = parse("NOT in employees").draft_rule.unwrap();
    assert_eq!(
        validator.validate(&excluded).first_error(),
        Some("Policy Violation: You cannot exclude 'employees' from eligibility.")
    );

    let double = parse("NOT NOT in employees").draft_rule.unwrap();
    assert!(validator.validate(&double).valid);
}

#[test]
fn test_rule_tree_wire_form_round_trips() {
    let rule = parse("is_verified AND (age < 18 OR age > 65)").draft_rule.unwrap();
    let json = serde_json::to_string(&rule).unwrap();
    assert!(json.contains(r#""type":"LOGICAL""#));
    assert!(json.contains(r#""type":"ATTRIBUTE""#));
    let back: RuleNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rule);
}
