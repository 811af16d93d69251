//! Abstract Syntax Tree types for eligibility rules.

use serde::{Deserialize, Serialize};

// =============================================================================
// Operators
// =============================================================================

/// Comparison operators for attribute conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Greater than: `>`
    #[serde(rename = ">")]
    GreaterThan,
    /// Less than: `<`
    #[serde(rename = "<")]
    LessThan,
    /// Greater than or equal: `>=`
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    /// Less than or equal: `<=`
    #[serde(rename = "<=")]
    LessThanOrEqual,
    /// Equal: `==` (a single `=` is accepted on input)
    #[serde(rename = "==")]
    Equal,
    /// Not equal: `!=`
    #[serde(rename = "!=")]
    NotEqual,
}

impl ComparisonOperator {
    /// Parses an operator symbol, normalizing `=` to `==`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(ComparisonOperator::GreaterThan),
            "<" => Some(ComparisonOperator::LessThan),
            ">=" => Some(ComparisonOperator::GreaterThanOrEqual),
            "<=" => Some(ComparisonOperator::LessThanOrEqual),
            "==" | "=" => Some(ComparisonOperator::Equal),
            "!=" => Some(ComparisonOperator::NotEqual),
            _ => None,
        }
    }

    /// Returns the canonical symbol for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }

    /// True for `<` and `<=`.
    pub fn is_upper_bound(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::LessThan | ComparisonOperator::LessThanOrEqual
        )
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    /// Conjunction, two children as built by the parser.
    And,
    /// Disjunction, two children as built by the parser.
    Or,
    /// Negation, exactly one child.
    Not,
}

impl LogicalOperator {
    /// Returns the keyword for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Not => "NOT",
        }
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Values
// =============================================================================

/// Literal value on the right-hand side of an attribute condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Integer literal: `50000`
    Integer(i64),
    /// Decimal literal: `3.5`
    Decimal(f64),
    /// Boolean literal: `true` / `false`
    Boolean(bool),
    /// Quoted string or bare word: `"San Francisco"`
    String(String),
}

impl RuleValue {
    /// Returns the value as a number if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RuleValue::Integer(n) => Some(*n as f64),
            RuleValue::Decimal(n) => Some(*n),
            RuleValue::Boolean(_) | RuleValue::String(_) => None,
        }
    }

    /// True for integer and decimal values.
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl std::fmt::Display for RuleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleValue::Integer(n) => write!(f, "{}", n),
            RuleValue::Decimal(n) => write!(f, "{}", n),
            RuleValue::Boolean(b) => write!(f, "{}", b),
            RuleValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Integer(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        RuleValue::Integer(i64::from(value))
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Decimal(value)
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Boolean(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::String(value.to_string())
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// Comparison of a schema attribute against a literal.
///
/// Example: `income > 50000`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeCondition {
    /// Canonical attribute name from the schema.
    pub attribute: String,
    /// Comparison operator.
    pub operator: ComparisonOperator,
    /// The value to compare against.
    pub value: RuleValue,
}

impl std::fmt::Display for AttributeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.operator, self.value)
    }
}

/// Membership test against a named list.
///
/// Example: `IN premium_users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembership {
    /// Normalized list name (lowercase, spaces replaced by `_`).
    pub list_name: String,
    /// `true` for `IN`, `false` for `NOT IN`.
    pub in_list: bool,
}

impl std::fmt::Display for ListMembership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.in_list {
            write!(f, "IN {}", self.list_name)
        } else {
            write!(f, "NOT IN {}", self.list_name)
        }
    }
}

/// Combinator node over child rules.
///
/// `NOT` carries exactly one child; `AND`/`OR` carry two as built by the
/// parser and the session join, though the container admits more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalRule {
    /// The combinator.
    pub operator: LogicalOperator,
    /// Ordered children.
    pub rules: Vec<RuleNode>,
}

impl std::fmt::Display for LogicalRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rules.is_empty() {
            return Ok(());
        }
        if self.operator == LogicalOperator::Not {
            return write!(f, "NOT ({})", self.rules[0]);
        }
        write!(f, "(")?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.operator)?;
            }
            write!(f, "{}", rule)?;
        }
        write!(f, ")")
    }
}

/// A boolean eligibility expression.
///
/// The wire form carries an explicit `type` discriminant:
///
/// ```rust
/// use eligibility_rules::RuleNode;
///
/// let node = RuleNode::list("vip_list");
/// let json = serde_json::to_string(&node).unwrap();
/// assert_eq!(json, r#"{"type":"LIST","listName":"vip_list","inList":true}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleNode {
    /// Attribute comparison.
    #[serde(rename = "ATTRIBUTE")]
    Attribute(AttributeCondition),
    /// List membership.
    #[serde(rename = "LIST")]
    List(ListMembership),
    /// AND / OR / NOT combinator.
    #[serde(rename = "LOGICAL")]
    Logical(LogicalRule),
}

impl RuleNode {
    /// Creates an attribute condition.
    pub fn attribute(
        attribute: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<RuleValue>,
    ) -> Self {
        RuleNode::Attribute(AttributeCondition {
            attribute: attribute.into(),
            operator,
            value: value.into(),
        })
    }

    /// Creates an `IN` list membership.
    pub fn list(list_name: impl Into<String>) -> Self {
        RuleNode::List(ListMembership {
            list_name: list_name.into(),
            in_list: true,
        })
    }

    /// Creates a `NOT IN` list membership.
    pub fn not_in_list(list_name: impl Into<String>) -> Self {
        RuleNode::List(ListMembership {
            list_name: list_name.into(),
            in_list: false,
        })
    }

    /// Creates a binary `AND`.
    pub fn and(left: RuleNode, right: RuleNode) -> Self {
        Self::binary(LogicalOperator::And, left, right)
    }

    /// Creates a binary `OR`.
    pub fn or(left: RuleNode, right: RuleNode) -> Self {
        Self::binary(LogicalOperator::Or, left, right)
    }

    /// Creates a `NOT` around a single rule.
    pub fn not(inner: RuleNode) -> Self {
        RuleNode::Logical(LogicalRule {
            operator: LogicalOperator::Not,
            rules: vec![inner],
        })
    }

    /// Creates a two-child combinator.
    pub fn binary(operator: LogicalOperator, left: RuleNode, right: RuleNode) -> Self {
        RuleNode::Logical(LogicalRule {
            operator,
            rules: vec![left, right],
        })
    }

    /// Returns the combinator operator, if this is a logical node.
    pub fn logical_operator(&self) -> Option<LogicalOperator> {
        match self {
            RuleNode::Logical(rule) => Some(rule.operator),
            RuleNode::Attribute(_) | RuleNode::List(_) => None,
        }
    }

    /// Returns the children of a logical node (empty for leaves).
    pub fn children(&self) -> &[RuleNode] {
        match self {
            RuleNode::Logical(rule) => &rule.rules,
            RuleNode::Attribute(_) | RuleNode::List(_) => &[],
        }
    }

    /// Number of combinator levels above the deepest leaf (0 for a leaf).
    ///
    /// Walks the tree with an explicit stack, so it is safe on any depth.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children().iter().map(|child| (child, level + 1)));
        }
        deepest
    }
}

impl std::fmt::Display for RuleNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleNode::Attribute(a) => write!(f, "{}", a),
            RuleNode::List(l) => write!(f, "{}", l),
            RuleNode::Logical(l) => write!(f, "{}", l),
        }
    }
}

impl From<AttributeCondition> for RuleNode {
    fn from(value: AttributeCondition) -> Self {
        RuleNode::Attribute(value)
    }
}

impl From<ListMembership> for RuleNode {
    fn from(value: ListMembership) -> Self {
        RuleNode::List(value)
    }
}

impl From<LogicalRule> for RuleNode {
    fn from(value: LogicalRule) -> Self {
        RuleNode::Logical(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_normalizes_single_equals() {
        assert_eq!(
            ComparisonOperator::from_symbol("="),
            Some(ComparisonOperator::Equal)
        );
        assert_eq!(ComparisonOperator::Equal.as_str(), "==");
        assert_eq!(ComparisonOperator::from_symbol("=>"), None);
    }

    #[test]
    fn test_display_nested_rule() {
        let rule = RuleNode::and(
            RuleNode::attribute("income", ComparisonOperator::GreaterThan, 50000),
            RuleNode::not(RuleNode::list("blocked_users")),
        );
        assert_eq!(rule.to_string(), "(income > 50000 AND NOT (IN blocked_users))");
        assert_eq!(RuleNode::not_in_list("vip_list").to_string(), "NOT IN vip_list");
    }

    #[test]
    fn test_wire_form_uses_type_discriminant() {
        let rule = RuleNode::not(RuleNode::attribute(
            "city",
            ComparisonOperator::Equal,
            "San Francisco",
        ));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "LOGICAL");
        assert_eq!(json["operator"], "NOT");
        assert_eq!(json["rules"][0]["type"], "ATTRIBUTE");
        assert_eq!(json["rules"][0]["operator"], "==");
        assert_eq!(json["rules"][0]["value"], "San Francisco");

        let back: RuleNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_untagged_values_keep_their_kind() {
        let decimal: RuleValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(decimal, RuleValue::Decimal(2.5));
        let integer: RuleValue = serde_json::from_str("7").unwrap();
        assert_eq!(integer, RuleValue::Integer(7));
        let flag: RuleValue = serde_json::from_str("true").unwrap();
        assert_eq!(flag, RuleValue::Boolean(true));
    }

    #[test]
    fn test_children_of_leaf_is_empty() {
        let leaf = RuleNode::list("vip_list");
        assert!(leaf.children().is_empty());
        assert_eq!(leaf.logical_operator(), None);
    }

    #[test]
    fn test_nesting_depth() {
        let leaf = RuleNode::list("vip_list");
        assert_eq!(leaf.nesting_depth(), 0);

        let grouped = RuleNode::and(
            RuleNode::or(leaf.clone(), RuleNode::not(leaf.clone())),
            leaf.clone(),
        );
        assert_eq!(grouped.nesting_depth(), 3);
    }
}
