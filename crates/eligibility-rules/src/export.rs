//! Canonical JSON export of rule trees.
//!
//! Shapes:
//!
//! ```text
//! NOT      {"op": "NOT", "child": {...}}
//! AND/OR   {"op": "AND", "children": [{...}, {...}]}
//! attr     {"type": "attr", "attribute": "income", "operator": ">", "value": 50000}
//! list     {"type": "list", "list": "vip_list", "operator": "IN"}
//! ```
//!
//! Keys are emitted in the order above. List nodes always carry
//! `"operator": "IN"`; the `in_list` flag is not part of the export.

use serde_json::{Map, Value};

use crate::ast::{LogicalOperator, RuleNode, RuleValue};
use crate::error::{RuleError, RuleResult};

/// Converts rule trees to the export format.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleExporter;

impl RuleExporter {
    /// Creates an exporter.
    pub fn new() -> Self {
        Self
    }

    /// Exports a rule as pretty-printed JSON.
    ///
    /// Returns `{}` if the rule cannot be exported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eligibility_rules::{ComparisonOperator, RuleExporter, RuleNode};
    ///
    /// let rule = RuleNode::not(RuleNode::attribute("age", ComparisonOperator::LessThan, 18));
    /// let json: serde_json::Value = serde_json::from_str(&RuleExporter::new().export(&rule)).unwrap();
    ///
    /// assert_eq!(json["op"], "NOT");
    /// assert_eq!(json["child"]["type"], "attr");
    /// assert_eq!(json["child"]["value"], 18);
    /// ```
    pub fn export(&self, rule: &RuleNode) -> String {
        let rendered = self.to_value(rule).and_then(|value| {
            serde_json::to_string_pretty(&value).map_err(|e| RuleError::Export(e.to_string()))
        });
        match rendered {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "rule export failed");
                "{}".to_string()
            }
        }
    }

    /// Exports a rule as a JSON value.
    pub fn to_value(&self, rule: &RuleNode) -> RuleResult<Value> {
        self.to_map(rule).map(Value::Object)
    }

    /// Exports a rule as an ordered JSON object.
    pub fn to_map(&self, rule: &RuleNode) -> RuleResult<Map<String, Value>> {
        let mut map = Map::new();
        match rule {
            RuleNode::Logical(logical) if logical.operator == LogicalOperator::Not => {
                map.insert("op".into(), Value::from(logical.operator.as_str()));
                if let Some(child) = logical.rules.first() {
                    map.insert("child".into(), Value::Object(self.to_map(child)?));
                }
            }
            RuleNode::Logical(logical) => {
                let children = logical
                    .rules
                    .iter()
                    .map(|child| self.to_map(child).map(Value::Object))
                    .collect::<RuleResult<Vec<_>>>()?;
                map.insert("op".into(), Value::from(logical.operator.as_str()));
                map.insert("children".into(), Value::Array(children));
            }
            RuleNode::Attribute(condition) => {
                map.insert("type".into(), Value::from("attr"));
                map.insert("attribute".into(), Value::from(condition.attribute.as_str()));
                map.insert("operator".into(), Value::from(condition.operator.as_str()));
                map.insert("value".into(), value_to_json(&condition.value)?);
            }
            RuleNode::List(membership) => {
                map.insert("type".into(), Value::from("list"));
                map.insert("list".into(), Value::from(membership.list_name.as_str()));
                map.insert("operator".into(), Value::from("IN"));
            }
        }
        Ok(map)
    }
}

fn value_to_json(value: &RuleValue) -> RuleResult<Value> {
    match value {
        RuleValue::Integer(n) => Ok(Value::from(*n)),
        RuleValue::Decimal(d) => serde_json::Number::from_f64(*d)
            .map(Value::Number)
            .ok_or_else(|| RuleError::Export(format!("non-finite number {}", d))),
        RuleValue::Boolean(b) => Ok(Value::Bool(*b)),
        RuleValue::String(s) => Ok(Value::from(s.as_str())),
    }
}
