//! Policy validation of finished rule trees.
//!
//! The validator walks the tree once, tracking whether the current subtree
//! sits under an odd number of `NOT`s. List checks honour that polarity;
//! the credit-score bound check does not.

use serde::{Deserialize, Serialize};

use crate::ast::{AttributeCondition, ListMembership, LogicalOperator, RuleNode};
use crate::config::PolicyConfig;

/// Outcome of validating a rule against policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no policy error was found.
    pub valid: bool,
    /// Policy errors in traversal order.
    pub errors: Vec<String>,
    /// Non-blocking findings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// The first error, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Checks rule trees against a [`PolicyConfig`].
///
/// # Examples
///
/// ```rust
/// use eligibility_rules::{PolicyValidator, RuleNode};
///
/// let validator = PolicyValidator::default();
///
/// let excluded = RuleNode::not(RuleNode::list("employees"));
/// assert!(!validator.validate(&excluded).valid);
///
/// let double_negated = RuleNode::not(RuleNode::not(RuleNode::list("employees")));
/// assert!(validator.validate(&double_negated).valid);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicyValidator {
    policy: PolicyConfig,
}

impl PolicyValidator {
    /// Creates a validator for the given policy.
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    /// The policy in force.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Validates a rule tree.
    pub fn validate(&self, rule: &RuleNode) -> ValidationReport {
        let mut errors = Vec::new();
        self.visit(rule, false, &mut errors);
        ValidationReport {
            valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    fn visit(&self, node: &RuleNode, inside_not: bool, errors: &mut Vec<String>) {
        match node {
            RuleNode::Logical(logical) => {
                let polarity = match logical.operator {
                    LogicalOperator::Not => !inside_not,
                    LogicalOperator::And | LogicalOperator::Or => inside_not,
                };
                for child in &logical.rules {
                    self.visit(child, polarity, errors);
                }
            }
            RuleNode::Attribute(condition) => self.check_credit_score(condition, errors),
            RuleNode::List(membership) => self.check_protected_list(membership, inside_not, errors),
        }
    }

    fn check_credit_score(&self, condition: &AttributeCondition, errors: &mut Vec<String>) {
        if !condition
            .attribute
            .eq_ignore_ascii_case(&self.policy.credit_score_attribute)
        {
            return;
        }
        let Some(bound) = condition.value.as_f64() else {
            return;
        };
        if condition.operator.is_upper_bound() && bound < self.policy.minimum_credit_score as f64 {
            errors.push(format!(
                "Policy Violation: Credit score minimum is {}.",
                self.policy.minimum_credit_score
            ));
        }
    }

    fn check_protected_list(
        &self,
        membership: &ListMembership,
        inside_not: bool,
        errors: &mut Vec<String>,
    ) {
        let effectively_excluded = (membership.in_list && inside_not) || !membership.in_list;
        if effectively_excluded
            && membership
                .list_name
                .eq_ignore_ascii_case(&self.policy.protected_list)
        {
            errors.push(format!(
                "Policy Violation: You cannot exclude '{}' from eligibility.",
                self.policy.protected_list
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComparisonOperator;

    fn validate(rule: &RuleNode) -> ValidationReport {
        PolicyValidator::default().validate(rule)
    }

    #[test]
    fn test_low_credit_score_upper_bound() {
        let rule = RuleNode::attribute("credit_score", ComparisonOperator::LessThan, 250);
        let report = validate(&rule);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Policy Violation: Credit score minimum is 300.".to_string()]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_credit_score_check_ignores_case_and_polarity() {
        let rule = RuleNode::not(RuleNode::attribute(
            "Credit_Score",
            ComparisonOperator::LessThanOrEqual,
            299.5,
        ));
        assert!(!validate(&rule).valid);
    }

    #[test]
    fn test_credit_score_lower_bound_or_high_value_is_fine() {
        let lower = RuleNode::attribute("credit_score", ComparisonOperator::GreaterThan, 250);
        let high = RuleNode::attribute("credit_score", ComparisonOperator::LessThan, 300);
        let text = RuleNode::attribute("credit_score", ComparisonOperator::LessThan, "low");
        assert!(validate(&lower).valid);
        assert!(validate(&high).valid);
        assert!(validate(&text).valid);
    }

    #[test]
    fn test_employees_polarity() {
        let direct = RuleNode::list("employees");
        let negated = RuleNode::not(RuleNode::list("employees"));
        let not_in = RuleNode::not_in_list("employees");
        let double = RuleNode::not(RuleNode::not(RuleNode::list("EMPLOYEES")));

        assert!(validate(&direct).valid);
        assert!(!validate(&negated).valid);
        assert!(!validate(&not_in).valid);
        assert!(validate(&double).valid);
    }

    #[test]
    fn test_not_in_list_under_not_is_still_excluded() {
        let rule = RuleNode::not(RuleNode::not_in_list("employees"));
        assert!(!validate(&rule).valid);
    }

    #[test]
    fn test_errors_collected_in_traversal_order() {
        let rule = RuleNode::and(
            RuleNode::not_in_list("employees"),
            RuleNode::or(
                RuleNode::list("vip_list"),
                RuleNode::attribute("credit_score", ComparisonOperator::LessThan, 100),
            ),
        );
        let report = validate(&rule);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("employees"));
        assert!(report.errors[1].contains("Credit score"));
        assert_eq!(report.first_error(), Some(report.errors[0].as_str()));
    }

    #[test]
    fn test_custom_policy() {
        let policy = PolicyConfig::builder()
            .with_minimum_credit_score(500)
            .with_protected_list("staff")
            .build();
        let validator = PolicyValidator::new(policy);

        let rule = RuleNode::attribute("credit_score", ComparisonOperator::LessThan, 450);
        assert_eq!(
            validator.validate(&rule).errors,
            vec!["Policy Violation: Credit score minimum is 500.".to_string()]
        );
        assert!(validator.validate(&RuleNode::not_in_list("employees")).valid);
        assert!(!validator.validate(&RuleNode::not_in_list("staff")).valid);
    }

    #[test]
    fn test_report_serialization() {
        let report = validate(&RuleNode::list("vip_list"));
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"valid":true,"errors":[],"warnings":[]}"#);
    }
}
