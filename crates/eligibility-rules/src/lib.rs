//! # eligibility-rules
//!
//! Compiles free-text eligibility criteria into a typed rule tree, checks the
//! tree against domain policy, and exports it as canonical JSON.
//!
//! This crate provides:
//! - **Lexer**: [`tokenize`] splits rule text into keyword, operator and literal tokens
//! - **Parser**: [`parse_to_draft`] builds a [`RuleNode`] tree, resolving names
//!   through [`SchemaLookup`] and [`ListCatalog`]
//! - **Validator**: [`PolicyValidator`] applies polarity-aware policy checks
//! - **Exporter**: [`RuleExporter`] renders the canonical JSON form
//!
//! Parsing never fails. Every attempt ends in a [`TurnResult`] carrying either a
//! rule, one clarifying question, or a list of error messages.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use eligibility_rules::{
//!     parse_to_draft, AttributeDef, AttributeType, ListCatalog, PolicyValidator, RuleExporter,
//!     SchemaLookup,
//! };
//!
//! struct Schema(HashMap<String, AttributeDef>);
//!
//! impl SchemaLookup for Schema {
//!     fn get_attribute(&self, name: &str) -> Option<&AttributeDef> {
//!         self.0.get(name)
//!     }
//!     fn all_attribute_names(&self) -> Vec<String> {
//!         self.0.keys().cloned().collect()
//!     }
//! }
//!
//! struct Lists(Vec<String>);
//!
//! impl ListCatalog for Lists {
//!     fn list_exists(&self, name: &str) -> bool {
//!         self.0.iter().any(|l| l == name)
//!     }
//!     fn all_lists(&self) -> Vec<String> {
//!         self.0.clone()
//!     }
//! }
//!
//! let mut defs = HashMap::new();
//! defs.insert(
//!     "income".to_string(),
//!     AttributeDef::new("income", AttributeType::Integer, [">", "<"]),
//! );
//! let schema = Schema(defs);
//! let lists = Lists(vec!["blocked_users".to_string()]);
//!
//! let turn = parse_to_draft("income > 50000 AND NOT in blocked_users", &schema, &lists);
//! let rule = turn.draft_rule.unwrap();
//! assert_eq!(rule.to_string(), "(income > 50000 AND NOT (IN blocked_users))");
//!
//! assert!(PolicyValidator::default().validate(&rule).valid);
//! let json = RuleExporter::new().export(&rule);
//! assert!(json.contains("\"op\": \"AND\""));
//! ```
//!
//! ## Rule Syntax Quick Reference
//!
//! | Form | Meaning | Example |
//! |------|---------|---------|
//! | `attr op value` | Attribute comparison | `income >= 50000` |
//! | `attr` | Boolean attribute is true | `is_verified` |
//! | `IN list` | List membership | `in vip_list` |
//! | `users IN list` | Same as `IN list` | `users in vip_list` |
//! | `NOT x` | Negation | `NOT in blocked_users` |
//! | `a AND b` | Conjunction | `age > 18 AND city == 'Boston'` |
//! | `a OR b` | Disjunction (binds looser than `AND`) | `age < 18 OR age > 65` |
//! | `( x )` | Grouping | `(a OR b) AND c` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod config;
mod error;
mod export;
mod lexer;
mod parser;
mod result;
mod schema;
mod validator;

pub use ast::{
    AttributeCondition, ComparisonOperator, ListMembership, LogicalOperator, LogicalRule,
    RuleNode, RuleValue,
};
pub use config::{ParserConfig, PolicyConfig, PolicyConfigBuilder};
pub use error::{RuleError, RuleResult};
pub use export::RuleExporter;
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse_to_draft, parse_to_draft_with_config};
pub use result::TurnResult;
pub use schema::{
    attribute_suggestions, near_matches, normalize_list_name, AttributeDef, AttributeType,
    ListCatalog, SchemaLookup, SUGGESTION_DISTANCE,
};
pub use validator::{PolicyValidator, ValidationReport};
