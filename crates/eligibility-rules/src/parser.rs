//! Recursive-descent parser from rule text to a [`RuleNode`] tree.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or        := and ( OR and )*
//! and       := not ( AND not )*
//! not       := NOT not | primary
//! primary   := '(' or ')'
//!            | [ 'users' ] IN list_name
//!            | attribute [ operator literal ]
//! ```
//!
//! `AND`/`OR` fold left into binary nodes, so `a AND b AND c` becomes
//! `AND(AND(a, b), c)`. Names are checked against the schema and list
//! catalog while parsing; problems are collected as messages instead of
//! aborting, so one pass reports everything it can.

use crate::ast::{AttributeCondition, ComparisonOperator, LogicalOperator, RuleNode, RuleValue};
use crate::config::ParserConfig;
use crate::error::{RuleError, RuleResult};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::result::TurnResult;
use crate::schema::{bracketed, normalize_list_name, ListCatalog, SchemaLookup};

const LISTENING_REPLY: &str =
    "I'm listening. Please describe eligibility criteria (e.g., 'income > 50000').";
const DRAFT_UPDATED_REPLY: &str = "Draft rule updated. You can refine it or finalize.";
const FALLBACK_REPLY: &str =
    "Could not understand the rule. Try: 'income > 50000 AND NOT in blocked_users'.";
const INTERNAL_ERROR_REPLY: &str = "An internal error occurred while parsing.";

/// Parse rule text into a draft using the default [`ParserConfig`].
///
/// # Examples
///
/// ```rust
/// use eligibility_rules::{parse_to_draft, AttributeDef, AttributeType, ListCatalog, SchemaLookup};
///
/// struct Schema(AttributeDef);
///
/// impl SchemaLookup for Schema {
///     fn get_attribute(&self, name: &str) -> Option<&AttributeDef> {
///         (name == self.0.name).then_some(&self.0)
///     }
///     fn all_attribute_names(&self) -> Vec<String> {
///         vec![self.0.name.clone()]
///     }
/// }
///
/// struct NoLists;
///
/// impl ListCatalog for NoLists {
///     fn list_exists(&self, _name: &str) -> bool {
///         false
///     }
///     fn all_lists(&self) -> Vec<String> {
///         Vec::new()
///     }
/// }
///
/// let schema = Schema(AttributeDef::new("income", AttributeType::Integer, [">"]));
///
/// let result = parse_to_draft("income > 50000", &schema, &NoLists);
/// assert_eq!(result.draft_rule.unwrap().to_string(), "income > 50000");
///
/// let result = parse_to_draft("income", &schema, &NoLists);
/// assert_eq!(result.pending_attribute_candidate.as_deref(), Some("income"));
/// ```
pub fn parse_to_draft(text: &str, schema: &dyn SchemaLookup, lists: &dyn ListCatalog) -> TurnResult {
    parse_to_draft_with_config(text, schema, lists, &ParserConfig::default())
}

/// Parse rule text into a draft.
///
/// Never fails: internal faults become a `"Parsing error: ..."` entry in
/// [`TurnResult::errors`].
pub fn parse_to_draft_with_config(
    text: &str,
    schema: &dyn SchemaLookup,
    lists: &dyn ListCatalog,
    config: &ParserConfig,
) -> TurnResult {
    let text = text.trim();
    if text.is_empty() {
        return TurnResult::reply(LISTENING_REPLY);
    }

    let tokens = tokenize(text);
    let mut parser = RuleParser::new(&tokens, schema, lists, config);
    let parsed = parser.parse_expression();

    let mut result = TurnResult {
        errors: parser.errors,
        questions: parser.questions,
        pending_attribute_candidate: parser.pending_attribute,
        ..TurnResult::default()
    };

    match parsed {
        Ok(Some(rule)) if !result.has_errors() && !result.is_asking_question() => {
            tracing::debug!(rule = %rule, "draft rule parsed");
            result.draft_rule = Some(rule);
            result.ready_to_finalize = true;
            result.bot_reply = DRAFT_UPDATED_REPLY.to_string();
        }
        Ok(_) => {
            result.bot_reply = if let Some(question) = result.questions.first() {
                question.clone()
            } else if let Some(error) = result.errors.first() {
                format!("I didn't understand that. {}", error)
            } else {
                FALLBACK_REPLY.to_string()
            };
        }
        Err(fault) => {
            tracing::warn!(error = %fault, "rule parsing aborted");
            result.errors.push(format!("Parsing error: {}", fault));
            result.bot_reply = INTERNAL_ERROR_REPLY.to_string();
        }
    }

    result
}

// ============================================================================
// Parser state
// ============================================================================

struct RuleParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    schema: &'a dyn SchemaLookup,
    lists: &'a dyn ListCatalog,
    config: &'a ParserConfig,
    errors: Vec<String>,
    questions: Vec<String>,
    pending_attribute: Option<String>,
}

impl<'a> RuleParser<'a> {
    fn new(
        tokens: &'a [Token],
        schema: &'a dyn SchemaLookup,
        lists: &'a dyn ListCatalog,
        config: &'a ParserConfig,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            schema,
            lists,
            config,
            errors: Vec::new(),
            questions: Vec::new(),
            pending_attribute: None,
        }
    }

    /// Parses the whole input. A rule is still returned when tokens are left
    /// over; the stray token is reported as an error alongside it.
    fn parse_expression(&mut self) -> RuleResult<Option<RuleNode>> {
        let expr = self.parse_or()?;
        if let Some(token) = self.peek() {
            self.errors.push(format!("Unexpected token: {}", token.text));
        }
        Ok(expr.map(|fragment| fragment.node))
    }

    fn parse_or(&mut self) -> RuleResult<Option<Fragment>> {
        let mut left = self.parse_and()?;
        while self.match_kind(TokenKind::Or) {
            let right = self.parse_and()?;
            left = self.combine(LogicalOperator::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> RuleResult<Option<Fragment>> {
        let mut left = self.parse_not()?;
        while self.match_kind(TokenKind::And) {
            let right = self.parse_not()?;
            left = self.combine(LogicalOperator::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> RuleResult<Option<Fragment>> {
        if self.match_kind(TokenKind::Not) {
            self.descend()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return match inner {
                Some(inner) => {
                    let depth = self.nest(inner.depth)?;
                    Ok(Some(Fragment {
                        node: RuleNode::not(inner.node),
                        depth,
                    }))
                }
                None => Ok(None),
            };
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> RuleResult<Option<Fragment>> {
        if self.match_kind(TokenKind::LeftParen) {
            self.descend()?;
            let inside = self.parse_or()?;
            self.depth -= 1;
            if !self.match_kind(TokenKind::RightParen) {
                self.errors.push("Missing closing ')'".to_string());
            }
            return Ok(inside);
        }

        // `users in vip_list` reads the same as `in vip_list`
        if self.at_users_prefix() {
            self.pos += 1;
        }

        if self.match_kind(TokenKind::In) {
            return Ok(self.parse_list_predicate().map(Fragment::leaf));
        }

        if self.check(TokenKind::Identifier) {
            return Ok(self.parse_attribute_predicate()?.map(Fragment::leaf));
        }

        self.errors
            .push("Expected a condition (attribute or 'IN list').".to_string());
        Ok(None)
    }

    fn parse_list_predicate(&mut self) -> Option<RuleNode> {
        let token = match self.advance() {
            Some(token) if token.is(TokenKind::Identifier) => token,
            _ => {
                self.errors.push(
                    "Expected list name after 'in'. Example: in premium_users".to_string(),
                );
                return None;
            }
        };

        let lists = self.lists;
        let list_name = normalize_list_name(&token.text);

        if !lists.list_exists(&list_name) {
            self.errors.push(format!(
                "Unknown list '{}'. Known lists: {}",
                list_name,
                bracketed(lists.all_lists())
            ));
            let suggestions = lists.suggest_lists(&list_name);
            if !suggestions.is_empty() {
                self.errors
                    .push(format!("Did you mean: {} ?", bracketed(suggestions)));
            }
            return None;
        }

        Some(RuleNode::list(list_name))
    }

    fn parse_attribute_predicate(&mut self) -> RuleResult<Option<RuleNode>> {
        let Some(attr_token) = self.advance() else {
            return Ok(None);
        };
        let raw = attr_token.text.as_str();
        let schema = self.schema;

        let Some(def) = schema.get_attribute(raw) else {
            self.errors.push(format!(
                "Unknown attribute '{}'. Valid: {}",
                raw,
                bracketed(schema.all_attribute_names())
            ));
            let suggestions = schema.suggest_attributes(raw);
            if !suggestions.is_empty() {
                self.errors
                    .push(format!("Did you mean: {} ?", bracketed(suggestions)));
            }
            return Ok(None);
        };

        if !self.check(TokenKind::Operator) {
            // A bare boolean attribute means "is true"
            if def.is_boolean() {
                return Ok(Some(RuleNode::attribute(
                    def.name.clone(),
                    ComparisonOperator::Equal,
                    true,
                )));
            }
            self.ask(
                format!("How should I check '{}'? (e.g., {} > 50000)", raw, raw),
                Some(raw),
            );
            return Ok(None);
        }

        // Every symbol the lexer emits as an operator has a mapping
        let Some(operator) = self
            .advance()
            .and_then(|token| ComparisonOperator::from_symbol(&token.text))
        else {
            return Ok(None);
        };

        let Some(literal) = self.advance() else {
            self.ask(
                format!("What value should '{} {}' compare against?", raw, operator),
                None,
            );
            return Ok(None);
        };
        let value = parse_literal(literal)?;

        if !def.allows(operator) {
            self.errors.push(format!(
                "Operator '{}' not allowed for attribute '{}'. Allowed: {}",
                operator,
                def.name,
                bracketed(&def.operators)
            ));
            return Ok(None);
        }
        if !def.attribute_type.accepts(&value) {
            self.errors.push(format!(
                "Value type mismatch for '{}'. Expected {}",
                def.name, def.attribute_type
            ));
            return Ok(None);
        }

        Ok(Some(RuleNode::Attribute(AttributeCondition {
            attribute: def.name.clone(),
            operator,
            value,
        })))
    }

    /// Records a clarifying question. Only the first one of a parse is kept,
    /// together with the attribute it asks about.
    fn ask(&mut self, question: String, candidate: Option<&str>) {
        if !self.questions.is_empty() {
            return;
        }
        self.questions.push(question);
        self.pending_attribute = candidate.map(str::to_string);
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.is(kind))
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_users_prefix(&self) -> bool {
        let is_users = self
            .peek()
            .is_some_and(|t| t.is(TokenKind::Identifier) && t.text.eq_ignore_ascii_case("users"));
        let followed_by_in = self
            .tokens
            .get(self.pos + 1)
            .is_some_and(|t| t.is(TokenKind::In));
        is_users && followed_by_in
    }

    fn descend(&mut self) -> RuleResult<()> {
        self.depth += 1;
        self.nesting_allowed(self.depth)
    }

    /// Depth of a node wrapping a subtree of depth `inner`.
    fn nest(&self, inner: usize) -> RuleResult<usize> {
        let depth = inner + 1;
        self.nesting_allowed(depth)?;
        Ok(depth)
    }

    fn nesting_allowed(&self, depth: usize) -> RuleResult<()> {
        if depth > self.config.max_depth {
            return Err(RuleError::NestingTooDeep {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn combine(
        &self,
        operator: LogicalOperator,
        left: Option<Fragment>,
        right: Option<Fragment>,
    ) -> RuleResult<Option<Fragment>> {
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(None);
        };
        let depth = self.nest(left.depth.max(right.depth))?;
        Ok(Some(Fragment {
            node: RuleNode::binary(operator, left.node, right.node),
            depth,
        }))
    }
}

/// A parsed subtree and its number of combinator levels.
///
/// `AND`/`OR` chains fold without recursing, so the tree can grow deeper
/// than the parser's own call stack. The depth is tracked here to bound it.
struct Fragment {
    node: RuleNode,
    depth: usize,
}

impl Fragment {
    fn leaf(node: RuleNode) -> Self {
        Self { node, depth: 0 }
    }
}

fn parse_literal(token: &Token) -> RuleResult<RuleValue> {
    let text = token.text.as_str();
    let value = match token.kind {
        TokenKind::Number if text.contains('.') => {
            let decimal = text.parse::<f64>().map_err(|e| invalid_number(text, e))?;
            if !decimal.is_finite() {
                return Err(invalid_number(text, "number too large to represent"));
            }
            RuleValue::Decimal(decimal)
        }
        TokenKind::Number => {
            RuleValue::Integer(text.parse::<i64>().map_err(|e| invalid_number(text, e))?)
        }
        TokenKind::Boolean => RuleValue::Boolean(text.eq_ignore_ascii_case("true")),
        // Quoted strings and any other token are taken verbatim
        _ => RuleValue::String(text.to_string()),
    };
    Ok(value)
}

fn invalid_number(literal: &str, reason: impl std::fmt::Display) -> RuleError {
    RuleError::InvalidNumber {
        literal: literal.to_string(),
        reason: reason.to_string(),
    }
}
