//! Configuration types for parsing and policy validation.

/// Configuration for the rule parser.
///
/// # Example
///
/// ```rust
/// use eligibility_rules::ParserConfig;
///
/// let config = ParserConfig::default().with_max_depth(16);
/// assert_eq!(config.max_depth, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of parentheses and `NOT` before parsing is aborted.
    pub max_depth: usize,
}

impl ParserConfig {
    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Domain policy applied when a rule is finalized.
///
/// # Example
///
/// ```rust
/// use eligibility_rules::PolicyConfig;
///
/// let policy = PolicyConfig::builder()
///     .with_minimum_credit_score(350)
///     .with_protected_list("staff")
///     .build();
///
/// assert_eq!(policy.credit_score_attribute, "credit_score");
/// assert_eq!(policy.minimum_credit_score, 350);
/// assert_eq!(policy.protected_list, "staff");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Attribute holding the credit score (matched ignoring case).
    pub credit_score_attribute: String,
    /// Upper bounds below this score are rejected.
    pub minimum_credit_score: i64,
    /// List that may never be excluded from eligibility (matched ignoring case).
    pub protected_list: String,
}

impl PolicyConfig {
    /// Creates a new builder for PolicyConfig.
    pub fn builder() -> PolicyConfigBuilder {
        PolicyConfigBuilder::default()
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            credit_score_attribute: "credit_score".to_string(),
            minimum_credit_score: 300,
            protected_list: "employees".to_string(),
        }
    }
}

/// Builder for PolicyConfig.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfigBuilder {
    credit_score_attribute: Option<String>,
    minimum_credit_score: Option<i64>,
    protected_list: Option<String>,
}

impl PolicyConfigBuilder {
    /// Sets the credit score attribute name.
    pub fn with_credit_score_attribute(mut self, name: impl Into<String>) -> Self {
        self.credit_score_attribute = Some(name.into());
        self
    }

    /// Sets the minimum allowed credit score bound.
    pub fn with_minimum_credit_score(mut self, score: i64) -> Self {
        self.minimum_credit_score = Some(score);
        self
    }

    /// Sets the list that cannot be excluded.
    pub fn with_protected_list(mut self, name: impl Into<String>) -> Self {
        self.protected_list = Some(name.into());
        self
    }

    /// Builds the PolicyConfig, filling unset fields with defaults.
    pub fn build(self) -> PolicyConfig {
        let defaults = PolicyConfig::default();
        PolicyConfig {
            credit_score_attribute: self
                .credit_score_attribute
                .unwrap_or(defaults.credit_score_attribute),
            minimum_credit_score: self
                .minimum_credit_score
                .unwrap_or(defaults.minimum_credit_score),
            protected_list: self.protected_list.unwrap_or(defaults.protected_list),
        }
    }
}
