//! Step validation.
//!
//! A step is validated by pulling a [`ValidationResult`] from its validation
//! strategy. The result maps field names to messages in the order the
//! strategy reported them; a field mapped to an empty message is reported to
//! analytics but never displayed.
//!
//! [`StepSchema`] is a declarative alternative for steps whose answers live in
//! the shared form data: a list of rules evaluated against a data snapshot.
//!
//! # Example
//!
//! ```
//! use stepwise::form::{StepSchema, ValidationResult};
//! use stepwise_core::FormData;
//!
//! let schema = StepSchema::new()
//!     .required("email", "Email is required")
//!     .email("email", "Invalid email");
//!
//! let result = schema.validate(&FormData::new().with("email", "not-an-email"));
//! assert!(!result.is_valid());
//! assert_eq!(result.displayable_errors(), vec!["Invalid email".to_string()]);
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use stepwise_core::{Error, FormData, Result};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// ============================================================================
// ValidationResult
// ============================================================================

/// The result of validating a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the step may be left.
    valid: bool,
    /// Field name to message, in reporting order. Messages may be empty.
    errors: IndexMap<String, String>,
}

impl ValidationResult {
    /// Create a successful validation result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: IndexMap::new(),
        }
    }

    /// Create a failed validation result with the given field errors.
    ///
    /// The result is invalid even if `errors` is empty.
    pub fn invalid<I, K, V>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            valid: false,
            errors: errors
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Create a failed validation result with a single field error.
    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::invalid([(field.into(), message.into())])
    }

    /// Check if the validation passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get all field errors, including those with empty messages.
    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Get the message for a field.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// The messages that should be shown to the user, in reporting order.
    pub fn displayable_errors(&self) -> Vec<String> {
        self.errors
            .values()
            .filter(|message| !message.is_empty())
            .cloned()
            .collect()
    }

    /// Add a field error, marking the result invalid.
    ///
    /// A field that already has an error keeps its first message.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
        self.valid = false;
    }

    /// Merge another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid &= other.valid;
        for (field, message) in other.errors {
            self.errors.entry(field).or_insert(message);
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

// ============================================================================
// StepSchema
// ============================================================================

/// The check a [`FieldRule`] performs.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// The field must be present, non-null and not blank.
    Required,
    /// A non-empty value must look like an email address.
    Email,
    /// A non-empty value must have at least this many characters.
    MinLength(usize),
    /// A value must have at most this many characters.
    MaxLength(usize),
    /// A non-empty value must match the pattern.
    Pattern(Regex),
    /// The field must be exactly `true` (consent boxes).
    MustBeTrue,
}

/// A single rule on a single field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// The field the rule applies to.
    pub field: String,
    /// The check to perform.
    pub kind: RuleKind,
    /// The message reported when the check fails.
    pub message: String,
}

impl FieldRule {
    /// Check the rule against `data`. Returns `true` if it passes.
    pub fn check(&self, data: &FormData) -> bool {
        let value = data.get(&self.field);
        let text = value.map(value_text).unwrap_or_default();
        match &self.kind {
            RuleKind::Required => !matches!(value, None | Some(Value::Null)) && !text.trim().is_empty(),
            RuleKind::Email => text.is_empty() || EMAIL_PATTERN.is_match(text.trim()),
            RuleKind::MinLength(min) => text.is_empty() || text.chars().count() >= *min,
            RuleKind::MaxLength(max) => text.chars().count() <= *max,
            RuleKind::Pattern(regex) => text.is_empty() || regex.is_match(&text),
            RuleKind::MustBeTrue => value == Some(&Value::Bool(true)),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A declarative validator over form data.
///
/// Rules are evaluated in the order they were added. Each field reports only
/// its first failing rule.
#[derive(Debug, Clone, Default)]
pub struct StepSchema {
    rules: Vec<FieldRule>,
}

impl StepSchema {
    /// Create an empty schema. An empty schema accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule using builder pattern.
    pub fn rule(
        mut self,
        field: impl Into<String>,
        kind: RuleKind,
        message: impl Into<String>,
    ) -> Self {
        self.rules.push(FieldRule {
            field: field.into(),
            kind,
            message: message.into(),
        });
        self
    }

    /// Require a field.
    pub fn required(self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(field, RuleKind::Required, message)
    }

    /// Require an email-shaped value.
    pub fn email(self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(field, RuleKind::Email, message)
    }

    /// Require a minimum length.
    pub fn min_length(
        self,
        field: impl Into<String>,
        min: usize,
        message: impl Into<String>,
    ) -> Self {
        self.rule(field, RuleKind::MinLength(min), message)
    }

    /// Require a maximum length.
    pub fn max_length(
        self,
        field: impl Into<String>,
        max: usize,
        message: impl Into<String>,
    ) -> Self {
        self.rule(field, RuleKind::MaxLength(max), message)
    }

    /// Require a field to be checked.
    pub fn must_be_true(self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(field, RuleKind::MustBeTrue, message)
    }

    /// Require a value to match a regular expression.
    ///
    /// Fails if `pattern` does not compile.
    pub fn pattern(
        self,
        field: impl Into<String>,
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<Self> {
        let field = field.into();
        let regex =
            Regex::new(pattern).map_err(|e| Error::invalid_pattern(field.clone(), e.to_string()))?;
        Ok(self.rule(field, RuleKind::Pattern(regex), message))
    }

    /// Get the rules.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validate a data snapshot.
    pub fn validate(&self, data: &FormData) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for rule in &self.rules {
            if result.errors.contains_key(&rule.field) {
                continue;
            }
            if !rule.check(data) {
                result.add_error(rule.field.clone(), rule.message.clone());
            }
        }
        result
    }
}
