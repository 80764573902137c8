use thiserror::Error;

/// Errors that can occur while assembling or delivering a direct debit file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IncassoError {
    /// Input that cannot be used for a computation (e.g. a non-numeric
    /// registration number for the Creditor Identifier).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more validation rules failed (strict mode only).
    #[error("validation failed: {0}")]
    Validation(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Writing the document to its destination failed.
    #[error("delivery failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "transactions[2].amount").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Short rule tag if applicable (e.g. "MAX-35").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule tag.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule tag.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
