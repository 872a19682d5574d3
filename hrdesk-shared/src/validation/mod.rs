/// Declarative request validation
///
/// Each endpoint declares a [`Ruleset`]: an ordered list of predicates per
/// field. [`validate`] runs the ruleset over a [`Payload`] and yields either
/// a [`Validated`] payload or every field's first failure.
///
/// # Example
///
/// ```no_run
/// use hrdesk_shared::validation::{validate, Payload, Rule, Ruleset};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let rules = Ruleset::new()
///     .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
///     .field("email", [Rule::Required, Rule::Email, Rule::unique("users", "email")]);
///
/// let mut payload = Payload::new();
/// payload.insert_text("name", "Ada");
/// payload.insert_text("email", "ada@example.com");
///
/// let validated = validate(payload, &rules, &pool).await?;
/// assert_eq!(validated.text("name").as_deref(), Some("Ada"));
/// # Ok(())
/// # }
/// ```
///
/// # Semantics
///
/// - Missing fields, JSON nulls, blank strings and empty file parts are
///   *absent*. Absent fields only fail [`Rule::Required`]; every other
///   predicate is skipped for them.
/// - Predicates run in declaration order; the first failure records one
///   message and stops that field. Other fields are still checked.
/// - [`Rule::Unique`] and [`Rule::Exists`] go through a [`RuleStore`]
///   (implemented for `PgPool`); everything else is pure.

pub mod engine;
pub mod payload;
pub mod rules;

use std::collections::BTreeMap;

pub use engine::{validate, RuleStore};
pub use payload::{FieldValue, Payload, Validated};
pub use rules::{Rule, Ruleset};

/// Messages per field, in a stable order for responses
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Validation failure
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields failed their rules
    #[error("validation failed for {} field(s)", .0.len())]
    Invalid(FieldErrors),

    /// A uniqueness/existence lookup could not be performed
    #[error("validation lookup failed: {0}")]
    Lookup(#[from] sqlx::Error),
}

impl ValidationError {
    /// Failure with a single message on a single field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        ValidationError::Invalid(errors)
    }

    /// Field errors, if this is an [`ValidationError::Invalid`]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationError::Invalid(errors) => Some(errors),
            ValidationError::Lookup(_) => None,
        }
    }
}

/// Human-readable attribute name used in messages (`company_id` -> `company id`)
pub fn attribute_name(field: &str) -> String {
    field.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        let err = ValidationError::single("email", "The email has already been taken.");
        let errors = err.field_errors().unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], vec!["The email has already been taken."]);
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(attribute_name("company_id"), "company id");
        assert_eq!(attribute_name("email"), "email");
    }
}
