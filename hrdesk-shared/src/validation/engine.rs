//! Rule evaluation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;
use validator::{ValidateEmail, ValidateUrl};

use super::payload::{FieldValue, Payload, Validated};
use super::rules::{Rule, Ruleset};
use super::{attribute_name, FieldErrors, ValidationError};

/// Lookups backing [`Rule::Unique`] and [`Rule::Exists`]
///
/// `table` and `column` always come from a static [`Rule`], never from
/// request data.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Does another row (id != `ignore`) hold `value` case-insensitively?
    async fn value_taken(
        &self,
        table: &str,
        column: &str,
        value: &str,
        ignore: Option<Uuid>,
    ) -> Result<bool, sqlx::Error>;

    /// Does any row hold exactly `value`?
    async fn value_exists(&self, table: &str, column: &str, value: &str)
        -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl RuleStore for PgPool {
    async fn value_taken(
        &self,
        table: &str,
        column: &str,
        value: &str,
        ignore: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE LOWER({}::text) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
            table, column
        );

        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .bind(ignore)
            .fetch_one(self)
            .await
    }

    async fn value_exists(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {}::text = $1)",
            table, column
        );

        sqlx::query_scalar::<_, bool>(&query)
            .bind(value)
            .fetch_one(self)
            .await
    }
}

/// Runs `ruleset` over `payload`
///
/// Fields not declared in the ruleset are dropped from the result.
pub async fn validate<S>(
    mut payload: Payload,
    ruleset: &Ruleset,
    store: &S,
) -> Result<Validated, ValidationError>
where
    S: RuleStore + ?Sized,
{
    let mut errors = FieldErrors::new();
    let mut validated = Validated::default();

    for (field, rules) in ruleset.fields() {
        let Some(value) = payload.present(field) else {
            if rules.contains(&Rule::Required) {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(format!("The {} field is required.", attribute_name(field)));
            }
            continue;
        };

        let mut failed = false;
        for rule in rules {
            if let Some(message) = check(rule, field, value, store).await? {
                errors.entry(field.to_string()).or_default().push(message);
                failed = true;
                break;
            }
        }

        if !failed {
            if let Some(value) = payload.remove(field) {
                validated.insert(field, value);
            }
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Validation failed");
        Err(ValidationError::Invalid(errors))
    }
}

/// Checks one predicate against a present value; `Some(message)` on failure
async fn check<S>(
    rule: &Rule,
    field: &str,
    value: &FieldValue,
    store: &S,
) -> Result<Option<String>, sqlx::Error>
where
    S: RuleStore + ?Sized,
{
    let attribute = attribute_name(field);
    let text = value.as_text();

    let message = match rule {
        Rule::Required => None,

        Rule::String => (!value.is_string())
            .then(|| format!("The {} field must be a string.", attribute)),

        Rule::Email => {
            let valid = text.map_or(false, |t| t.into_owned().validate_email());
            (!valid).then(|| format!("The {} field must be a valid email address.", attribute))
        }

        Rule::Url => {
            let valid = text.map_or(false, |t| t.into_owned().validate_url());
            (!valid).then(|| format!("The {} field must be a valid URL.", attribute))
        }

        Rule::Min(min) => {
            let short = text.map_or(false, |t| t.chars().count() < *min);
            short.then(|| format!("The {} field must be at least {} characters.", attribute, min))
        }

        Rule::Max(max) => {
            let long = text.map_or(false, |t| t.chars().count() > *max);
            long.then(|| {
                format!(
                    "The {} field must not be greater than {} characters.",
                    attribute, max
                )
            })
        }

        Rule::Unique {
            table,
            column,
            ignore,
        } => {
            let taken = match text {
                Some(t) => store.value_taken(table, column, &t, *ignore).await?,
                None => false,
            };
            taken.then(|| format!("The {} has already been taken.", attribute))
        }

        Rule::Exists { table, column } => {
            let exists = match text {
                Some(t) => store.value_exists(table, column, &t).await?,
                None => false,
            };
            (!exists).then(|| format!("The selected {} is invalid.", attribute))
        }

        Rule::Image(asset_rules) => match value {
            FieldValue::File(upload) => asset_rules
                .check(upload)
                .err()
                .map(|e| e.field_message(field)),
            _ => Some(format!("The {} field must be an image.", attribute)),
        },
    };

    Ok(message)
}
