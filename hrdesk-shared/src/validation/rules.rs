//! Rule and ruleset definitions.

use uuid::Uuid;

use crate::assets::AssetRules;

/// A single field predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Field must be present and non-blank
    Required,

    /// Field must be a text value, not a file or a JSON number/object
    String,

    Email,

    /// Absolute URL with a scheme
    Url,

    /// At least `n` characters
    Min(usize),

    /// At most `n` characters
    Max(usize),

    /// No row in `table` has `column` equal to the value (case-insensitive),
    /// apart from the row with id `ignore`
    Unique {
        table: &'static str,
        column: &'static str,
        ignore: Option<Uuid>,
    },

    /// Some row in `table` has `column` equal to the value
    Exists {
        table: &'static str,
        column: &'static str,
    },

    /// Field must be an uploaded image satisfying the asset rules
    Image(&'static AssetRules),
}

impl Rule {
    pub fn unique(table: &'static str, column: &'static str) -> Self {
        Rule::Unique {
            table,
            column,
            ignore: None,
        }
    }

    /// Unique, but the record being updated may keep its own value
    pub fn unique_except(table: &'static str, column: &'static str, id: Uuid) -> Self {
        Rule::Unique {
            table,
            column,
            ignore: Some(id),
        }
    }

    pub fn exists(table: &'static str, column: &'static str) -> Self {
        Rule::Exists { table, column }
    }
}

/// Ordered rules per field
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Ruleset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field; fields without [`Rule::Required`] are optional
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[Rule])> + '_ {
        self.fields.iter().map(|(name, rules)| (*name, rules.as_slice()))
    }

    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| *field == name)
    }
}
