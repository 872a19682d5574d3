//! Raw and validated request payloads.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::assets::UploadedFile;

/// One submitted field
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Form or multipart text part
    Text(String),

    /// Value from a JSON body
    Json(Value),

    /// Multipart file part
    File(UploadedFile),
}

impl FieldValue {
    /// Blank strings, nulls and empty file parts count as not submitted
    pub fn is_absent(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Json(Value::Null) => true,
            FieldValue::Json(Value::String(s)) => s.trim().is_empty(),
            FieldValue::Json(_) => false,
            FieldValue::File(file) => file.is_empty(),
        }
    }

    /// The value as a string, if it is a scalar
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Json(Value::String(s)) => Some(Cow::Borrowed(s)),
            FieldValue::Json(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            FieldValue::Json(Value::Bool(b)) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    /// True for values a `String` rule accepts
    pub fn is_string(&self) -> bool {
        matches!(self, FieldValue::Text(_) | FieldValue::Json(Value::String(_)))
    }

    fn into_json(self) -> Option<Value> {
        match self {
            FieldValue::Text(s) => Some(Value::String(s)),
            FieldValue::Json(value) => Some(value),
            FieldValue::File(_) => None,
        }
    }
}

/// Fields whose text is kept exactly as submitted
const UNTRIMMED_FIELDS: &[&str] = &["password", "password_confirmation", "current_password"];

/// Trims surrounding whitespace from text values, except passwords
fn trim_text(name: &str, value: String) -> String {
    if UNTRIMMED_FIELDS.contains(&name) {
        return value;
    }

    if value.trim().len() == value.len() {
        value
    } else {
        value.trim().to_string()
    }
}

fn trim_json(name: &str, value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(trim_text(name, s)),
        other => other,
    }
}

/// Submitted fields by name, before validation
///
/// Later inserts under the same name replace earlier ones. Text values are
/// trimmed on the way in, passwords excepted.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    fields: HashMap<String, FieldValue>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a payload from the top-level members of a JSON object
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        Self {
            fields: object
                .into_iter()
                .map(|(name, value)| {
                    let value = trim_json(&name, value);
                    (name, FieldValue::Json(value))
                })
                .collect(),
        }
    }

    /// Builds a payload from decoded form pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(name, value)| {
                    let value = trim_text(&name, value);
                    (name, FieldValue::Text(value))
                })
                .collect(),
        }
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = trim_text(&name, value.into());
        self.fields.insert(name, FieldValue::Text(value));
    }

    pub fn insert_json(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let value = trim_json(&name, value);
        self.fields.insert(name, FieldValue::Json(value));
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.fields.insert(name.into(), FieldValue::File(file));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The field, unless it is absent
    pub fn present(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).filter(|value| !value.is_absent())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }
}

/// A payload that passed its ruleset
///
/// Holds only declared, present fields.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    fields: HashMap<String, FieldValue>,
}

impl Validated {
    pub(crate) fn insert(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Removes and returns an uploaded file
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        match self.fields.remove(name)? {
            FieldValue::File(file) => Some(file),
            other => {
                self.fields.insert(name.to_string(), other);
                None
            }
        }
    }

    /// Deserializes the non-file fields into `T`
    ///
    /// Fields that were optional and absent are simply missing, so `T`
    /// should model them as `Option`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        let object: Map<String, Value> = self
            .fields
            .into_iter()
            .filter_map(|(name, value)| value.into_json().map(|json| (name, json)))
            .collect();

        serde_json::from_value(Value::Object(object))
    }
}
