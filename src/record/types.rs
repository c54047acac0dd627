use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single error annotation attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordError {
    /// Field the error belongs to; `None` for record-level errors.
    pub field: Option<String>,
    pub message: String,
}

impl RecordError {
    /// Record-level error not tied to a specific field.
    pub fn record_level(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// A field value: a scalar, or a nested sub-record for one-to-one
/// relations edited inline with their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Nested(Record),
    Scalar(Value),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(Value::String(value.to_string()))
    }
}

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        FieldValue::Nested(record)
    }
}

/// The in-memory representation of one persisted entity instance being
/// edited: an ordered field map plus an error slot, recursively present
/// on nested sub-records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<RecordError>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn errors(&self) -> &[RecordError] {
        &self.errors
    }

    pub fn add_error(&mut self, error: RecordError) {
        self.errors.push(error);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Whether this record carries validation errors: its own error slot is
    /// non-empty, or any direct child sub-record's slot is non-empty. One
    /// level of recursion; grandchildren are the child's own concern.
    pub fn has_error(&self) -> bool {
        if !self.errors.is_empty() {
            return true;
        }
        self.fields
            .values()
            .any(|value| matches!(value, FieldValue::Nested(sub) if !sub.errors().is_empty()))
    }
}
