use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One printed column of a listing: `label: element[key]`, or the bare value
/// when the label is empty.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Column {
    #[serde(default)]
    pub label: String,
    pub key: String,
}

impl Column {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }

    pub fn bare(key: impl Into<String>) -> Self {
        Self::new("", key)
    }
}

/// Which top-level list to walk and what to print for each element.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Listing {
    pub field: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Placed between columns on one line.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    ", ".to_string()
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn field<'a>(value: &'a Value, name: &str) -> Result<&'a Value> {
    value
        .get(name)
        .ok_or_else(|| Error::MissingField(name.to_string()))
}

pub fn list_field<'a>(value: &'a Value, name: &str) -> Result<&'a [Value]> {
    field(value, name)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::Shape {
            field: name.to_string(),
            expected: "a list",
        })
}

/// Strings print bare, everything else as JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Listing {
    pub fn new(field: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            field: field.into(),
            columns,
            separator: default_separator(),
        }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// One line per element, in the order the server returned them. All lines
    /// are built before any is returned, so a missing key anywhere yields an
    /// error and nothing else.
    pub fn lines(&self, value: &Value) -> Result<Vec<String>> {
        let rows = list_field(value, &self.field)?;
        rows.iter().map(|row| self.line(row)).collect()
    }

    fn line(&self, row: &Value) -> Result<String> {
        if self.columns.is_empty() {
            return Ok(render(row));
        }
        let parts = self
            .columns
            .iter()
            .map(|column| -> Result<String> {
                let value = render(field(row, &column.key)?);
                if column.label.is_empty() {
                    Ok(value)
                } else {
                    Ok(format!("{}: {}", column.label, value))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(&self.separator))
    }
}
