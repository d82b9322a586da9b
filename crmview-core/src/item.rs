use serde::Serialize;
use serde_json::Value;

use crate::api::Record;

/// Content type tag of items sourced from the remote CRM.
pub const EXTERNAL_TYPE: &str = "civicrm";

/// How the render layer should treat an item's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanitize {
    /// Apply the render layer's usual display filtering.
    #[default]
    Display,
    /// Values are used as-is.
    Raw,
}

/// A content item as seen by the list rendering layer.
///
/// Native items and pseudo-items built from remote records share this
/// shape. Pseudo-items carry `item_type == EXTERNAL_TYPE`, the owning data
/// processor id, and every passthrough field of the remote record in
/// `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: Value,
    pub title: String,
    pub item_type: String,
    pub sanitize: Sanitize,
    pub data_processor_id: Option<String>,
    pub fields: Record,
}

impl Item {
    /// A native item with no extra fields.
    pub fn new(id: impl Into<Value>, title: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            item_type: item_type.into(),
            sanitize: Sanitize::Display,
            data_processor_id: None,
            fields: Record::new(),
        }
    }

    pub fn is_external(&self) -> bool {
        self.item_type == EXTERNAL_TYPE
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Display text of the named field, empty when absent.
    pub fn field_text(&self, name: &str) -> String {
        self.field(name).map(display_value).unwrap_or_default()
    }

    /// The id rendered as plain text, for URLs.
    pub fn id_text(&self) -> String {
        display_value(&self.id)
    }
}

/// Render a JSON value the way a template would print it.
///
/// Strings print bare, `null` and `false` print nothing, `true` prints `1`,
/// lists are comma-joined and objects fall back to their JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}
