use std::collections::BTreeMap;

use crmview_core::{display_value, is_truthy, Record, RemoteApi};
use serde_json::json;

use crate::processor::{fetch_processor, DataProcessor};

/// Flag marking a field as returned by the listing action.
pub const RETURN_FLAG: &str = "api.return";

/// Field name to display label of a data processor's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    labels: BTreeMap<String, String>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the fields flagged as returnable from a `getfields` reply.
    pub fn from_field_records(fields: &[Record]) -> Self {
        fields
            .iter()
            .filter(|field| field.get(RETURN_FLAG).is_some_and(is_truthy))
            .filter_map(|field| {
                let name = field.get("name").map(display_value).filter(|n| !n.is_empty())?;
                let title = field.get("title").map(display_value).unwrap_or_default();
                Some((name, title))
            })
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(name.into(), label.into());
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Fetch the returnable fields of `processor`'s entity/action.
///
/// A failed lookup gives an empty schema.
pub async fn fetch_schema<A: RemoteApi>(api: &A, processor: &DataProcessor) -> FieldSchema {
    let params = json!({ "action": processor.action });
    match api.call_values(&processor.entity, "getfields", params).await {
        Ok(fields) => FieldSchema::from_field_records(&fields),
        Err(err) => {
            tracing::warn!(
                entity = %processor.entity,
                action = %processor.action,
                error = %err,
                "field schema lookup failed"
            );
            FieldSchema::default()
        }
    }
}

/// Resolve the field schema of data processor `id` without a request context.
pub async fn resolve_schema<A: RemoteApi>(api: &A, id: &str) -> FieldSchema {
    match fetch_processor(api, id).await {
        Some(processor) => fetch_schema(api, &processor).await,
        None => FieldSchema::default(),
    }
}
