use crmview_core::item::Sanitize;
use crmview_core::{display_value, Item, Record, RemoteApi, EXTERNAL_TYPE};
use serde_json::Value;

use crate::context::RequestContext;
use crate::query::QueryArgs;

/// Remote record fields never copied onto a pseudo-item.
pub const DENYLISTED_FIELDS: &[&str] = &["hash"];

/// Turn one remote record into a pseudo-item owned by `data_processor_id`.
pub fn pseudo_item(record: Record, data_processor_id: &str) -> Item {
    let id = record.get("id").cloned().unwrap_or(Value::Null);
    let title = record.get("title").map(display_value).unwrap_or_default();
    let fields = record
        .into_iter()
        .filter(|(name, _)| !DENYLISTED_FIELDS.contains(&name.as_str()))
        .collect();
    Item {
        id,
        title,
        item_type: EXTERNAL_TYPE.to_string(),
        sanitize: Sanitize::Raw,
        data_processor_id: Some(data_processor_id.to_string()),
        fields,
    }
}

/// Produce the result set of an external list from the remote API.
///
/// `current` is the result produced so far by the storage layer's pre-query
/// step, `None` meaning "run the storage query". For other content types it
/// is returned untouched and no remote call is made. For external lists the
/// return value is always `Some`, so storage is never queried:
/// - no data processor configured, unknown processor or failed call: empty;
/// - otherwise one pseudo-item per remote record, in remote order.
pub async fn bypass_query<A: RemoteApi>(
    api: &A,
    ctx: &mut RequestContext,
    args: &QueryArgs,
    current: Option<Vec<Item>>,
) -> Option<Vec<Item>> {
    if !args.is_external() {
        return current;
    }
    let Some(id) = args.data_processor_id.as_deref().filter(|id| !id.is_empty()) else {
        tracing::debug!("external list without data processor, returning no items");
        return Some(Vec::new());
    };
    let Some(processor) = ctx.processor(api, id).await else {
        return Some(Vec::new());
    };

    let params = args.api_params.clone().unwrap_or_default().to_value();
    let records = match api.call_values(&processor.entity, &processor.action, params).await {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(
                entity = %processor.entity,
                action = %processor.action,
                error = %err,
                "listing call failed, returning no items"
            );
            return Some(Vec::new());
        }
    };
    tracing::debug!(data_processor_id = id, count = records.len(), "bypassed storage query");
    Some(records.into_iter().map(|record| pseudo_item(record, id)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pseudo_item_shape() {
        let record = match json!({
            "id": "3",
            "title": "Jane Doe",
            "first_name": "Jane",
            "hash": "a1b2c3",
            "email": null
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let item = pseudo_item(record, "5");
        assert_eq!(item.id, json!("3"));
        assert_eq!(item.title, "Jane Doe");
        assert!(item.is_external());
        assert_eq!(item.sanitize, Sanitize::Raw);
        assert_eq!(item.data_processor_id.as_deref(), Some("5"));
        let names: Vec<_> = item.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "title", "first_name", "email"]);
    }

    #[test]
    fn test_pseudo_item_without_title() {
        let item = pseudo_item(Record::new(), "5");
        assert_eq!(item.id, Value::Null);
        assert_eq!(item.title, "");
        assert!(item.fields.is_empty());
    }
}
