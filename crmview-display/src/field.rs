use std::sync::Arc;

use crmview_core::{Item, RemoteApi};
use crmview_data::{FieldSchema, RequestContext};
use serde::Serialize;

/// Schema fields that are always implied and never offered as extra fields.
pub const IMPLIED_FIELDS: &[&str] = &["id", "title"];

/// Rendered markup of one field of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldHtml {
    pub field: String,
    pub html: String,
}

impl FieldHtml {
    pub fn new(field: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            html: html.into(),
        }
    }
}

/// The label/value fragment of one field.
pub fn field_markup(label: &str, value: &str) -> String {
    format!(
        "<div class='col-md-12 pt-cv-ctf-column'>\
         <div class='pt-cv-custom-fields pt-cv-ctf-post_field_1'>\
         <div class='pt-cv-ctf-value'><strong>{label}</strong>: {value}</div>\
         </div></div>"
    )
}

/// Field schema of the data processor that produced `item`.
async fn item_schema<A: RemoteApi>(api: &A, ctx: &mut RequestContext, item: &Item) -> Arc<FieldSchema> {
    match item.data_processor_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => ctx.schema(api, id).await,
        None => Arc::default(),
    }
}

/// Render `field.field` of `item` as a label/value fragment.
///
/// Items of other content types are returned untouched. A field missing
/// from the schema renders with an empty label.
pub async fn render_field<A: RemoteApi>(
    api: &A,
    ctx: &mut RequestContext,
    field: FieldHtml,
    item: &Item,
) -> FieldHtml {
    if !item.is_external() {
        return field;
    }
    let schema = item_schema(api, ctx, item).await;
    let label = schema.label(&field.field).unwrap_or_default();
    if label.is_empty() {
        tracing::debug!(field = %field.field, "rendering field without a schema label");
    }
    let html = field_markup(label, &item.field_text(&field.field));
    FieldHtml { html, ..field }
}

/// Keep only the fields of an external item that its schema knows about.
///
/// Items of other content types keep every field.
pub async fn filter_fields<A: RemoteApi>(
    api: &A,
    ctx: &mut RequestContext,
    mut fields: Vec<FieldHtml>,
    item: &Item,
) -> Vec<FieldHtml> {
    if !item.is_external() {
        return fields;
    }
    let schema = item_schema(api, ctx, item).await;
    fields.retain(|field| schema.contains(&field.field));
    fields
}

/// An entry of the generic "available fields" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableField {
    pub name: String,
    pub label: String,
}

impl AvailableField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Display settings of one list as offered to the settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplaySettings {
    pub data_processor_id: Option<String>,
    pub fields: Vec<AvailableField>,
}

impl DisplaySettings {
    /// Settings for the list of `ctx`, with the given generic fields.
    pub fn for_request(ctx: &RequestContext, fields: Vec<AvailableField>) -> Self {
        Self {
            data_processor_id: ctx.settings().data_processor_id().map(str::to_string),
            fields,
        }
    }
}

/// Merge the schema fields of the configured data processor into the
/// available-field list, minus [`IMPLIED_FIELDS`] and names already listed.
pub async fn expand_available_fields<A: RemoteApi>(
    api: &A,
    ctx: &mut RequestContext,
    mut settings: DisplaySettings,
) -> DisplaySettings {
    let Some(id) = settings
        .data_processor_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return settings;
    };
    let schema = ctx.schema(api, id).await;
    for (name, label) in schema.iter() {
        if IMPLIED_FIELDS.contains(&name) || settings.fields.iter().any(|f| f.name == name) {
            continue;
        }
        settings.fields.push(AvailableField::new(name, label));
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_markup() {
        assert_eq!(
            field_markup("First Name", "Jane"),
            "<div class='col-md-12 pt-cv-ctf-column'><div class='pt-cv-custom-fields pt-cv-ctf-post_field_1'>\
             <div class='pt-cv-ctf-value'><strong>First Name</strong>: Jane</div></div></div>"
        );
    }

    #[test]
    fn test_empty_label_markup() {
        assert!(field_markup("", "x").contains("<strong></strong>: x"));
    }
}
