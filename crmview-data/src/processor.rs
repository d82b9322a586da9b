use crmview_core::{display_value, Record, RemoteApi};
use serde_json::json;

/// Entity holding data processor output definitions.
pub const OUTPUT_ENTITY: &str = "DataProcessorOutput";
/// Output type of processors exposed as an API.
pub const API_OUTPUT_TYPE: &str = "api";
/// Count action used when the output does not name one.
pub const DEFAULT_COUNT_ACTION: &str = "getcount";

/// A data processor's API output: which entity/action lists its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProcessor {
    pub id: String,
    pub entity: String,
    pub action: String,
    pub count_action: String,
    pub output_type: String,
}

impl DataProcessor {
    /// Build from a `DataProcessorOutput` record. Needs an entity and an action.
    pub fn from_record(id: &str, record: &Record) -> Option<Self> {
        Some(Self {
            id: id.to_string(),
            entity: text(record, "api_entity")?,
            action: text(record, "api_action")?,
            count_action: text(record, "api_count_action")
                .unwrap_or_else(|| DEFAULT_COUNT_ACTION.to_string()),
            output_type: text(record, "type").unwrap_or_else(|| API_OUTPUT_TYPE.to_string()),
        })
    }
}

fn text(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .map(display_value)
        .filter(|value| !value.is_empty())
}

/// Look up the API output of data processor `id`.
///
/// `None` when the processor has no API output, the record is incomplete
/// or the lookup fails.
pub async fn fetch_processor<A: RemoteApi>(api: &A, id: &str) -> Option<DataProcessor> {
    let params = json!({
        "sequential": 1,
        "type": API_OUTPUT_TYPE,
        "data_processor_id": id,
    });
    let records = match api.call_values(OUTPUT_ENTITY, "get", params).await {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(data_processor_id = id, error = %err, "data processor lookup failed");
            return None;
        }
    };
    let processor = records
        .first()
        .and_then(|record| DataProcessor::from_record(id, record));
    if processor.is_none() {
        tracing::debug!(data_processor_id = id, "no usable api output for data processor");
    }
    processor
}

/// An entry of the data processor select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProcessorOption {
    pub id: String,
    pub title: String,
}

/// Every data processor with an API output, titled for the settings form.
///
/// A failed lookup yields no options.
pub async fn data_processor_options<A: RemoteApi>(api: &A) -> Vec<DataProcessorOption> {
    let params = json!({
        "sequential": 1,
        "type": API_OUTPUT_TYPE,
        "api.DataProcessor.getsingle": {"id": "$value.data_processor_id"},
    });
    let records = match api.call_values(OUTPUT_ENTITY, "get", params).await {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(error = %err, "listing data processors failed");
            return Vec::new();
        }
    };
    records
        .iter()
        .filter_map(|record| {
            let id = text(record, "data_processor_id")?;
            let title = record
                .get("api.DataProcessor.getsingle")
                .and_then(|single| single.get("title"))
                .map(display_value)
                .unwrap_or_default();
            Some(DataProcessorOption { id, title })
        })
        .collect()
}
