use std::collections::HashMap;
use std::sync::Arc;

use crmview_core::config::{ConfigError, ConfigProperties, ViewConfig};
use crmview_core::RemoteApi;

use crate::processor::{fetch_processor, DataProcessor};
use crate::query::ListQueryConfig;
use crate::schema::{fetch_schema, FieldSchema};
use crate::settings::ViewSettings;

/// Everything one list request knows, plus what it has already resolved.
///
/// Built fresh for every request and handed `&mut` to each stage. Resolved
/// data processors and field schemas are memoized here so each is fetched
/// at most once per request; nothing outlives the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    settings: ViewSettings,
    posted_query: Option<String>,
    offset: Option<u64>,
    base_url: Option<String>,
    processors: HashMap<String, Option<DataProcessor>>,
    schemas: HashMap<String, Arc<FieldSchema>>,
}

impl RequestContext {
    pub fn new(settings: ViewSettings) -> Self {
        let base_url = settings.base_url().map(str::to_string);
        Self {
            settings,
            posted_query: None,
            offset: None,
            base_url,
            processors: HashMap::new(),
            schemas: HashMap::new(),
        }
    }

    /// Context for the list described by the `view.*` settings.
    pub fn from_config(config: &ViewConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(ViewSettings::from_config(config)?))
    }

    /// Attach the URL-encoded filter payload posted with the request.
    pub fn with_posted_query(mut self, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        self.posted_query = (!payload.is_empty()).then_some(payload);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn set_offset(&mut self, offset: Option<u64>) {
        self.offset = offset;
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn posted_query(&self) -> Option<&str> {
        self.posted_query.as_deref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Whether the list is of the external content type.
    pub fn is_external(&self) -> bool {
        self.settings.is_external()
    }

    /// The detail-page base URL, `None` when unset or blank.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// List parameters for this request at `offset`.
    pub fn list_query_config(&self, offset: Option<u64>) -> ListQueryConfig {
        let config = ListQueryConfig::from_settings(&self.settings).offset(offset);
        match &self.posted_query {
            Some(payload) => config.posted_query(payload),
            None => config,
        }
    }

    /// Resolve data processor `id`, fetching it on first use.
    pub async fn processor<A: RemoteApi>(&mut self, api: &A, id: &str) -> Option<DataProcessor> {
        if let Some(cached) = self.processors.get(id) {
            return cached.clone();
        }
        let resolved = fetch_processor(api, id).await;
        self.processors.insert(id.to_string(), resolved.clone());
        resolved
    }

    /// Field schema of data processor `id`, fetching it on first use.
    ///
    /// An unknown processor or a failed lookup gives an empty schema, which
    /// is memoized like any other.
    pub async fn schema<A: RemoteApi>(&mut self, api: &A, id: &str) -> Arc<FieldSchema> {
        if let Some(cached) = self.schemas.get(id) {
            return Arc::clone(cached);
        }
        let schema = match self.processor(api, id).await {
            Some(processor) => fetch_schema(api, &processor).await,
            None => FieldSchema::default(),
        };
        let schema = Arc::new(schema);
        self.schemas.insert(id.to_string(), Arc::clone(&schema));
        schema
    }
}
