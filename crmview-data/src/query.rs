//! Translation of list-view settings into native remote call parameters.
//!
//! ```ignore
//! let config = ListQueryConfig::from_settings(&settings)
//!     .offset(Some(20))
//!     .posted_query("contact_name_search=Jane&page=3");
//! let params = translate(&api, &config).await;
//! api.call_values(&dp.entity, &dp.action, params.to_value()).await?;
//! ```

use crmview_core::{RemoteApi, EXTERNAL_TYPE};
use serde_json::{json, Map, Value};

use crate::context::RequestContext;
use crate::settings::ViewSettings;

/// Posted key carrying the page number; never forwarded as a filter.
pub const PAGE_KEY: &str = "page";
/// Posted key whose text is resolved to a set of contact ids.
pub const NAME_SEARCH_KEY: &str = "contact_name_search";
/// Top-level parameter holding sort/limit/offset.
pub const OPTIONS_KEY: &str = "options";

/// Generic list parameters, normalized from settings and the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQueryConfig {
    pub sort: Option<String>,
    /// `Some(0)` means unbounded, `None` means unset.
    pub limit: Option<u64>,
    pub pagination_enabled: bool,
    pub page_size: Option<u64>,
    pub offset: Option<u64>,
    /// Posted filters in first-seen key order, page key removed.
    pub filters: Vec<(String, PostedValue)>,
}

impl ListQueryConfig {
    pub fn from_settings(settings: &ViewSettings) -> Self {
        Self {
            sort: settings
                .sort
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            limit: parse_limit(settings.limit.as_deref()),
            pagination_enabled: settings.pagination_enabled,
            page_size: parse_page_size(settings.items_per_page.as_deref()),
            offset: None,
            filters: Vec::new(),
        }
    }

    pub fn offset(mut self, offset: Option<u64>) -> Self {
        self.offset = offset;
        self
    }

    /// Take filters from a URL-encoded posted payload.
    pub fn posted_query(mut self, payload: &str) -> Self {
        self.filters = parse_posted_filters(payload);
        self
    }

    /// The limit the remote call will receive: the page size when
    /// pagination is on and a size is given, else the plain limit.
    pub fn effective_limit(&self) -> Option<u64> {
        match (self.pagination_enabled, self.page_size) {
            (true, Some(size)) => Some(size),
            _ => self.limit,
        }
    }
}

/// Parse the plain limit setting. Blank is unset, `0` is kept.
pub fn parse_limit(raw: Option<&str>) -> Option<u64> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(limit) => Some(limit),
        Err(_) => {
            tracing::warn!(limit = raw, "ignoring non-numeric limit setting");
            None
        }
    }
}

/// Parse the pagination page size. Blank and `0` both count as empty.
pub fn parse_page_size(raw: Option<&str>) -> Option<u64> {
    parse_limit(raw).filter(|size| *size > 0)
}

/// Suffix marking a multi-valued posted key, as in `group_id[]=1&group_id[]=2`.
const LIST_SUFFIX: &str = "[]";

/// A posted filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostedValue {
    One(String),
    /// Collected from repeated `key[]` entries.
    Many(Vec<String>),
}

/// Parse a URL-encoded payload into filter pairs.
///
/// A repeated key keeps its first position and takes its last value.
/// `key[]` entries are collected under `key` into a list. The page key is
/// dropped.
pub fn parse_posted_filters(payload: &str) -> Vec<(String, PostedValue)> {
    let mut filters: Vec<(String, PostedValue)> = Vec::new();
    for (raw_key, value) in form_urlencoded::parse(payload.as_bytes()) {
        let (key, is_list) = match raw_key.strip_suffix(LIST_SUFFIX) {
            Some(key) => (key, true),
            None => (&*raw_key, false),
        };
        if key.is_empty() || key == PAGE_KEY {
            continue;
        }
        let value = value.into_owned();
        let slot = filters.iter_mut().find(|(k, _)| k == key);
        match (slot, is_list) {
            (Some((_, PostedValue::Many(values))), true) => values.push(value),
            (Some((_, existing)), true) => *existing = PostedValue::Many(vec![value]),
            (Some((_, existing)), false) => *existing = PostedValue::One(value),
            (None, true) => filters.push((key.to_string(), PostedValue::Many(vec![value]))),
            (None, false) => filters.push((key.to_string(), PostedValue::One(value))),
        }
    }
    filters
}

/// The posted page number, if any.
pub fn posted_page(payload: &str) -> Option<u64> {
    form_urlencoded::parse(payload.as_bytes())
        .filter(|(key, _)| key == PAGE_KEY)
        .last()
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// The `options` sub-object of a native call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub sort: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl QueryOptions {
    pub fn to_value(&self) -> Value {
        let mut options = Map::new();
        if let Some(sort) = &self.sort {
            options.insert("sort".into(), Value::String(sort.clone()));
        }
        if let Some(limit) = self.limit {
            options.insert("limit".into(), limit.into());
        }
        if let Some(offset) = self.offset {
            options.insert("offset".into(), offset.into());
        }
        Value::Object(options)
    }
}

/// A filter value of a native call.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Passed through as posted.
    Literal(String),
    /// A multi-valued posted filter, passed through as a list.
    List(Vec<String>),
    /// Inclusion set, serialized as `{"IN": [...]}`. An empty set matches nothing.
    In(Vec<Value>),
}

impl FilterValue {
    pub fn to_value(&self) -> Value {
        match self {
            FilterValue::Literal(value) => Value::String(value.clone()),
            FilterValue::List(values) => json!(values),
            FilterValue::In(ids) => json!({ "IN": ids }),
        }
    }
}

/// Parameters of one native listing (or count) call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeQueryParams {
    pub options: QueryOptions,
    filters: Vec<(String, FilterValue)>,
}

impl NativeQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: &str) -> Self {
        self.options.sort = Some(sort.to_string());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.options.offset = Some(offset);
        self
    }

    /// Set a filter, replacing an earlier value for the same key.
    pub fn filter(mut self, key: &str, value: FilterValue) -> Self {
        match self.filters.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value,
            None => self.filters.push((key.to_string(), value)),
        }
        self
    }

    pub fn filter_value(&self, key: &str) -> Option<&FilterValue> {
        self.filters.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn filters(&self) -> &[(String, FilterValue)] {
        &self.filters
    }

    /// The JSON parameter object handed to the remote call.
    pub fn to_value(&self) -> Value {
        let mut params = Map::new();
        params.insert(OPTIONS_KEY.into(), self.options.to_value());
        for (key, value) in &self.filters {
            params.insert(key.clone(), value.to_value());
        }
        Value::Object(params)
    }
}

/// Translate list parameters into the native parameters of one call.
///
/// Applied in order: sort, plain limit, page size (overrides the limit when
/// pagination is on), non-zero offset, then posted filters. The name-search
/// filter costs one extra remote lookup per searched text.
pub async fn translate<A: RemoteApi>(api: &A, config: &ListQueryConfig) -> NativeQueryParams {
    let mut params = NativeQueryParams::new();
    if let Some(sort) = &config.sort {
        params = params.sort(sort);
    }
    if let Some(limit) = config.limit {
        params = params.limit(limit);
    }
    if config.pagination_enabled {
        if let Some(size) = config.page_size {
            params = params.limit(size);
        }
    }
    if let Some(offset) = config.offset.filter(|o| *o > 0) {
        params = params.offset(offset);
    }
    for (key, value) in &config.filters {
        if key == OPTIONS_KEY {
            tracing::warn!(key = %key, "ignoring posted filter with reserved name");
            continue;
        }
        let filter = match value {
            PostedValue::One(text) if key == NAME_SEARCH_KEY => {
                FilterValue::In(search_contact_ids(api, text).await)
            }
            PostedValue::Many(texts) if key == NAME_SEARCH_KEY => {
                let mut ids = Vec::new();
                for text in texts {
                    for id in search_contact_ids(api, text).await {
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                }
                FilterValue::In(ids)
            }
            PostedValue::One(text) => FilterValue::Literal(text.clone()),
            PostedValue::Many(texts) => FilterValue::List(texts.clone()),
        };
        params = params.filter(key, filter);
    }
    params
}

/// Ids of contacts whose sortable name matches `text`.
///
/// A failed lookup yields no ids, so the filter matches nothing.
pub async fn search_contact_ids<A: RemoteApi>(api: &A, text: &str) -> Vec<Value> {
    let params = json!({
        "sequential": 1,
        "return": ["id"],
        "sort_name": text,
    });
    match api.call_values("Contact", "get", params).await {
        Ok(records) => records
            .into_iter()
            .filter_map(|mut record| record.remove("id"))
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "contact name search failed");
            Vec::new()
        }
    }
}

/// Generic query arguments as they flow between the list stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryArgs {
    pub content_type: String,
    pub offset: Option<u64>,
    pub data_processor_id: Option<String>,
    pub api_params: Option<NativeQueryParams>,
}

impl QueryArgs {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            ..Self::default()
        }
    }

    /// Arguments for the list the context describes.
    pub fn for_request(ctx: &RequestContext) -> Self {
        Self {
            content_type: ctx.settings().content_type.clone(),
            offset: ctx.offset(),
            ..Self::default()
        }
    }

    pub fn is_external(&self) -> bool {
        self.content_type == EXTERNAL_TYPE
    }
}

/// Attach native parameters and the data processor id to external lists.
///
/// Other content types pass through untouched.
pub async fn alter_query_args<A: RemoteApi>(
    api: &A,
    ctx: &mut RequestContext,
    args: QueryArgs,
) -> QueryArgs {
    if !args.is_external() {
        return args;
    }
    let config = ctx.list_query_config(args.offset);
    let params = translate(api, &config).await;
    tracing::debug!(params = %params.to_value(), "translated list query");
    QueryArgs {
        data_processor_id: ctx.settings().data_processor_id().map(str::to_string),
        api_params: Some(params),
        ..args
    }
}
