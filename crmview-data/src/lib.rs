pub mod context;
pub mod executor;
pub mod page;
pub mod processor;
pub mod query;
pub mod schema;
pub mod settings;
pub mod stages;
pub mod total;

pub use context::RequestContext;
pub use executor::{bypass_query, pseudo_item, DENYLISTED_FIELDS};
pub use page::{Page, Pageable};
pub use processor::{data_processor_options, fetch_processor, DataProcessor, DataProcessorOption};
pub use query::{
    alter_query_args, translate, FilterValue, ListQueryConfig, NativeQueryParams, PostedValue, QueryArgs,
    QueryOptions,
};
pub use schema::{fetch_schema, resolve_schema, FieldSchema};
pub use settings::{register_content_type, ContentType, ViewSettings};
pub use stages::{ContentTypes, PreQuery, QueryParameters, TotalItems};
pub use total::resolve_total;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        DataProcessor, FieldSchema, ListQueryConfig, NativeQueryParams, Page, Pageable, QueryArgs,
        RequestContext, ViewSettings,
    };
}
