use std::future::Future;
use std::sync::Arc;

use crmview_core::pipeline::points;
use crmview_core::{Item, Pipeline, RemoteApi};
use crmview_data::{ContentType, ContentTypes, Page, Pageable, PreQuery, QueryArgs, QueryParameters, RequestContext, TotalItems};
use crmview_display::{
    DisplaySettings, DisplaySettingsFields, FieldHref, FieldHtml, FieldItemHtml, FieldsHtml, LinkHtml,
};

/// Priority of the field label/value stage, ahead of generic decorators.
const FIELD_ITEM_PRIORITY: i32 = 5;
const DEFAULT_PRIORITY: i32 = 10;

/// The local storage query that external lists bypass.
pub trait LocalStore: Send + Sync {
    /// Items of the list described by `args`.
    fn query(&self, args: &QueryArgs) -> impl Future<Output = Vec<Item>> + Send;

    /// Total number of items of that list, ignoring pagination.
    fn count(&self, args: &QueryArgs) -> impl Future<Output = u64> + Send;
}

/// A store with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStore;

impl LocalStore for NoStore {
    fn query(&self, _args: &QueryArgs) -> impl Future<Output = Vec<Item>> + Send {
        std::future::ready(Vec::new())
    }

    fn count(&self, _args: &QueryArgs) -> impl Future<Output = u64> + Send {
        std::future::ready(0)
    }
}

/// One pipeline per extension point of the listing layer.
///
/// [`Hooks::new`] gives empty pipelines; [`Hooks::install`] registers the
/// CRM stages. Callers may add their own stages to any pipeline.
#[derive(Debug)]
pub struct Hooks {
    pub query_parameters: Pipeline<QueryArgs, (), RequestContext>,
    pub pre_query: Pipeline<Option<Vec<Item>>, QueryArgs, RequestContext>,
    pub total_items: Pipeline<u64, QueryArgs, RequestContext>,
    pub field_item_html: Pipeline<FieldHtml, Item, RequestContext>,
    pub fields_html: Pipeline<Vec<FieldHtml>, Item, RequestContext>,
    pub field_href: Pipeline<String, Item, RequestContext>,
    pub link_html: Pipeline<String, Item, RequestContext>,
    pub display_settings: Pipeline<DisplaySettings, (), RequestContext>,
    pub content_types: Pipeline<Vec<ContentType>, (), RequestContext>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            query_parameters: Pipeline::new(points::QUERY_PARAMETERS),
            pre_query: Pipeline::new(points::PRE_QUERY),
            total_items: Pipeline::new(points::TOTAL_ITEMS),
            field_item_html: Pipeline::new(points::FIELD_ITEM_HTML),
            fields_html: Pipeline::new(points::FIELDS_HTML),
            field_href: Pipeline::new(points::FIELD_HREF),
            link_html: Pipeline::new(points::LINK_HTML),
            display_settings: Pipeline::new(points::DISPLAY_SETTINGS),
            content_types: Pipeline::new(points::CONTENT_TYPES),
        }
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every CRM stage, all sharing `api`.
    pub fn install<A: RemoteApi + 'static>(mut self, api: Arc<A>) -> Self {
        self.query_parameters
            .add(DEFAULT_PRIORITY, QueryParameters::new(Arc::clone(&api)));
        self.pre_query.add(DEFAULT_PRIORITY, PreQuery::new(Arc::clone(&api)));
        self.total_items
            .add(DEFAULT_PRIORITY, TotalItems::new(Arc::clone(&api)));
        self.field_item_html
            .add(FIELD_ITEM_PRIORITY, FieldItemHtml::new(Arc::clone(&api)));
        self.fields_html
            .add(DEFAULT_PRIORITY, FieldsHtml::new(Arc::clone(&api)));
        self.field_href.add(DEFAULT_PRIORITY, FieldHref);
        self.link_html.add(DEFAULT_PRIORITY, LinkHtml);
        self.display_settings
            .add(DEFAULT_PRIORITY, DisplaySettingsFields::new(api));
        self.content_types.add(DEFAULT_PRIORITY, ContentTypes);
        tracing::debug!("crm stages installed");
        self
    }

    /// Load one page of the list `ctx` describes.
    ///
    /// When the list is paginated and no offset was given, the offset comes
    /// from the posted page number. The query parameters are computed, then
    /// `pre_query` may produce the items; `store` is only queried when no
    /// stage did. The total goes through `total_items` with the same
    /// query arguments as the listing.
    pub async fn load_page<S: LocalStore>(&self, ctx: &mut RequestContext, store: &S) -> Page<Item> {
        let pageable = Pageable::from_request(ctx);
        if ctx.offset().is_none() {
            ctx.set_offset(pageable.map(|p| p.offset()));
        }

        let args = QueryArgs::for_request(ctx);
        let args = self.query_parameters.run(args, &(), ctx).await;

        let (items, default_total) = match self.pre_query.run(None, &args, ctx).await {
            Some(items) => {
                let total = items.len() as u64;
                (items, total)
            }
            None => {
                let items = store.query(&args).await;
                (items, store.count(&args).await)
            }
        };
        let total = self.total_items.run(default_total, &args, ctx).await;
        tracing::debug!(content_type = %args.content_type, items = items.len(), total, "loaded list page");

        match pageable {
            Some(pageable) => Page::new(items, &pageable, total),
            None => Page::unpaged(items, total),
        }
    }

    /// Render the named fields of `item`.
    ///
    /// Each field runs through `field_item_html`, then the list runs
    /// through `fields_html`.
    pub async fn render_fields(&self, ctx: &mut RequestContext, item: &Item, names: &[&str]) -> Vec<FieldHtml> {
        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let field = self.field_item_html.run(FieldHtml::new(*name, ""), item, ctx).await;
            fields.push(field);
        }
        self.fields_html.run(fields, item, ctx).await
    }

    /// Detail link of `item`, given the listing layer's own link.
    pub async fn href(&self, ctx: &mut RequestContext, item: &Item, default: String) -> String {
        self.field_href.run(default, item, ctx).await
    }

    /// The content types selectable in the settings form.
    pub async fn content_type_options(&self, ctx: &mut RequestContext, types: Vec<ContentType>) -> Vec<ContentType> {
        self.content_types.run(types, &(), ctx).await
    }
}
