//! Pipeline stages for the render side of a list request.

use crmview_core::pipeline::{Stage, StageFuture};
use crmview_core::{Item, RemoteApi};
use crmview_data::RequestContext;

use crate::field::{expand_available_fields, filter_fields, render_field, DisplaySettings, FieldHtml};
use crate::link::{link_html, resolve_href};

/// `field_item_html`: label/value markup for fields of external items.
pub struct FieldItemHtml<A> {
    api: A,
}

impl<A> FieldItemHtml<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi + 'static> Stage<FieldHtml, Item, RequestContext> for FieldItemHtml<A> {
    fn name(&self) -> &'static str {
        "crmview::field_item_html"
    }

    fn apply<'a>(&'a self, input: FieldHtml, item: &'a Item, ctx: &'a mut RequestContext) -> StageFuture<'a, FieldHtml> {
        Box::pin(render_field(&self.api, ctx, input, item))
    }
}

/// `fields_html`: drop fields outside the schema of external items.
pub struct FieldsHtml<A> {
    api: A,
}

impl<A> FieldsHtml<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi + 'static> Stage<Vec<FieldHtml>, Item, RequestContext> for FieldsHtml<A> {
    fn name(&self) -> &'static str {
        "crmview::fields_html"
    }

    fn apply<'a>(
        &'a self,
        input: Vec<FieldHtml>,
        item: &'a Item,
        ctx: &'a mut RequestContext,
    ) -> StageFuture<'a, Vec<FieldHtml>> {
        Box::pin(filter_fields(&self.api, ctx, input, item))
    }
}

/// `display_settings`: offer the schema fields as available fields.
pub struct DisplaySettingsFields<A> {
    api: A,
}

impl<A> DisplaySettingsFields<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi + 'static> Stage<DisplaySettings, (), RequestContext> for DisplaySettingsFields<A> {
    fn name(&self) -> &'static str {
        "crmview::display_settings"
    }

    fn apply<'a>(
        &'a self,
        input: DisplaySettings,
        _args: &'a (),
        ctx: &'a mut RequestContext,
    ) -> StageFuture<'a, DisplaySettings> {
        Box::pin(expand_available_fields(&self.api, ctx, input))
    }
}

/// `field_href`: detail links of external items.
pub struct FieldHref;

impl Stage<String, Item, RequestContext> for FieldHref {
    fn name(&self) -> &'static str {
        "crmview::field_href"
    }

    fn apply<'a>(&'a self, input: String, item: &'a Item, ctx: &'a mut RequestContext) -> StageFuture<'a, String> {
        Box::pin(std::future::ready(resolve_href(input, item, ctx)))
    }
}

/// `link_html`: unlink external items without a detail page.
pub struct LinkHtml;

impl Stage<String, Item, RequestContext> for LinkHtml {
    fn name(&self) -> &'static str {
        "crmview::link_html"
    }

    fn apply<'a>(&'a self, input: String, item: &'a Item, ctx: &'a mut RequestContext) -> StageFuture<'a, String> {
        Box::pin(std::future::ready(link_html(input, item, ctx)))
    }
}
