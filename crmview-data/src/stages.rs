//! Pipeline stages for the query side of a list request.

use crmview_core::pipeline::{Stage, StageFuture};
use crmview_core::{Item, RemoteApi};

use crate::context::RequestContext;
use crate::executor::bypass_query;
use crate::query::{alter_query_args, QueryArgs};
use crate::settings::{register_content_type, ContentType};
use crate::total::resolve_total;

/// `query_parameters`: attach native call parameters to external lists.
pub struct QueryParameters<A> {
    api: A,
}

impl<A> QueryParameters<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi + 'static> Stage<QueryArgs, (), RequestContext> for QueryParameters<A> {
    fn name(&self) -> &'static str {
        "crmview::query_parameters"
    }

    fn apply<'a>(
        &'a self,
        input: QueryArgs,
        _args: &'a (),
        ctx: &'a mut RequestContext,
    ) -> StageFuture<'a, QueryArgs> {
        Box::pin(alter_query_args(&self.api, ctx, input))
    }
}

/// `pre_query`: replace the storage query of external lists.
pub struct PreQuery<A> {
    api: A,
}

impl<A> PreQuery<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi + 'static> Stage<Option<Vec<Item>>, QueryArgs, RequestContext> for PreQuery<A> {
    fn name(&self) -> &'static str {
        "crmview::pre_query"
    }

    fn apply<'a>(
        &'a self,
        input: Option<Vec<Item>>,
        args: &'a QueryArgs,
        ctx: &'a mut RequestContext,
    ) -> StageFuture<'a, Option<Vec<Item>>> {
        Box::pin(bypass_query(&self.api, ctx, args, input))
    }
}

/// `total_items`: count external lists remotely.
pub struct TotalItems<A> {
    api: A,
}

impl<A> TotalItems<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

impl<A: RemoteApi + 'static> Stage<u64, QueryArgs, RequestContext> for TotalItems<A> {
    fn name(&self) -> &'static str {
        "crmview::total_items"
    }

    fn apply<'a>(&'a self, input: u64, args: &'a QueryArgs, ctx: &'a mut RequestContext) -> StageFuture<'a, u64> {
        Box::pin(resolve_total(&self.api, ctx, args, input))
    }
}

/// `content_types`: offer the external type in the settings form.
pub struct ContentTypes;

impl Stage<Vec<ContentType>, (), RequestContext> for ContentTypes {
    fn name(&self) -> &'static str {
        "crmview::content_types"
    }

    fn apply<'a>(
        &'a self,
        input: Vec<ContentType>,
        _args: &'a (),
        _ctx: &'a mut RequestContext,
    ) -> StageFuture<'a, Vec<ContentType>> {
        Box::pin(std::future::ready(register_content_type(input)))
    }
}
