//! Staged pipelines for the render layer's extension points.
//!
//! Each extension point (`query_parameters`, `field_href`, ...) is a
//! [`Pipeline`]: an ordered list of named [`Stage`]s, each taking the
//! current value plus read-only arguments and the per-request context, and
//! returning the next value. Stages run strictly one after another.
//!
//! ```ignore
//! let mut href = Pipeline::<String, Item, RequestContext>::new(points::FIELD_HREF);
//! href.add(10, LinkResolver);
//! let link = href.run(default_link, &item, &mut ctx).await;
//! ```

use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`Stage::apply`].
pub type StageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Names of the extension points the adapter plugs into.
pub mod points {
    pub const QUERY_PARAMETERS: &str = "query_parameters";
    pub const PRE_QUERY: &str = "pre_query";
    pub const TOTAL_ITEMS: &str = "total_items";
    pub const FIELD_ITEM_HTML: &str = "field_item_html";
    pub const FIELDS_HTML: &str = "fields_html";
    pub const FIELD_HREF: &str = "field_href";
    pub const LINK_HTML: &str = "link_html";
    pub const DISPLAY_SETTINGS: &str = "display_settings";
    pub const CONTENT_TYPES: &str = "content_types";
}

/// One named transformation in a [`Pipeline`].
///
/// `T` is the value threaded through the pipeline, `Args` are read-only
/// arguments the caller supplies alongside it, `C` is the per-request context.
pub trait Stage<T, Args: ?Sized, C>: Send + Sync + 'static {
    /// The stage name (for diagnostics).
    fn name(&self) -> &'static str;

    fn apply<'a>(&'a self, input: T, args: &'a Args, ctx: &'a mut C) -> StageFuture<'a, T>;
}

/// A synchronous stage built from a closure. See [`stage_fn`].
pub struct FnStage<F> {
    name: &'static str,
    f: F,
}

/// Wrap a plain function as a [`Stage`].
pub fn stage_fn<F>(name: &'static str, f: F) -> FnStage<F> {
    FnStage { name, f }
}

impl<T, Args, C, F> Stage<T, Args, C> for FnStage<F>
where
    T: Send + 'static,
    Args: ?Sized,
    F: Fn(T, &Args, &mut C) -> T + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply<'a>(&'a self, input: T, args: &'a Args, ctx: &'a mut C) -> StageFuture<'a, T> {
        let output = (self.f)(input, args, ctx);
        Box::pin(std::future::ready(output))
    }
}

struct Registered<T, Args: ?Sized, C> {
    priority: i32,
    stage: Box<dyn Stage<T, Args, C>>,
}

/// An ordered set of stages for one extension point.
///
/// Lower priorities run first; stages with equal priority run in the order
/// they were added.
pub struct Pipeline<T, Args: ?Sized, C> {
    point: &'static str,
    stages: Vec<Registered<T, Args, C>>,
}

impl<T: 'static, Args: ?Sized + 'static, C: 'static> Pipeline<T, Args, C> {
    pub fn new(point: &'static str) -> Self {
        Self {
            point,
            stages: Vec::new(),
        }
    }

    /// Register a stage at `priority`.
    pub fn add<S: Stage<T, Args, C>>(&mut self, priority: i32, stage: S) -> &mut Self {
        let at = self.stages.partition_point(|r| r.priority <= priority);
        self.stages.insert(
            at,
            Registered {
                priority,
                stage: Box::new(stage),
            },
        );
        self
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn with<S: Stage<T, Args, C>>(mut self, priority: i32, stage: S) -> Self {
        self.add(priority, stage);
        self
    }

    pub fn point(&self) -> &'static str {
        self.point
    }

    /// Stage names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|r| r.stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Thread `input` through every stage in order.
    pub async fn run(&self, input: T, args: &Args, ctx: &mut C) -> T {
        let mut value = input;
        for registered in &self.stages {
            tracing::trace!(point = self.point, stage = registered.stage.name(), "running stage");
            value = registered.stage.apply(value, args, ctx).await;
        }
        value
    }
}

impl<T: 'static, Args: ?Sized + 'static, C: 'static> std::fmt::Debug for Pipeline<T, Args, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("point", &self.point)
            .field("stages", &self.names())
            .finish()
    }
}
