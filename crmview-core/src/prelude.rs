//! Re-exports of the most commonly used core types.

pub use crate::api::{ApiResponse, Record, RemoteApi};
pub use crate::config::{ConfigProperties, ViewConfig};
pub use crate::error::ApiError;
pub use crate::item::{Item, EXTERNAL_TYPE};
pub use crate::pipeline::{stage_fn, Pipeline, Stage, StageFuture};
