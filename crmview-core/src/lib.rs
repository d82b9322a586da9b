pub mod api;
pub mod config;
pub mod error;
pub mod item;
pub mod layers;
pub mod pipeline;
pub mod prelude;

pub use api::{is_truthy, ApiResponse, Record, RemoteApi};
pub use config::{ConfigError, ConfigProperties, ConfigValue, FromConfigValue, ViewConfig};
pub use error::ApiError;
pub use item::{display_value, Item, Sanitize, EXTERNAL_TYPE};
pub use layers::init_tracing;
pub use pipeline::{stage_fn, FnStage, Pipeline, Stage, StageFuture};
