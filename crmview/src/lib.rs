//! crmview: list and render records of a remote CRM through the extension
//! points of a generic content-listing layer.
//!
//! This facade re-exports the sub-crates and wires their stages into one
//! [`Hooks`] value. Import everything you need with:
//!
//! ```ignore
//! use crmview::prelude::*;
//!
//! let hooks = Hooks::new().install(Arc::new(client));
//! let mut ctx = RequestContext::from_config(&ViewConfig::load("prod")?)?
//!     .with_posted_query(payload);
//! let page = hooks.load_page(&mut ctx, &store).await;
//! ```

pub mod hooks;

// Re-export everything from crmview-core at the top level for convenience.
pub use crmview_core::*;

pub use crmview_data;
pub use crmview_display;

pub use hooks::{Hooks, LocalStore, NoStore};

/// Unified prelude: import everything with `use crmview::prelude::*`.
pub mod prelude {
    pub use crmview_core::prelude::*;
    pub use crmview_data::prelude::*;
    pub use crmview_display::prelude::*;

    pub use crate::hooks::{Hooks, LocalStore, NoStore};
}
