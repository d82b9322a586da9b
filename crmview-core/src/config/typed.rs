use super::{ConfigError, ViewConfig};

/// A strongly-typed settings section read from a [`ViewConfig`].
///
/// ```ignore
/// struct LinkSettings { base_url: Option<String> }
///
/// impl ConfigProperties for LinkSettings {
///     fn prefix() -> &'static str { "view" }
///     fn from_config(config: &ViewConfig) -> Result<Self, ConfigError> {
///         Ok(Self { base_url: config.get_or("view.link_url", None) })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The key prefix of the section (e.g. `"view"`).
    fn prefix() -> &'static str;

    /// Construct the section from raw settings.
    fn from_config(config: &ViewConfig) -> Result<Self, ConfigError>;
}
