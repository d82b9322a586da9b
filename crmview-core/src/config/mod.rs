mod loader;
pub mod typed;
pub mod value;

use std::collections::HashMap;
use std::ops::Deref;
use std::path::Path;

pub use typed::ConfigProperties;
pub use value::{ConfigValue, FromConfigValue};

/// Error type for settings operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading settings files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Setting not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Setting type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Settings load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// List-view settings loaded from YAML files, `.env` files and the environment.
///
/// `ViewConfig` (= `ViewConfig<()>`) gives raw key/value access.
/// `ViewConfig<T>` adds a typed section reachable through `Deref<Target = T>`.
///
/// Resolution order (lowest to highest priority):
/// 1. `crmview.yaml`
/// 2. `crmview-{profile}.yaml`
/// 3. `.env` and `.env.{profile}` (loaded into the process environment)
/// 4. `CRMVIEW_*` environment variables (`CRMVIEW_VIEW__SORT` overrides `view.sort`)
///
/// The profile is `CRMVIEW_PROFILE` if set, else the argument.
#[derive(Debug, Clone)]
pub struct ViewConfig<T = ()> {
    values: HashMap<String, ConfigValue>,
    profile: String,
    typed: T,
}

impl ViewConfig {
    /// Load settings for `profile` from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let active_profile =
            std::env::var("CRMVIEW_PROFILE").unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();
        loader::load_yaml_file(Path::new("crmview.yaml"), &mut values)?;
        loader::load_yaml_file(Path::new(&format!("crmview-{active_profile}.yaml")), &mut values)?;

        // .env files never overwrite variables that are already set
        let _ = dotenvy::dotenv();
        let _ = dotenvy::from_filename(format!(".env.{active_profile}"));

        for (name, value) in std::env::vars() {
            if let Some(key) = loader::env_key(&name) {
                values.insert(key, ConfigValue::String(value));
            }
        }

        tracing::debug!(profile = %active_profile, keys = values.len(), "settings loaded");
        Ok(ViewConfig {
            values,
            profile: active_profile,
            typed: (),
        })
    }

    /// Build settings from a YAML string.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(ViewConfig {
            values,
            profile: profile.to_string(),
            typed: (),
        })
    }

    pub fn empty() -> Self {
        ViewConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
            typed: (),
        }
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Upgrade to a typed config by constructing `C` from the raw values.
    pub fn with_typed<C: ConfigProperties>(self) -> Result<ViewConfig<C>, ConfigError> {
        let typed = C::from_config(&self)?;
        Ok(ViewConfig {
            values: self.values,
            profile: self.profile,
            typed,
        })
    }
}

impl<T> ViewConfig<T> {
    /// Get a typed value for a dot-separated key.
    ///
    /// # Errors
    ///
    /// `ConfigError::NotFound` if the key is absent, `ConfigError::TypeMismatch`
    /// if it cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning `default` if the key is missing or unconvertible.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn typed(&self) -> &T {
        &self.typed
    }
}

impl<T> Deref for ViewConfig<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.typed
    }
}
