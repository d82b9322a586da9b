use crmview_core::config::{ConfigError, ConfigProperties, ViewConfig};
use crmview_core::EXTERNAL_TYPE;

/// Label the external content type is listed under.
pub const EXTERNAL_LABEL: &str = "CiviCRM";

/// The settings of one configured list, as stored by the settings form.
///
/// Numeric settings are kept as entered: the empty string means "unset",
/// which is distinct from an explicit `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub content_type: String,
    pub data_processor_id: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub pagination_enabled: bool,
    pub items_per_page: Option<String>,
    pub link_url: Option<String>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            content_type: "post".to_string(),
            data_processor_id: None,
            sort: None,
            limit: None,
            pagination_enabled: false,
            items_per_page: None,
            link_url: None,
        }
    }
}

impl ViewSettings {
    /// Settings of an external list backed by data processor `id`.
    pub fn external(id: impl Into<String>) -> Self {
        Self {
            content_type: EXTERNAL_TYPE.to_string(),
            data_processor_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Enable pagination with the given page size.
    pub fn paginate(mut self, items_per_page: impl Into<String>) -> Self {
        self.pagination_enabled = true;
        self.items_per_page = Some(items_per_page.into());
        self
    }

    pub fn link_url(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }

    pub fn is_external(&self) -> bool {
        self.content_type == EXTERNAL_TYPE
    }

    /// The configured data processor id, if non-blank.
    pub fn data_processor_id(&self) -> Option<&str> {
        non_blank(self.data_processor_id.as_deref())
    }

    /// The configured detail-page base URL, if non-blank.
    pub fn base_url(&self) -> Option<&str> {
        non_blank(self.link_url.as_deref())
    }
}

impl ConfigProperties for ViewSettings {
    fn prefix() -> &'static str {
        "view"
    }

    fn from_config(config: &ViewConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            content_type: config.get_or("view.content_type", defaults.content_type),
            data_processor_id: config.get_or("view.data_processor_id", None),
            sort: config.get_or("view.sort", None),
            limit: config.get_or("view.limit", None),
            pagination_enabled: config.get_or("view.pagination.enabled", false),
            items_per_page: config.get_or("view.pagination.items_per_page", None),
            link_url: config.get_or("view.link_url", None),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// An entry of the content-type select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub name: String,
    pub label: String,
}

impl ContentType {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Add the external content type to the list of selectable types.
///
/// An existing entry with the same name is relabelled in place.
pub fn register_content_type(mut types: Vec<ContentType>) -> Vec<ContentType> {
    match types.iter_mut().find(|t| t.name == EXTERNAL_TYPE) {
        Some(existing) => existing.label = EXTERNAL_LABEL.to_string(),
        None => types.push(ContentType::new(EXTERNAL_TYPE, EXTERNAL_LABEL)),
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let yaml = r#"
view:
  content_type: civicrm
  data_processor_id: 5
  sort: sort_name ASC
  limit: 0
  pagination:
    enabled: "yes"
    items_per_page: 10
  link_url: "https://crm.example.org/contact"
"#;
        let config = ViewConfig::from_yaml_str(yaml, "test")
            .unwrap()
            .with_typed::<ViewSettings>()
            .unwrap();
        assert!(config.is_external());
        assert_eq!(config.data_processor_id(), Some("5"));
        assert_eq!(config.limit.as_deref(), Some("0"));
        assert!(config.pagination_enabled);
        assert_eq!(config.items_per_page.as_deref(), Some("10"));
        assert_eq!(config.base_url(), Some("https://crm.example.org/contact"));
    }

    #[test]
    fn test_defaults() {
        let settings = ViewSettings::from_config(&ViewConfig::empty()).unwrap();
        assert_eq!(settings, ViewSettings::default());
        assert!(!settings.is_external());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let settings = ViewSettings::external("  ").link_url("");
        assert_eq!(settings.data_processor_id(), None);
        assert_eq!(settings.base_url(), None);
    }

    #[test]
    fn test_register_content_type() {
        let types = register_content_type(vec![ContentType::new("post", "Posts")]);
        assert_eq!(types.len(), 2);
        assert_eq!(types[1], ContentType::new("civicrm", "CiviCRM"));

        let again = register_content_type(types);
        assert_eq!(again.len(), 2);
    }
}
