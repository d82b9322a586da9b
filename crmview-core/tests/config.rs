use crmview_core::config::{ConfigError, ConfigProperties, ConfigValue, ViewConfig};
use serial_test::serial;

#[test]
fn test_empty_config() {
    let config = ViewConfig::empty();
    assert!(matches!(
        config.get::<String>("view.sort"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_set_and_get() {
    let mut config = ViewConfig::empty();
    config.set("view.sort", ConfigValue::String("sort_name ASC".into()));
    assert_eq!(config.get::<String>("view.sort").unwrap(), "sort_name ASC");
}

#[test]
fn test_get_or_default() {
    let config = ViewConfig::empty();
    assert_eq!(config.get_or("view.limit", 10u64), 10);
    assert_eq!(config.get_or::<Option<String>>("view.link_url", None), None);
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
view:
  content_type: civicrm
  data_processor_id: 5
  limit: 0
  pagination:
    enabled: "yes"
    items_per_page: 20
"#;
    let config = ViewConfig::from_yaml_str(yaml, "test").unwrap();
    assert_eq!(config.get::<String>("view.content_type").unwrap(), "civicrm");
    assert_eq!(config.get::<String>("view.data_processor_id").unwrap(), "5");
    assert_eq!(config.get::<u64>("view.limit").unwrap(), 0);
    assert!(config.get::<bool>("view.pagination.enabled").unwrap());
    assert_eq!(config.get::<u64>("view.pagination.items_per_page").unwrap(), 20);
}

#[test]
fn test_type_mismatch() {
    let config = ViewConfig::from_yaml_str("view:\n  limit: lots\n", "test").unwrap();
    assert!(matches!(
        config.get::<u64>("view.limit"),
        Err(ConfigError::TypeMismatch { expected: "u64", .. })
    ));
}

#[test]
fn test_null_as_option() {
    let config = ViewConfig::from_yaml_str("view:\n  link_url: ~\n", "test").unwrap();
    assert!(config.contains_key("view.link_url"));
    assert_eq!(config.get::<Option<String>>("view.link_url").unwrap(), None);
}

#[test]
fn test_list_values() {
    let yaml = r#"
view:
  fields:
    - first_name
    - last_name
"#;
    let config = ViewConfig::from_yaml_str(yaml, "test").unwrap();
    let fields: Vec<String> = config.get("view.fields").unwrap();
    assert_eq!(fields, vec!["first_name", "last_name"]);
    assert_eq!(config.get::<String>("view.fields.1").unwrap(), "last_name");
}

#[test]
fn test_invalid_yaml() {
    let err = ViewConfig::from_yaml_str("view: [unclosed", "test").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

struct LinkSettings {
    base_url: Option<String>,
}

impl ConfigProperties for LinkSettings {
    fn prefix() -> &'static str {
        "view"
    }

    fn from_config(config: &ViewConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.get_or("view.link_url", None),
        })
    }
}

#[test]
fn test_typed_section() {
    let config = ViewConfig::from_yaml_str("view:\n  link_url: https://crm.example.org/contact\n", "test")
        .unwrap()
        .with_typed::<LinkSettings>()
        .unwrap();
    assert_eq!(config.base_url.as_deref(), Some("https://crm.example.org/contact"));
    assert_eq!(config.profile(), "test");
}

#[test]
#[serial]
fn test_load_from_files_and_env() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("crmview.yaml"),
        "view:\n  sort: sort_name ASC\n  limit: 10\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("crmview-prod.yaml"), "view:\n  limit: 50\n").unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    unsafe { std::env::set_var("CRMVIEW_VIEW__DATA_PROCESSOR_ID", "9") };

    let loaded = ViewConfig::load("prod");

    unsafe { std::env::remove_var("CRMVIEW_VIEW__DATA_PROCESSOR_ID") };
    std::env::set_current_dir(previous).unwrap();

    let config = loaded.unwrap();
    assert_eq!(config.get::<String>("view.sort").unwrap(), "sort_name ASC");
    assert_eq!(config.get::<u64>("view.limit").unwrap(), 50);
    assert_eq!(config.get::<String>("view.data_processor_id").unwrap(), "9");
}
