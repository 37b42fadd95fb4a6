//! Tests for TOML configuration parsing.

use super::toml::TomlConfig;
use super::toml::default_config_template;

#[test]
fn parses_full_configuration() {
    let config = TomlConfig::parse(
        r#"
        [gateway]
        url = "https://notify.example.com"
        project_id = "project-1"
        project_secret = "secret-token"
        notification_type = "entry_created"

        [limits]
        max_accounts_per_request = 250
        requests_per_second = 1.0
        wait_error_margin = 0.5
        request_timeout = 10

        [notification]
        body_template = "{{title}} in {{group}}"
        "#,
    )
    .unwrap();

    assert_eq!(config.gateway.url.as_deref(), Some("https://notify.example.com"));
    assert_eq!(config.gateway.project_id.as_deref(), Some("project-1"));
    assert_eq!(config.gateway.project_secret.as_deref(), Some("secret-token"));
    assert_eq!(config.gateway.notification_type.as_deref(), Some("entry_created"));
    assert_eq!(config.limits.max_accounts_per_request, Some(250));
    assert_eq!(config.limits.requests_per_second, Some(1.0));
    assert_eq!(config.limits.wait_error_margin, Some(0.5));
    assert_eq!(config.limits.request_timeout, Some(10));
    assert_eq!(
        config.notification.body_template.as_deref(),
        Some("{{title}} in {{group}}")
    );
}

#[test]
fn empty_configuration_is_valid() {
    let config = TomlConfig::parse("").unwrap();

    assert!(config.gateway.url.is_none());
    assert!(config.limits.max_accounts_per_request.is_none());
    assert!(config.notification.body_template.is_none());
}

#[test]
fn partial_sections_are_valid() {
    let config = TomlConfig::parse(
        r#"
        [gateway]
        url = "https://notify.example.com"
        "#,
    )
    .unwrap();

    assert!(config.gateway.url.is_some());
    assert!(config.gateway.project_id.is_none());
}

#[test]
fn unknown_fields_are_rejected() {
    let result = TomlConfig::parse(
        r#"
        [gateway]
        endpoint = "https://notify.example.com"
        "#,
    );

    assert!(result.is_err());
}

#[test]
fn unknown_sections_are_rejected() {
    let result = TomlConfig::parse(
        r#"
        [webhook]
        url = "https://notify.example.com"
        "#,
    );

    assert!(result.is_err());
}

#[test]
fn invalid_toml_is_an_error() {
    assert!(TomlConfig::parse("[gateway").is_err());
}

#[test]
fn default_template_parses_back() {
    let template = default_config_template();
    let config = TomlConfig::parse(&template).unwrap();

    // The template's uncommented values match the built-in defaults.
    assert_eq!(config.limits.max_accounts_per_request, Some(500));
    assert_eq!(config.limits.requests_per_second, Some(2.0));
    assert_eq!(config.limits.wait_error_margin, Some(0.25));
    assert_eq!(config.limits.request_timeout, Some(30));
}

#[test]
fn load_reads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relay.toml");
    std::fs::write(
        &path,
        r#"
        [gateway]
        project_id = "from-file"
        "#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.gateway.project_id.as_deref(), Some("from-file"));
}

#[test]
fn load_missing_file_is_an_error() {
    let result = TomlConfig::load(std::path::Path::new("/nonexistent/relay.toml"));

    assert!(matches!(result, Err(super::ConfigError::FileRead { .. })));
}
