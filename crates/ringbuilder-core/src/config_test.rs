use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "RINGBUILDER_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.settings_path,
        std::path::PathBuf::from("./config/builder.yaml")
    );
    assert_eq!(
        cfg.catalog_path,
        std::path::PathBuf::from("./config/catalog.json")
    );
    assert_eq!(cfg.storefront_url, None);
    assert_eq!(cfg.storefront_token, None);
    assert_eq!(cfg.page_size, 24);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "ringbuilder/0.1");
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("RINGBUILDER_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RINGBUILDER_BIND_ADDR"),
        "expected InvalidEnvVar(RINGBUILDER_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_page_size() {
    let mut map = HashMap::new();
    map.insert("RINGBUILDER_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RINGBUILDER_PAGE_SIZE"),
        "expected InvalidEnvVar(RINGBUILDER_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_retries() {
    let mut map = HashMap::new();
    map.insert("RINGBUILDER_MAX_RETRIES", "many");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RINGBUILDER_MAX_RETRIES"),
        "expected InvalidEnvVar(RINGBUILDER_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_storefront_settings() {
    let mut map = HashMap::new();
    map.insert("RINGBUILDER_ENV", "production");
    map.insert("RINGBUILDER_STOREFRONT_URL", "https://shop.example.com");
    map.insert("RINGBUILDER_STOREFRONT_TOKEN", "shpat_secret");
    map.insert("RINGBUILDER_PAGE_SIZE", "48");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(
        cfg.storefront_url.as_deref(),
        Some("https://shop.example.com")
    );
    assert_eq!(cfg.storefront_token.as_deref(), Some("shpat_secret"));
    assert_eq!(cfg.page_size, 48);
}

#[test]
fn blank_storefront_url_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("RINGBUILDER_STOREFRONT_URL", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.storefront_url, None);
}

#[test]
fn debug_output_redacts_storefront_token() {
    let mut map = HashMap::new();
    map.insert("RINGBUILDER_STOREFRONT_TOKEN", "shpat_secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("shpat_secret"));
    assert!(debug.contains("[redacted]"));
}
