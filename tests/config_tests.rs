//! Integration tests for configuration loading
//!
//! These tests verify:
//! - Loading configuration from TOML, YAML, and JSON files
//! - Default values for every section
//! - Environment variable overrides on top of a file
//! - Error reporting for unreadable or malformed files

use platform_cli::config::{Config, DEFAULT_BIND};
use serial_test::serial;
use tempfile::tempdir;

const ENV_KEYS: [&str; 8] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_REGION",
    "AWS_DEFAULT_REGION",
    "TAG_CREATED_BY",
    "TAG_OWNER",
    "DNS_DOMAIN",
    "PLATFORM_BIND",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

// ============================================================================
// File Format Tests
// ============================================================================

#[test]
#[serial]
fn test_load_toml_file() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("platform.toml");
    std::fs::write(
        &config_path,
        r#"
[aws]
region = "eu-central-1"

[tags]
created_by = "course-cli"
owner = "alice"

[dns]
domain = "project.com"

[web]
bind = "0.0.0.0:9000"
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.aws.region, "eu-central-1");
    assert_eq!(config.tags.created_by, "course-cli");
    assert_eq!(config.tags.owner, "alice");
    assert_eq!(config.dns.domain.as_deref(), Some("project.com"));
    assert_eq!(config.web.bind, "0.0.0.0:9000");
}

#[test]
#[serial]
fn test_load_yaml_file_keeps_missing_defaults() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("platform.yml");
    std::fs::write(&config_path, "tags:\n  owner: bob\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.tags.owner, "bob");
    assert_eq!(config.tags.created_by, "platform-cli");
    assert_eq!(config.aws.region, "us-east-1");
    assert_eq!(config.web.bind, DEFAULT_BIND);
}

#[test]
#[serial]
fn test_load_json_file() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("platform.json");
    std::fs::write(
        &config_path,
        r#"{"aws": {"region": "ap-southeast-2", "access_key_id": "AKIAFILE", "secret_access_key": "s3cr3t"}}"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.aws.region, "ap-southeast-2");
    assert_eq!(
        config.aws.static_credentials(),
        Some(("AKIAFILE", "s3cr3t"))
    );
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "[tags\nowner = ").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.toml"));
}

#[test]
#[serial]
fn test_missing_explicit_file_falls_back_to_defaults() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("absent.toml");

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.tags.owner, "student");
}

// ============================================================================
// Environment Variable Override Tests
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("platform.toml");
    std::fs::write(&config_path, "[tags]\nowner = \"alice\"\n").unwrap();

    std::env::set_var("TAG_OWNER", "carol");
    std::env::set_var("AWS_REGION", "us-west-2");
    let config = Config::load(Some(&config_path)).unwrap();
    clear_env();

    assert_eq!(config.tags.owner, "carol");
    assert_eq!(config.aws.region, "us-west-2");
}

#[test]
#[serial]
fn test_env_credentials_and_domain() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("absent.toml");

    std::env::set_var("AWS_ACCESS_KEY_ID", "AKIAENV");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "envsecret");
    std::env::set_var("DNS_DOMAIN", "example.org");
    std::env::set_var("PLATFORM_BIND", "127.0.0.1:9999");
    let config = Config::load(Some(&config_path)).unwrap();
    clear_env();

    assert_eq!(config.aws.static_credentials(), Some(("AKIAENV", "envsecret")));
    assert_eq!(config.dns.domain.as_deref(), Some("example.org"));
    assert_eq!(config.web.bind, "127.0.0.1:9999");
}

#[test]
#[serial]
fn test_half_credentials_use_default_chain() {
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("absent.toml");

    std::env::set_var("AWS_ACCESS_KEY_ID", "AKIAENV");
    let config = Config::load(Some(&config_path)).unwrap();
    clear_env();

    assert!(config.aws.static_credentials().is_none());
}
