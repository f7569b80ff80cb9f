// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Hookline configuration system.

use hookline_config::diagnostic::ConfigError;
use hookline_config::model::LogFormat;
use hookline_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_hookline_config() {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
body_limit_bytes = 4096

[storage]
database_url = "sqlite:////var/lib/hookline/app.db"
wal_mode = false

[webhook]
secret = "testsecret"
signature_header = "x-hub-signature"

[logging]
level = "debug"
format = "pretty"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.body_limit_bytes, 4096);
    assert_eq!(
        config.storage.database_path().as_deref(),
        Some("/var/lib/hookline/app.db")
    );
    assert!(!config.storage.wal_mode);
    assert_eq!(
        config.webhook.secret.as_ref().map(|s| s.as_bytes()),
        Some(b"testsecret".as_slice())
    );
    assert_eq!(config.webhook.signature_header, "x-hub-signature");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

/// Unknown field in [storage] produces an error mentioning the key.
#[test]
fn unknown_field_in_storage_produces_error() {
    let toml = r#"
[storage]
databse_url = "x.db"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("databse_url"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Typos come back as UnknownKey diagnostics with a suggestion.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[webhook]
secrt = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should fail");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("secret"));
}

/// Wrong value type is reported.
#[test]
fn wrong_type_for_port_is_rejected() {
    let toml = r#"
[server]
port = "eighty"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Missing required settings are startup errors, not defaults.
#[test]
fn missing_secret_and_database_fail_validation() {
    let errors = load_and_validate_str("").expect_err("empty config must not validate");
    let missing: Vec<&str> = errors
        .iter()
        .filter_map(|e| match e {
            ConfigError::MissingKey { key } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert!(missing.contains(&"storage.database_url"));
    assert!(missing.contains(&"webhook.secret"));
}

/// Only the required keys are needed; everything else defaults.
#[test]
fn minimal_config_validates_with_defaults() {
    let toml = r#"
[storage]
database_url = "sqlite:///app.db"

[webhook]
secret = "s3cr3t"
"#;

    let config = load_and_validate_str(toml).expect("minimal config is valid");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.storage.database_path().as_deref(), Some("app.db"));
    assert_eq!(config.logging.format, LogFormat::Json);
}

/// An unknown log format is a deserialization error.
#[test]
fn unknown_log_format_is_rejected() {
    let toml = r#"
[logging]
format = "xml"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// A typo in the inline source is located under its table.
#[test]
fn unknown_key_points_at_the_typo() {
    let toml = "[storage]\ndatabse_url = \"x.db\"\n";

    let errors = load_and_validate_str(toml).expect_err("typo should fail");
    let (section, offset) = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey { section, span, .. } => {
                Some((section.clone(), span.as_ref().map(|s| s.offset())))
            }
            _ => None,
        })
        .expect("an unknown-key diagnostic");
    assert_eq!(section, "[storage]");
    assert_eq!(offset, Some(10));
}

/// Type errors name the key and the variable that can override it.
#[test]
fn invalid_type_names_the_env_override() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("port must be numeric");
    let (key, hint) = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::InvalidType { key, hint, .. } => Some((key.clone(), hint.clone())),
            _ => None,
        })
        .expect("an invalid-type diagnostic");
    assert_eq!(key, "server.port");
    assert!(hint.contains("HOOKLINE_SERVER_PORT"), "hint: {hint}");
}
