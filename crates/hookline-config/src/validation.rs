// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints that cannot be expressed via serde attributes:
//! required settings that have no default, non-empty strings, and ports.

use crate::diagnostic::ConfigError;
use crate::model::HooklineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HooklineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // The database location and the shared secret are required at startup.
    match config.storage.database_url.as_deref() {
        None => errors.push(ConfigError::MissingKey {
            key: "storage.database_url".to_string(),
        }),
        Some(_) if config.storage.database_path().is_none() => {
            errors.push(ConfigError::Validation {
                message: "storage.database_url must not be empty".to_string(),
            });
        }
        Some(_) => {}
    }

    match &config.webhook.secret {
        None => errors.push(ConfigError::MissingKey {
            key: "webhook.secret".to_string(),
        }),
        Some(secret) if secret.is_blank() => {
            errors.push(ConfigError::Validation {
                message: "webhook.secret must not be empty".to_string(),
            });
        }
        Some(_) => {}
    }

    if config.webhook.signature_header.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "webhook.signature_header must not be empty".to_string(),
        });
    } else if header_name_invalid(&config.webhook.signature_header) {
        errors.push(ConfigError::Validation {
            message: format!(
                "webhook.signature_header `{}` is not a valid HTTP header name",
                config.webhook.signature_header
            ),
        });
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be between 1 and 65535".to_string(),
        });
    }

    if config.server.body_limit_bytes == 0 {
        errors.push(ConfigError::Validation {
            message: "server.body_limit_bytes must be greater than 0".to_string(),
        });
    }

    if !matches!(
        config.logging.level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of trace, debug, info, warn, error",
                config.logging.level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// HTTP header names are RFC 7230 tokens.
fn header_name_invalid(name: &str) -> bool {
    !name.bytes().all(|b| {
        b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
    })
}
