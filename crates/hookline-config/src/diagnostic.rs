// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup diagnostics for configuration errors.
//!
//! Figment errors are turned into miette reports that point at the offending
//! key in `hookline.toml` and name the environment variables that can set it.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Top-level tables accepted in `hookline.toml`.
const SECTIONS: &[&str] = &["server", "storage", "webhook", "logging"];

/// A configuration problem found at startup.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no hookline table accepts.
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(code(hookline::config::unknown_key), help("{hint}"))]
    UnknownKey {
        key: String,
        /// `[server]`, `[storage]`, ... or `the top level`.
        section: String,
        /// Closest accepted key, if one is close enough.
        suggestion: Option<String>,
        hint: String,
        #[label("not a hookline setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the setting's type.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(hookline::config::invalid_type), help("{hint}"))]
    InvalidType {
        key: String,
        detail: String,
        hint: String,
    },

    /// A setting with no default that was not provided anywhere.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(hookline::config::missing_key),
        help("{}", missing_key_help(key))
    )]
    MissingKey { key: String },

    /// A value that deserialized but is not usable.
    #[error("validation error: {message}")]
    #[diagnostic(code(hookline::config::validation))]
    Validation { message: String },

    /// Anything else figment reports, such as TOML syntax errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(hookline::config::other))]
    Other(String),
}

/// Environment variables that can set `key`, most specific last.
pub fn env_vars_for(key: &str) -> Vec<String> {
    let mut vars = Vec::new();
    match key {
        "storage.database_url" => vars.push("DATABASE_URL".to_string()),
        "webhook.secret" => vars.push("WEBHOOK_SECRET".to_string()),
        _ => {}
    }
    vars.push(format!(
        "HOOKLINE_{}",
        key.replace('.', "_").to_ascii_uppercase()
    ));
    vars
}

fn missing_key_help(key: &str) -> String {
    let vars = env_vars_for(key).join(" or ");
    match key.split_once('.') {
        Some((section, field)) => {
            format!("set `{field}` under [{section}] in hookline.toml, or export {vars}")
        }
        None => format!("set `{key}` in hookline.toml, or export {vars}"),
    }
}

fn unknown_key_help(section: Option<&str>, suggestion: Option<&str>, valid: &[&str]) -> String {
    match (section, suggestion) {
        (Some(section), Some(s)) => format!("did you mean `{section}.{s}`?"),
        (None, Some(s)) => format!("did you mean the [{s}] table?"),
        (Some(section), None) => {
            format!("[{section}] accepts: {}", valid.join(", "))
        }
        (None, None) => format!("hookline.toml has the tables: {}", SECTIONS.join(", ")),
    }
}

/// Convert a `figment::Error` into hookline diagnostics.
///
/// `toml_sources` holds `(name, content)` pairs of the files that were read;
/// when the error names one of them (or only one was read) the unknown key is
/// highlighted in it.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(|p| p.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let section = path.first().map(String::as_str);
                    let suggestion = suggest_key(field, expected);
                    let hint = unknown_key_help(section, suggestion.as_deref(), expected);
                    let (span, src) = match source_for(&error, toml_sources) {
                        Some((name, content)) => match locate_key(content, section, field) {
                            Some(offset) => (
                                Some(SourceSpan::new(offset.into(), field.len())),
                                Some(NamedSource::new(name, content.to_string())),
                            ),
                            None => (None, None),
                        },
                        None => (None, None),
                    };
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: section
                            .map(|s| format!("[{s}]"))
                            .unwrap_or_else(|| "the top level".to_string()),
                        suggestion,
                        hint,
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => {
                    let mut key = path.clone();
                    key.push(field.to_string());
                    ConfigError::MissingKey { key: key.join(".") }
                }
                Kind::InvalidType(actual, expected) => {
                    let key = path.join(".");
                    let hint = format!(
                        "expected {expected}; check hookline.toml and {}",
                        env_vars_for(&key).join(", ")
                    );
                    ConfigError::InvalidType {
                        key,
                        detail: format!("found {actual}"),
                        hint,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn source_for<'a>(
    error: &figment::Error,
    toml_sources: &'a [(String, String)],
) -> Option<(&'a str, &'a str)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let found = match file {
        Some(file) => toml_sources.iter().find(|(name, _)| *name == file),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };
    found.map(|(name, content)| (name.as_str(), content.as_str()))
}

/// Byte offset of `field = ...` inside `[section]` (or before any table when
/// `section` is `None`). Commented-out lines are skipped.
pub fn locate_key(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
            continue;
        }
        if current != section {
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        let Some(rest) = trimmed.strip_prefix(field) else {
            continue;
        };
        if rest.trim_start().starts_with('=') {
            return Some(start + indent);
        }
    }

    None
}

/// Closest entry of `valid` to `unknown`, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render every error as a plain-text miette report.
pub fn render_to_string(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    out
}

/// Print all errors to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_to_string(errors));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_closest_key() {
        let valid = &["database_url", "wal_mode"];
        assert_eq!(
            suggest_key("databse_url", valid),
            Some("database_url".to_string())
        );
        assert_eq!(suggest_key("zzzzzz", &["host", "port"]), None);
    }

    #[test]
    fn env_vars_include_bare_aliases() {
        assert_eq!(
            env_vars_for("storage.database_url"),
            vec!["DATABASE_URL", "HOOKLINE_STORAGE_DATABASE_URL"]
        );
        assert_eq!(
            env_vars_for("webhook.secret"),
            vec!["WEBHOOK_SECRET", "HOOKLINE_WEBHOOK_SECRET"]
        );
        assert_eq!(env_vars_for("server.port"), vec!["HOOKLINE_SERVER_PORT"]);
    }

    #[test]
    fn locate_key_respects_sections_and_comments() {
        let content = "# [storage]\n[server]\nwal_mode = 1\n\n[storage]\n# wal_mode = 2\n  wal_mode = 3\n";
        let offset = locate_key(content, Some("storage"), "wal_mode").unwrap();
        assert_eq!(&content[offset..], "wal_mode = 3\n");
        assert!(locate_key(content, Some("logging"), "wal_mode").is_none());
    }

    #[test]
    fn locate_key_handles_crlf() {
        let content = "[webhook]\r\nsecrt = \"x\"\r\n";
        let offset = locate_key(content, Some("webhook"), "secrt").unwrap();
        assert_eq!(offset, 11);
    }

    #[test]
    fn missing_key_help_names_env_vars() {
        let err = ConfigError::MissingKey {
            key: "storage.database_url".to_string(),
        };
        let help = Diagnostic::help(&err).map(|h| h.to_string()).unwrap();
        assert!(help.contains("[storage]"));
        assert!(help.contains("DATABASE_URL"));
        assert!(help.contains("HOOKLINE_STORAGE_DATABASE_URL"));
    }

    #[test]
    fn rendered_report_is_plain_text() {
        let errors = vec![
            ConfigError::MissingKey {
                key: "webhook.secret".to_string(),
            },
            ConfigError::Validation {
                message: "server.port must be between 1 and 65535".to_string(),
            },
        ];
        let out = render_to_string(&errors);
        assert!(out.contains("missing required key `webhook.secret`"));
        assert!(out.contains("WEBHOOK_SECRET"));
        assert!(out.contains("server.port"));
        assert!(!out.contains('\u{1b}'));
    }
}
