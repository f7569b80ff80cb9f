// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hookline check-config`: print the effective configuration.

use std::fmt::Write;

use hookline_config::model::LogFormat;
use hookline_config::HooklineConfig;

/// Render a summary of the loaded configuration. The secret is never shown.
pub fn summary(config: &HooklineConfig) -> String {
    let format = match config.logging.format {
        LogFormat::Json => "json",
        LogFormat::Pretty => "pretty",
    };
    let secret = if config.webhook.secret.is_some() {
        "[redacted]"
    } else {
        "<unset>"
    };

    let mut out = String::from("hookline: configuration is valid\n");
    let _ = writeln!(out, "  server.host              = {}", config.server.host);
    let _ = writeln!(out, "  server.port              = {}", config.server.port);
    let _ = writeln!(
        out,
        "  server.body_limit_bytes  = {}",
        config.server.body_limit_bytes
    );
    let _ = writeln!(
        out,
        "  storage.database_path    = {}",
        config.storage.database_path().unwrap_or_default()
    );
    let _ = writeln!(out, "  storage.wal_mode         = {}", config.storage.wal_mode);
    let _ = writeln!(out, "  webhook.secret           = {secret}");
    let _ = writeln!(
        out,
        "  webhook.signature_header = {}",
        config.webhook.signature_header
    );
    let _ = writeln!(out, "  logging.level            = {}", config.logging.level);
    let _ = writeln!(out, "  logging.format           = {format}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_redacts_secret() {
        let config = hookline_config::load_and_validate_str(
            r#"
[storage]
database_url = "sqlite:////data/app.db"

[webhook]
secret = "supersecret"
"#,
        )
        .unwrap();
        let text = summary(&config);
        assert!(!text.contains("supersecret"));
        assert!(text.contains("webhook.secret           = [redacted]"));
        assert!(text.contains("storage.database_path    = /data/app.db"));
        assert!(text.contains("server.port              = 8000"));
    }
}
