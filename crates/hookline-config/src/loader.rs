// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hookline.toml` > `~/.config/hookline/hookline.toml` > `/etc/hookline/hookline.toml`
//! with environment variable overrides via `HOOKLINE_` prefix and the bare
//! `DATABASE_URL` / `WEBHOOK_SECRET` variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HooklineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hookline/hookline.toml` (system-wide)
/// 3. `~/.config/hookline/hookline.toml` (user XDG config)
/// 4. `./hookline.toml` (local directory)
/// 5. `DATABASE_URL` and `WEBHOOK_SECRET`
/// 6. `HOOKLINE_*` environment variables
pub fn load_config() -> Result<HooklineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HooklineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HooklineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HooklineConfig, figment::Error> {
    let figment = Figment::new()
        .merge(Serialized::defaults(HooklineConfig::default()))
        .merge(Toml::file(path));
    merge_env(figment).extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    let figment = Figment::new()
        .merge(Serialized::defaults(HooklineConfig::default()))
        .merge(Toml::file("/etc/hookline/hookline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hookline/hookline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hookline.toml"));
    merge_env(figment)
}

/// Layer the environment on top of `figment`: bare variables first, then
/// `HOOKLINE_*`.
///
/// The webhook secret is taken verbatim. `Env` would parse `123456` as an
/// integer and `[a,b]` as an array, and the secret is an opaque string.
fn merge_env(figment: Figment) -> Figment {
    let mut figment = figment.merge(bare_env_provider());
    if let Some(secret) = raw_env("WEBHOOK_SECRET") {
        figment = figment.merge(Serialized::default(SECRET_KEY, secret));
    }
    figment = figment.merge(env_provider());
    if let Some(secret) = raw_env("HOOKLINE_WEBHOOK_SECRET") {
        figment = figment.merge(Serialized::default(SECRET_KEY, secret));
    }
    figment
}

const SECRET_KEY: &str = "webhook.secret";

fn raw_env(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Prefixed provider: `HOOKLINE_<SECTION>_<KEY>` -> `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `HOOKLINE_STORAGE_DATABASE_URL` must map to
/// `storage.database_url`, not `storage.database.url`.
fn env_provider() -> Env {
    Env::prefixed("HOOKLINE_").ignore(&["WEBHOOK_SECRET"]).map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("webhook_", "webhook.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

/// Unprefixed `DATABASE_URL` understood by existing deployments.
fn bare_env_provider() -> Env {
    Env::raw()
        .only(&["DATABASE_URL"])
        .map(|_| "storage.database_url".into())
}
