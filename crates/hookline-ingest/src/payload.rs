// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook body parsing and field validation.

use std::sync::LazyLock;

use hookline_core::types::NewMessage;
use regex::Regex;
use serde::Deserialize;

/// Maximum length of `text`, in characters.
pub const MAX_TEXT_CHARS: usize = 4096;

/// E.164-style number: a plus sign followed by digits.
static MSISDN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+\d+$").unwrap());

/// At least one character before a trailing `Z`.
static UTC_TS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.+Z$").unwrap());

/// Inbound webhook body as sent by the provider.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookPayload {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookPayload {
    /// Check every field rule, returning all violations.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.message_id.is_empty() {
            errors.push("message_id: must not be empty".to_string());
        }
        if !MSISDN.is_match(&self.from) {
            errors.push(r"from: must match ^\+\d+$".to_string());
        }
        if !MSISDN.is_match(&self.to) {
            errors.push(r"to: must match ^\+\d+$".to_string());
        }
        if !UTC_TS.is_match(&self.ts) {
            errors.push("ts: must end with Z".to_string());
        }
        if let Some(text) = &self.text {
            let len = text.chars().count();
            if len > MAX_TEXT_CHARS {
                errors.push(format!(
                    "text: at most {MAX_TEXT_CHARS} characters allowed, got {len}"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<WebhookPayload> for NewMessage {
    fn from(p: WebhookPayload) -> Self {
        NewMessage {
            message_id: p.message_id,
            from: p.from,
            to: p.to,
            ts: p.ts,
            text: p.text,
        }
    }
}

/// Parse and validate a raw webhook body.
///
/// JSON syntax errors, missing fields and wrong types are reported as a
/// single entry; rule violations are all reported together.
pub fn parse_payload(raw_body: &[u8]) -> Result<NewMessage, Vec<String>> {
    let payload: WebhookPayload =
        serde_json::from_slice(raw_body).map_err(|e| vec![format!("body: {e}")])?;
    payload.validate()?;
    Ok(payload.into())
}
