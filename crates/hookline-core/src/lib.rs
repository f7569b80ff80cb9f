// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hookline ingestion service.
//!
//! This crate provides the trait definitions, error types, and domain types
//! shared by the storage, metrics, ingestion, and gateway crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HooklineError;
pub use types::{
    AdapterType, HealthStatus, InsertOutcome, Message, MessagePage, MessageStats, MetricEvent,
    NewMessage, SenderCount, WebhookOutcome,
};

pub use traits::{ObservabilityAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hookline_error_variants_construct() {
        let _config = HooklineError::Config("test".into());
        let storage = HooklineError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        assert!(storage.is_storage());
        let server = HooklineError::Server {
            message: "bind".into(),
            source: None,
        };
        assert!(!server.is_storage());
        let _health = HooklineError::HealthCheckFailed {
            name: "sqlite".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let internal = HooklineError::Internal("boom".into());
        assert_eq!(internal.to_string(), "internal error: boom");
    }

    #[test]
    fn adapter_type_round_trips_through_display() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Storage,
            AdapterType::Observability,
            AdapterType::Gateway,
        ] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_observability_adapter<T: ObservabilityAdapter>() {}
    }
}
