// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hookline integration tests.
//!
//! Provides a harness that assembles the real HTTP router over a temp SQLite
//! database, plus a mock store for failure scenarios.
//!
//! # Components
//!
//! - [`TestHarness`] - Router, storage and metrics wired like `hookline serve`
//! - [`MockStore`] - In-memory store with switchable outage

pub mod harness;
pub mod mock_store;

pub use harness::{webhook_body, TestHarness, TestResponse, DEFAULT_TEST_SECRET};
pub use mock_store::MockStore;
