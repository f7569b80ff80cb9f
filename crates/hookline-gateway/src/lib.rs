// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Hookline ingestion service.
//!
//! Exposes the signed webhook endpoint, the read endpoints for listing and
//! statistics, liveness/readiness probes and the Prometheus scrape endpoint.

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
