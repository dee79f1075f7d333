// Exposure - Patient Exposure Event Tracking API
// Copyright (c) 2025 Exposure Contributors
// Licensed under the MIT License

//! # Exposure - Patient Exposure Event Tracking
//!
//! Exposure is a small REST backend that records patients and the
//! timestamped events (places and times) each patient was exposed at.
//!
//! ## Overview
//!
//! This library provides:
//! - **Validation** of patient and event fields and of event time windows
//! - **Record lifecycle** rules: population cap, update whitelists, cascade delete
//! - **Storage** in PostgreSQL (JSONB documents) or in process memory
//! - **HTTP API** serving `{ status, message, data }` envelopes
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - HTTP routes, envelopes and error mapping
//! - [`core`] - Business logic (validation, record lifecycle)
//! - [`adapters`] - Storage backends (PostgreSQL, memory)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exposure::adapters::database::create_record_stores;
//! use exposure::api::{router, serve, AppState};
//! use exposure::config::load_config;
//! use exposure::core::records::{RecordManager, RecordPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("exposure.toml")?;
//!     let stores = create_record_stores(&config).await?;
//!     stores.client.ensure_schema().await?;
//!
//!     let policy = RecordPolicy::from(&config.records);
//!     let manager = RecordManager::new(stores.patients, stores.events, policy);
//!     let app = router(AppState::new(manager), &config.server);
//!
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     serve(listener, app, shutdown_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error type
//! [`domain::ExposureError`] renders the bare message that the API echoes:
//!
//! ```rust
//! use exposure::core::validation::parse_event_time;
//!
//! assert!(parse_event_time("2019-12-31T23:00:00Z").is_err());
//! assert!(parse_event_time("2021-03-04T10:00:00Z").is_ok());
//! ```

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
