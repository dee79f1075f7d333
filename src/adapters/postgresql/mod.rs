//! PostgreSQL database integration
//!
//! This module provides integration with PostgreSQL for storing
//! patients and events as JSONB documents.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::{PostgreSQLEvent, PostgreSQLPatient};
