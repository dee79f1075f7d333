//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for record storage,
//! allowing Exposure to work with different backends (PostgreSQL, in-memory).

pub mod factory;
pub mod traits;

pub use factory::{create_record_stores, RecordStores};
pub use traits::{DatabaseClient, EventStore, PatientStore};
