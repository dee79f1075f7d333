//! Storage integrations for Exposure.
//!
//! - [`database`] - Storage abstraction layer (traits + factory)
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-process implementation
//!
//! # Design Pattern
//!
//! Adapters isolate the storage backend behind the [`database::PatientStore`]
//! and [`database::EventStore`] traits so the record manager never sees a
//! concrete client.
//!
//! ```rust
//! use exposure::adapters::database::{PatientStore, RecordStores};
//! use exposure::domain::{Gender, PatientDraft};
//!
//! # async fn example() -> exposure::domain::Result<()> {
//! let stores = RecordStores::memory();
//! let patient = stores
//!     .patients
//!     .insert_patient(PatientDraft::new(Gender::Male, 40, "plumber"))
//!     .await?;
//! assert_eq!(stores.patients.count_patients().await?, 1);
//! # let _ = patient;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod memory;
pub mod postgresql;
