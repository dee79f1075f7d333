//! Storage factory
//!
//! This module builds the storage handles selected by configuration.

use crate::adapters::database::traits::{DatabaseClient, EventStore, PatientStore};
use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{DatabaseTarget, ExposureConfig};
use crate::domain::{ExposureError, Result};
use std::sync::Arc;

/// Storage handles sharing one backend
#[derive(Clone)]
pub struct RecordStores {
    pub client: Arc<dyn DatabaseClient + Send + Sync>,
    pub patients: Arc<dyn PatientStore + Send + Sync>,
    pub events: Arc<dyn EventStore + Send + Sync>,
}

impl RecordStores {
    /// Wraps one backend implementing every storage trait
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: DatabaseClient + PatientStore + EventStore + Send + Sync + 'static,
    {
        Self {
            client: backend.clone() as Arc<dyn DatabaseClient + Send + Sync>,
            patients: backend.clone() as Arc<dyn PatientStore + Send + Sync>,
            events: backend as Arc<dyn EventStore + Send + Sync>,
        }
    }

    /// In-process stores starting empty
    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }
}

/// Create the storage handles named by `database_target`
///
/// # Errors
///
/// Returns an error if the selected backend cannot be created.
pub async fn create_record_stores(config: &ExposureConfig) -> Result<RecordStores> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                ExposureError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL record stores");
            let client = Arc::new(PostgreSQLClient::new(pg_config.clone()).await?);
            tracing::debug!(
                connection = %client.connection_string_safe(),
                "PostgreSQL pool created"
            );

            Ok(RecordStores::from_backend(Arc::new(
                PostgreSQLAdapter::new_with_arc(client),
            )))
        }
        DatabaseTarget::Memory => {
            tracing::info!("Creating in-memory record stores");
            Ok(RecordStores::memory())
        }
    }
}
