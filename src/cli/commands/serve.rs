//! Serve command implementation
//!
//! This module implements the `serve` command, which runs the HTTP API until
//! a shutdown signal arrives.

use crate::adapters::database::create_record_stores;
use crate::api::{self, AppState};
use crate::config::load_config;
use crate::core::records::{RecordManager, RecordPolicy};
use anyhow::Context;
use clap::Args;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinError;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting serve command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Some(host) = &self.host {
            tracing::info!(host = %host, "Overriding server host from CLI");
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            tracing::info!(port, "Overriding server port from CLI");
            config.server.port = port;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let stores = match create_record_stores(&config).await {
            Ok(stores) => stores,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create record stores");
                eprintln!("Failed to connect to storage: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if let Err(e) = stores.client.test_connection().await {
            tracing::error!(error = %e, "Storage connection test failed");
            eprintln!("Failed to connect to storage: {e}");
            return Ok(4);
        }

        if let Err(e) = stores.client.ensure_schema().await {
            tracing::error!(error = %e, "Failed to prepare storage schema");
            eprintln!("Failed to prepare storage schema: {e}");
            return Ok(4);
        }

        let policy = RecordPolicy::from(&config.records);
        tracing::info!(
            database = stores.client.database_name(),
            max_patients = policy.max_patients,
            overlap_mode = %policy.overlap_mode,
            recheck_overlap_on_update = policy.recheck_overlap_on_update,
            "Record manager ready"
        );

        let manager = RecordManager::new(stores.patients, stores.events, policy);
        let app = api::router(AppState::new(manager), &config.server);

        let address = config.server.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;

        println!("🚀 Exposure listening on http://{address}");

        let mut server = tokio::spawn(api::serve(listener, app, shutdown_signal.clone()));
        let mut signal = shutdown_signal;

        tokio::select! {
            joined = &mut server => return finish(joined),
            _ = signal.wait_for(|stop| *stop) => {}
        }

        let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
        match tokio::time::timeout(grace, server).await {
            Ok(joined) => finish(joined),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = config.server.shutdown_timeout_secs,
                    "Shutdown grace period elapsed with requests still in flight"
                );
                println!("⚠️  Shutdown grace period elapsed, exiting");
                Ok(0)
            }
        }
    }
}

fn finish(joined: Result<crate::domain::Result<()>, JoinError>) -> anyhow::Result<i32> {
    match joined {
        Ok(Ok(())) => {
            println!("✅ Server stopped");
            Ok(0)
        }
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(anyhow::anyhow!("Server task failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_exits_with_configuration_code() {
        let args = ServeArgs {
            host: None,
            port: None,
        };
        let (_tx, rx) = watch::channel(false);
        let code = args.execute("does-not-exist.toml", rx).await.unwrap();
        assert_eq!(code, 2);
    }
}
