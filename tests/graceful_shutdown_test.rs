//! Integration tests for graceful shutdown of the HTTP server

use exposure::adapters::database::RecordStores;
use exposure::api::{router, serve, AppState};
use exposure::config::ServerConfig;
use exposure::core::records::{RecordManager, RecordPolicy};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

async fn spawn_server(
    rx: watch::Receiver<bool>,
) -> (String, tokio::task::JoinHandle<exposure::domain::Result<()>>) {
    let stores = RecordStores::memory();
    let manager = RecordManager::new(stores.patients, stores.events, RecordPolicy::default());
    let app = router(AppState::new(manager), &ServerConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (format!("http://{addr}"), tokio::spawn(serve(listener, app, rx)))
}

#[tokio::test]
async fn test_shutdown_signal_stops_server() {
    let (tx, rx) = watch::channel(false);
    let (base, handle) = spawn_server(rx).await;

    let response = reqwest::get(format!("{base}/patient")).await.unwrap();
    assert!(response.status().is_success());

    tx.send(true).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_dropped_sender_stops_server() {
    let (tx, rx) = watch::channel(false);
    let (_, handle) = spawn_server(rx).await;

    drop(tx);

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after the sender was dropped")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_server_keeps_running_without_signal() {
    let (_tx, rx) = watch::channel(false);
    let (_, handle) = spawn_server(rx).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());
    handle.abort();
}
