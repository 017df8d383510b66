//! Common test utilities.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use recital_server::{AppState, build_app};
use tempfile::TempDir;

/// Create a data directory that lives until the process exits.
pub fn test_data_dir() -> PathBuf {
    // Leak the TempDir so it doesn't get cleaned up during the test.
    let tmp = Box::leak(Box::new(TempDir::new().unwrap()));
    tmp.path().to_path_buf()
}

/// Create a test app over an empty data directory.
#[allow(dead_code)]
pub fn test_app() -> (Router, PathBuf) {
    let data_dir = test_data_dir();
    let state = AppState::new(&data_dir).unwrap();
    (build_app(state), data_dir)
}

/// Serve a fresh app on an ephemeral port. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_server() -> String {
    let (app, _) = test_app();

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
