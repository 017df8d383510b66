//! Where records are persisted.
//!
//! Every content type talks to one [`RemotePersistence`] implementation,
//! picked once at startup from `use_mock_data`: the in-memory
//! [`FixtureSource`] for local development, or [`HttpRemote`] against
//! recital-server.

mod fixture;
mod http;
pub mod protocol;

pub use fixture::{Fixture, FixtureSource};
pub use http::HttpRemote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RecitalConfig;
use crate::error::PersistenceError;
use crate::record::Record;

#[async_trait]
pub trait RemotePersistence<R: Record>: Send + Sync {
    /// Fetch every record of this content type.
    async fn list_all(&self) -> Result<Vec<R>, PersistenceError>;

    /// Persist a new record. The returned record carries the durable id.
    async fn create(&self, record: &R) -> Result<R, PersistenceError>;

    async fn update(&self, id: &str, record: &R) -> Result<R, PersistenceError>;

    async fn delete(&self, id: &str) -> Result<(), PersistenceError>;
}

/// Select the data source for a content type according to `config`.
pub fn data_source<R: Fixture>(config: &RecitalConfig) -> Arc<dyn RemotePersistence<R>> {
    if config.use_mock_data {
        tracing::info!("Using mock data for {}", R::KIND);
        Arc::new(FixtureSource::<R>::seeded(config.mock_latency()))
    } else {
        tracing::info!("Using {} for {}", config.api_url, R::KIND);
        Arc::new(HttpRemote::<R>::new(&config.api_url, config.request_timeout()))
    }
}
