//! Data source backed by the recital-server HTTP API.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::error::PersistenceError;
use crate::record::Record;
use crate::remote::RemotePersistence;
use crate::remote::protocol::{ErrorBody, collection_path, record_path};

pub struct HttpRemote<R: Record> {
    client: Client,
    base_url: String,
    timeout: Duration,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> HttpRemote<R> {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        HttpRemote {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            _record: PhantomData,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-2xx responses into errors.
    async fn send(&self, request: RequestBuilder, id: Option<&str>) -> Result<Response, PersistenceError> {
        let response = request.timeout(self.timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                PersistenceError::Timeout(self.timeout.as_secs())
            } else {
                PersistenceError::from(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(PersistenceError::NotFound(id.to_string()));
            }
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };

        Err(PersistenceError::Service {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl<R: Record> RemotePersistence<R> for HttpRemote<R> {
    async fn list_all(&self) -> Result<Vec<R>, PersistenceError> {
        tracing::debug!("Fetching {} from API", R::KIND);

        let request = self.client.get(self.url(&collection_path(R::KIND)));
        let response = self.send(request, None).await?;

        response
            .json::<Vec<R>>()
            .await
            .map_err(|e| PersistenceError::Decode(e.to_string()))
    }

    async fn create(&self, record: &R) -> Result<R, PersistenceError> {
        let request = self
            .client
            .post(self.url(&collection_path(R::KIND)))
            .json(record);
        let response = self.send(request, None).await?;

        response
            .json::<R>()
            .await
            .map_err(|e| PersistenceError::Decode(e.to_string()))
    }

    async fn update(&self, id: &str, record: &R) -> Result<R, PersistenceError> {
        let request = self
            .client
            .put(self.url(&record_path(R::KIND, id)))
            .json(record);
        let response = self.send(request, Some(id)).await?;

        response
            .json::<R>()
            .await
            .map_err(|e| PersistenceError::Decode(e.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        let request = self.client.delete(self.url(&record_path(R::KIND, id)));
        self.send(request, Some(id)).await?;
        Ok(())
    }
}
