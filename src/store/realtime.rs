//! Firebase Realtime Database REST client.
//!
//! Every node of the database is addressable as `{base}/{path}.json`:
//!
//! ```text
//! GET    /questionnaires/u1.json        read subtree (null when empty)
//! PUT    /questionnaires/u1/q1.json     replace node
//! POST   /questionnaires/u1.json        append, answers {"name": "<key>"}
//! DELETE /questionnaires/u1/q1.json     remove node
//! ```
//!
//! When a database secret is configured it is passed as the `auth` query
//! parameter, which grants admin access and bypasses security rules.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{DocumentStore, StorePath};
use crate::error::StoreError;

/// Realtime Database implementation of [`DocumentStore`].
#[derive(Clone)]
pub struct RealtimeDatabase {
    client: Client,
    base_url: String,
    secret: Option<String>,
}

/// Body returned by `POST` (append) requests.
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Body returned alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl RealtimeDatabase {
    /// Create a client for the database at `base_url`
    /// (e.g. `https://my-project.firebaseio.com`).
    pub fn new(base_url: &Url, secret: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url, secret)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, base_url: &Url, secret: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            secret,
        }
    }

    /// Get the database base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the database is reachable and accepts our credentials.
    ///
    /// Performs a shallow read of the root so only top-level keys are fetched.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let request = self
            .request(reqwest::Method::GET, &StorePath::root())
            .query(&[("shallow", "true")]);
        send(request).await?;
        Ok(())
    }

    fn url_for(&self, path: &StorePath) -> String {
        format!("{}/{}.json", self.base_url, path.encoded())
    }

    fn request(&self, method: reqwest::Method, path: &StorePath) -> RequestBuilder {
        let request = self.client.request(method, self.url_for(path));
        match &self.secret {
            Some(secret) => request.query(&[("auth", secret.as_str())]),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for RealtimeDatabase {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        debug!(%path, "store read");
        let response = send(self.request(reqwest::Method::GET, path)).await?;
        let value: Value = response.json().await.map_err(map_reqwest_error)?;

        Ok(match value {
            Value::Null => None,
            value => Some(value),
        })
    }

    async fn set(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        debug!(%path, "store set");
        send(self.request(reqwest::Method::PUT, path).json(&value)).await?;
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError> {
        debug!(%path, "store push");
        let response = send(self.request(reqwest::Method::POST, path).json(&value)).await?;
        let body: PushResponse = response.json().await.map_err(map_reqwest_error)?;
        Ok(body.name)
    }

    async fn remove(&self, path: &StorePath) -> Result<(), StoreError> {
        debug!(%path, "store remove");
        send(self.request(reqwest::Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Send a request and turn non-success statuses into [`StoreError::Status`].
async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
    let response = request.send().await.map_err(map_reqwest_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

fn map_reqwest_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Decode(err.to_string())
    } else {
        StoreError::Connection(err.to_string())
    }
}
