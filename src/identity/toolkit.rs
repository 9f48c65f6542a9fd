//! Identity Toolkit (Firebase Authentication) token verifier.
//!
//! Verification is delegated to the `accounts:lookup` endpoint, which rejects
//! expired, revoked, malformed and foreign tokens:
//!
//! ```text
//! POST {endpoint}/accounts:lookup?key={api_key}
//! {"idToken": "<token>"}
//!
//! 200 {"users": [{"localId": "<uid>", ...}]}
//! 400 {"error": {"message": "INVALID_ID_TOKEN", ...}}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{Identity, IdentityVerifier};
use crate::error::VerifyError;

/// Public Identity Toolkit endpoint.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

/// [`IdentityVerifier`] backed by the Identity Toolkit REST API.
#[derive(Clone)]
pub struct IdentityToolkitVerifier {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Deserialize)]
struct LookupError {
    error: LookupErrorDetail,
}

#[derive(Deserialize)]
struct LookupErrorDetail {
    message: String,
}

impl IdentityToolkitVerifier {
    /// Create a verifier for the given API endpoint and web API key.
    pub fn new(endpoint: &Url, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint, api_key)
    }

    /// Create a verifier reusing an existing HTTP client.
    pub fn with_client(client: Client, endpoint: &Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Get the lookup URL (without the key).
    pub fn lookup_url(&self) -> String {
        format!("{}/accounts:lookup", self.endpoint)
    }
}

#[async_trait]
impl IdentityVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let response = self
            .client
            .post(self.lookup_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| VerifyError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<LookupError>(&text)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| format!("status {}", status.as_u16()));
            debug!(status = status.as_u16(), reason = %reason, "token lookup refused");
            return Err(VerifyError::Rejected(reason));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| VerifyError::Decode(e.to_string()))?;

        body.users
            .into_iter()
            .next()
            .map(|user| Identity::new(user.local_id))
            .ok_or_else(|| VerifyError::Rejected("no user for token".to_string()))
    }
}
