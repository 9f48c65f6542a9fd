//! Request body extraction.
//!
//! Questionnaire bodies are opaque JSON written to the store as received.
//! [`JsonBody`] parses the raw bytes regardless of `Content-Type` and never
//! answers 4xx: an empty or unparseable body becomes an empty object.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde_json::{Map, Value};
use tracing::{debug, error};

/// Axum extractor yielding the request body as a JSON [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state).await.map_err(|e| {
            error!(status = 500, "Failed to read request body: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        Ok(JsonBody(parse_body(&bytes)))
    }
}

/// Parse a body leniently. Anything that is not JSON becomes `{}`.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Map::new());
    }

    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "request body is not JSON, using empty object");
            Value::Object(Map::new())
        }
    }
}
