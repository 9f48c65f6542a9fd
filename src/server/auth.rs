//! Bearer token authentication.
//!
//! The gate reads the `Authorization` header, expected as `"<scheme> <token>"`.
//! Only the second whitespace-delimited field is used, so any scheme name is
//! accepted. The token goes to the [`IdentityVerifier`] on every request;
//! outcomes are never cached.
//!
//! Every failure collapses to a bare `401 Unauthorized`. The caller never
//! learns whether the header was missing, the token expired, or the
//! verifier was unreachable.
//!
//! # Example
//!
//! ```ignore
//! use axum::{middleware, routing::get, Router};
//! use tapvote::server::auth::{auth_middleware, AuthGate};
//!
//! let gate = AuthGate::new(verifier);
//! let app = Router::new()
//!     .route("/questionnaires", get(list_handler))
//!     .route_layer(middleware::from_fn_with_state(gate, auth_middleware::<MyVerifier>));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::identity::{Identity, IdentityVerifier};

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No `Authorization` header on the request
    MissingToken,

    /// Header present but unusable, or the verifier refused the token
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing authorization header"),
            AuthError::InvalidToken => write!(f, "Invalid bearer token"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!(status = 401, "Authentication failed: {}", self);
        StatusCode::UNAUTHORIZED.into_response()
    }
}

// =============================================================================
// Auth Gate
// =============================================================================

/// Turns request headers into a verified [`Identity`].
pub struct AuthGate<V: IdentityVerifier> {
    verifier: Arc<V>,
}

impl<V: IdentityVerifier> AuthGate<V> {
    /// Create a gate backed by the given verifier.
    pub fn new(verifier: V) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    /// Create a gate sharing an existing verifier handle.
    pub fn from_shared(verifier: Arc<V>) -> Self {
        Self { verifier }
    }

    /// Get a reference to the underlying verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Authenticate a request from its headers.
    ///
    /// Returns [`AuthError::MissingToken`] without contacting the verifier
    /// when there is no `Authorization` header.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
        let value = header.to_str().map_err(|_| AuthError::InvalidToken)?;
        let token = extract_token(value).ok_or(AuthError::InvalidToken)?;

        match self.verifier.verify(token).await {
            Ok(identity) => Ok(identity),
            Err(e) => {
                debug!(error = %e, "token verification failed");
                Err(AuthError::InvalidToken)
            }
        }
    }
}

impl<V: IdentityVerifier> Clone for AuthGate<V> {
    fn clone(&self) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme (first field) is ignored.
pub fn extract_token(value: &str) -> Option<&str> {
    value.split_whitespace().nth(1)
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware enforcing authentication.
///
/// On success the verified [`Identity`] is stored in the request extensions
/// for handlers to pick up with `Extension<Identity>`. On failure the request
/// never reaches the handler.
pub async fn auth_middleware<V>(
    State(gate): State<AuthGate<V>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    V: IdentityVerifier + 'static,
{
    let identity = gate.authenticate(request.headers()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
