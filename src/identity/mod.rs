//! Identity verification.
//!
//! Tokens are issued and validated by an external identity provider; this
//! crate never inspects them. [`IdentityVerifier`] is the only seam.

mod toolkit;

use async_trait::async_trait;

use crate::error::VerifyError;

pub use toolkit::{IdentityToolkitVerifier, DEFAULT_IDENTITY_ENDPOINT};

/// A verified user.
///
/// Only lives for the duration of one request and is used solely to scope
/// store paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject identifier returned by the identity provider
    pub uid: String,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// Trait for validating bearer tokens against an identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Validate `token` and return the subject it was issued to.
    ///
    /// Every call is a fresh verification; implementations must not cache.
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}
