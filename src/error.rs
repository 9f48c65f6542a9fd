use thiserror::Error;

/// Errors that can occur when talking to the document store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store answered with a non-success status
    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The store answered with a body we could not interpret
    #[error("Malformed store response: {0}")]
    Decode(String),
}

/// Errors that can occur when verifying an identity token
#[derive(Debug, Clone, Error)]
pub enum VerifyError {
    /// The identity provider refused the token (expired, malformed, revoked...)
    #[error("Token rejected: {0}")]
    Rejected(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The identity provider answered with a body we could not interpret
    #[error("Malformed verifier response: {0}")]
    Decode(String),
}

/// Errors raised by questionnaire operations
#[derive(Debug, Clone, Error)]
pub enum QuestionnaireError {
    /// The underlying store operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
