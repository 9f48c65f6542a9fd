//! # tapvote
//!
//! A questionnaire API backed by a hierarchical document store, with
//! authentication delegated to an external identity provider.
//!
//! Every request follows the same shape: verify the bearer token, perform
//! exactly one read or write at a path in the store, and answer with JSON.
//! Authors keep private questionnaires under their own namespace and can
//! publish copies to a public one.
//!
//! ## Architecture
//!
//! - [`identity`] - Identity verification capability and the Identity Toolkit client
//! - [`store`] - Document store capability and the Realtime Database client
//! - [`questionnaire`] - Store layout and questionnaire operations on opaque JSON documents
//! - [`server`] - Axum-based HTTP server, auth gate and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use tapvote::{
//!     create_router, AuthGate, IdentityToolkitVerifier, QuestionnaireService,
//!     RealtimeDatabase, RouterConfig,
//! };
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() {
//!     let database_url = Url::parse("https://my-project.firebaseio.com").unwrap();
//!     let identity_endpoint = Url::parse(tapvote::DEFAULT_IDENTITY_ENDPOINT).unwrap();
//!
//!     let database = RealtimeDatabase::new(&database_url, None);
//!     let verifier = IdentityToolkitVerifier::new(&identity_endpoint, "web-api-key");
//!
//!     let router = create_router(
//!         QuestionnaireService::new(database),
//!         AuthGate::new(verifier),
//!         RouterConfig::new(),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod questionnaire;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{QuestionnaireError, StoreError, VerifyError};
pub use identity::{Identity, IdentityToolkitVerifier, IdentityVerifier, DEFAULT_IDENTITY_ENDPOINT};
pub use questionnaire::QuestionnaireService;
pub use server::{
    auth_middleware, create_router, AppState, AuthError, AuthGate, RouterConfig, API_BASE,
};
pub use store::{DocumentStore, RealtimeDatabase, StorePath};
