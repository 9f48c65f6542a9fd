//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                /api/v1/questionnaires/...                       │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │ (auth gate) │  │  (router config)        │  │
//! │  │  + body     │  │             │  │                         │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod body;
pub mod handlers;
pub mod routes;

pub use auth::{auth_middleware, extract_token, AuthError, AuthGate};
pub use body::JsonBody;
pub use handlers::{
    AppState, CreatedIdResponse, CreatedKeyResponse, EmptyResponse, HealthResponse,
    WelcomeResponse,
};
pub use routes::{create_router, RouterConfig, API_BASE};
