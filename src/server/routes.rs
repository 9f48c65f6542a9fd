//! Router configuration for the questionnaire API.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health                                         - Health check (public)
//! /api/v1/welcome                                 - Greeting (public)
//! /api/v1/questionnaires/published/{id}     GET   - Published (public)
//! /api/v1/questionnaires                GET, POST - Own list / create (protected)
//! /api/v1/questionnaires2                    POST - Create with id (protected)
//! /api/v1/questionnaires/{id}   GET, PUT, DELETE  - Own questionnaire (protected)
//! /api/v1/questionnaires/list/{id}           PUT  - Publish (protected)
//! /api/v1/questionnaires/unlist/{id}      DELETE  - Unpublish (protected)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tapvote::{create_router, AuthGate, QuestionnaireService, RouterConfig};
//!
//! let service = QuestionnaireService::new(database);
//! let gate = AuthGate::new(verifier);
//! let router = create_router(service, gate, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, AuthGate};
use super::handlers::{
    create_questionnaire_handler, create_questionnaire_with_id_handler,
    delete_questionnaire_handler, get_published_handler, get_questionnaire_handler,
    health_handler, list_questionnaires_handler, publish_questionnaire_handler,
    unpublish_questionnaire_handler, update_questionnaire_handler, welcome_handler, AppState,
};
use crate::identity::IdentityVerifier;
use crate::questionnaire::QuestionnaireService;
use crate::store::DocumentStore;

/// Base path of the versioned API.
pub const API_BASE: &str = "/api/v1";

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with defaults: any CORS origin and
    /// request tracing enabled.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Protected routes are wrapped in [`auth_middleware`] with `route_layer`, so
/// unknown paths still answer 404 instead of 401. Public routes are merged in
/// afterwards and never see the gate.
pub fn create_router<S, V>(
    questionnaires: QuestionnaireService<S>,
    gate: AuthGate<V>,
    config: RouterConfig,
) -> Router
where
    S: DocumentStore + 'static,
    V: IdentityVerifier + 'static,
{
    let app_state = AppState::new(questionnaires);
    let cors = build_cors_layer(&config);

    let protected_routes = Router::new()
        .route(
            "/questionnaires",
            get(list_questionnaires_handler::<S>).post(create_questionnaire_handler::<S>),
        )
        .route(
            "/questionnaires2",
            post(create_questionnaire_with_id_handler::<S>),
        )
        .route(
            "/questionnaires/{id}",
            get(get_questionnaire_handler::<S>)
                .put(update_questionnaire_handler::<S>)
                .delete(delete_questionnaire_handler::<S>),
        )
        .route(
            "/questionnaires/list/{id}",
            put(publish_questionnaire_handler::<S>),
        )
        .route(
            "/questionnaires/unlist/{id}",
            delete(unpublish_questionnaire_handler::<S>),
        )
        .route_layer(middleware::from_fn_with_state(gate, auth_middleware::<V>))
        .with_state(app_state.clone());

    let public_routes = Router::new()
        .route("/welcome", get(welcome_handler))
        .route(
            "/questionnaires/published/{id}",
            get(get_published_handler::<S>),
        )
        .with_state(app_state);

    let api = Router::new().merge(protected_routes).merge(public_routes);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest(API_BASE, api)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
