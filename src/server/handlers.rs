//! HTTP request handlers for the questionnaire API.
//!
//! Handlers only bind the transport to [`QuestionnaireService`]: they pull
//! the identity, path id and body out of the request, make one service call,
//! and wrap the result as JSON. Bodies go through [`JsonBody`], so the only
//! statuses are 200, 401 and 500.
//!
//! # Endpoints
//!
//! All paths are relative to `/api/v1`.
//!
//! - `GET /welcome` - Greeting (public)
//! - `GET /questionnaires` - List own questionnaires
//! - `GET /questionnaires/published/{id}` - Published questionnaire (public)
//! - `GET /questionnaires/{id}` - Own questionnaire
//! - `POST /questionnaires` - Create under a store-generated key
//! - `POST /questionnaires2` - Create under a generated id
//! - `PUT /questionnaires/{id}` - Overwrite own questionnaire
//! - `DELETE /questionnaires/{id}` - Delete own questionnaire
//! - `PUT /questionnaires/list/{id}` - Publish
//! - `DELETE /questionnaires/unlist/{id}` - Unpublish

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use super::body::JsonBody;
use crate::error::QuestionnaireError;
use crate::identity::Identity;
use crate::questionnaire::QuestionnaireService;
use crate::store::DocumentStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the questionnaire service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: DocumentStore> {
    pub questionnaires: QuestionnaireService<S>,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(questionnaires: QuestionnaireService<S>) -> Self {
        Self { questionnaires }
    }
}

impl<S: DocumentStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            questionnaires: self.questionnaires.clone(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Welcome response.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response of the append-style create.
#[derive(Debug, Serialize)]
pub struct CreatedKeyResponse {
    pub key: String,
}

/// Response of the explicit-id create.
#[derive(Debug, Serialize)]
pub struct CreatedIdResponse {
    pub id: String,
}

/// Empty JSON object returned by writes.
#[derive(Debug, Serialize)]
pub struct EmptyResponse {}

// =============================================================================
// Error Mapping
// =============================================================================

/// Every questionnaire failure is a bare 500; the detail only goes to the log.
impl IntoResponse for QuestionnaireError {
    fn into_response(self) -> Response {
        error!(status = 500, "Server error: {}", self);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /welcome`
pub async fn welcome_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "hello".to_string(),
    })
}

/// `GET /health`
///
/// Always returns 200 while the process is serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /questionnaires`
///
/// Answers `null` when the user has no questionnaires.
pub async fn list_questionnaires_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Option<Value>>, QuestionnaireError> {
    let questionnaires = state.questionnaires.list(&identity).await?;
    Ok(Json(questionnaires))
}

/// `GET /questionnaires/{id}`
pub async fn get_questionnaire_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, QuestionnaireError> {
    let questionnaire = state.questionnaires.get(&identity, &id).await?;
    Ok(Json(questionnaire))
}

/// `GET /questionnaires/published/{id}`
///
/// Public: mounted outside the auth middleware.
pub async fn get_published_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, QuestionnaireError> {
    let questionnaire = state.questionnaires.get_published(&id).await?;
    Ok(Json(questionnaire))
}

/// `POST /questionnaires`
pub async fn create_questionnaire_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    JsonBody(questionnaire): JsonBody,
) -> Result<Json<CreatedKeyResponse>, QuestionnaireError> {
    let key = state.questionnaires.create(&identity, questionnaire).await?;
    Ok(Json(CreatedKeyResponse { key }))
}

/// `POST /questionnaires2`
pub async fn create_questionnaire_with_id_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    JsonBody(questionnaire): JsonBody,
) -> Result<Json<CreatedIdResponse>, QuestionnaireError> {
    let id = state
        .questionnaires
        .create_with_id(&identity, questionnaire)
        .await?;
    Ok(Json(CreatedIdResponse { id }))
}

/// `PUT /questionnaires/{id}`
pub async fn update_questionnaire_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    JsonBody(questionnaire): JsonBody,
) -> Result<Json<EmptyResponse>, QuestionnaireError> {
    state
        .questionnaires
        .update(&identity, &id, questionnaire)
        .await?;
    Ok(Json(EmptyResponse {}))
}

/// `DELETE /questionnaires/{id}`
pub async fn delete_questionnaire_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<EmptyResponse>, QuestionnaireError> {
    state.questionnaires.delete(&identity, &id).await?;
    Ok(Json(EmptyResponse {}))
}

/// `PUT /questionnaires/list/{id}`
///
/// Requires authentication but does not check ownership of `id`.
pub async fn publish_questionnaire_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    JsonBody(questionnaire): JsonBody,
) -> Result<Json<EmptyResponse>, QuestionnaireError> {
    info!(uid = %identity.uid, id = %id, "publishing questionnaire");
    state.questionnaires.publish(&id, questionnaire).await?;
    Ok(Json(EmptyResponse {}))
}

/// `DELETE /questionnaires/unlist/{id}`
///
/// Requires authentication but does not check ownership of `id`.
pub async fn unpublish_questionnaire_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<EmptyResponse>, QuestionnaireError> {
    info!(uid = %identity.uid, id = %id, "unpublishing questionnaire");
    state.questionnaires.unpublish(&id).await?;
    Ok(Json(EmptyResponse {}))
}

// =============================================================================
// Tests
// =============================================================================
