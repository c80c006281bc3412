use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::{PathRejection, StringRejection};
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

/// List client collection names
///
/// `GET /` returns a JSON array of names. Reserved collections never appear.
pub async fn list_collections(State(state): State<Arc<ServerState>>) -> ServerResult<Json<Vec<String>>> {
    Ok(Json(state.gateway.list_collections().await?))
}

/// List every document of a collection
///
/// An unknown collection is an empty array, not an error.
pub async fn list_documents(
    State(state): State<Arc<ServerState>>,
    path: Result<Path<String>, PathRejection>,
) -> ServerResult<Json<Vec<Value>>> {
    let Path(collection) = path.map_err(path_rejected)?;

    Ok(Json(state.gateway.list_documents(&collection).await?))
}

/// Insert the raw request body into a collection
///
/// Responds `201 Created` with an empty body. When the payload was an object the
/// assigned uid is reported through `Location: /{collection}/{uid}`.
pub async fn create_document(
    State(state): State<Arc<ServerState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<String, StringRejection>,
) -> ServerResult<Response> {
    let Path(collection) = path.map_err(path_rejected)?;
    let body = body.map_err(|rejection| body_rejected(rejection, state.config.max_body_size_mb))?;

    let uid = state.gateway.create(&collection, &body).await?;

    let mut response = StatusCode::CREATED.into_response();

    if let Some(uid) = uid {
        match HeaderValue::from_str(&format!("/{collection}/{uid}")) {
            Ok(location) => {
                response.headers_mut().insert(LOCATION, location);
            }
            Err(_) => tracing::debug!(collection = %collection, uid, "collection name not usable in a header"),
        }
    }

    Ok(response)
}

/// Fetch one document by uid
///
/// A uid segment that is not a 64-bit integer is a bad request. No matching
/// document is a 404.
pub async fn get_document(
    State(state): State<Arc<ServerState>>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> ServerResult<Json<Value>> {
    let Path((collection, uid)) = path.map_err(path_rejected)?;

    state
        .gateway
        .get_by_uid(&collection, uid)
        .await?
        .map(Json)
        .ok_or(ServerError::NotFound)
}

fn path_rejected(rejection: PathRejection) -> ServerError {
    ServerError::BadRequest(rejection.body_text())
}

fn body_rejected(rejection: StringRejection, max_body_size_mb: usize) -> ServerError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge(max_body_size_mb)
    } else {
        ServerError::BadRequest(rejection.body_text())
    }
}
