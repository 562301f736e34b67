//! Tag Endpoints for the Dev Tag Store
//!
//! # Endpoints
//!
//! - `GET /tags` - Full taxonomy as nested records
//! - `POST /tags` - Create a tag (`{ tag_name, parent_id, parent_path? }`)
//! - `PATCH /tags/:id` - Rename and/or move a tag (`{ tag_name?, parent_id? }`)
//! - `DELETE /tags/:id` - Delete a tag and its subtree

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};

use crate::dev_server::{AppState, HttpError};
use crate::models::{NewTag, TagId, TagRecord, TagUpdate};

/// Read a JSON body, answering malformed input with a JSON error
fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| HttpError::new(rejection.body_text(), "INVALID_INPUT"))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagRecord>>, HttpError> {
    let records = state.store.list_tags().await?;
    Ok(Json(records))
}

async fn create_tag(
    State(state): State<AppState>,
    body: Result<Json<NewTag>, JsonRejection>,
) -> Result<(StatusCode, Json<TagRecord>), HttpError> {
    let tag = payload(body)?;
    let created = state.store.create_tag(tag).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
    body: Result<Json<TagUpdate>, JsonRejection>,
) -> Result<Json<TagRecord>, HttpError> {
    let update = payload(body)?;
    let updated = state.store.update_tag(id, update).await?;
    Ok(Json(updated))
}

async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<Value>, HttpError> {
    state.store.delete_tag(id).await?;
    Ok(Json(json!({ "deleted": id })))
}

/// Tag routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/:id", patch(update_tag).delete(delete_tag))
        .with_state(state)
}
