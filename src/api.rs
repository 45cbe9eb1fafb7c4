use axum::{
    Json,
    extract::{FromRequest, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;

use crate::app::AppState;
use crate::error::{GalleryError, GalleryResult};
use crate::record::{GraphDraft, GraphPatch, GraphRecord};
use crate::tags::unique_sorted_tags;

/// JSON body extractor whose rejections become 400 `{error, message}` bodies
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(GalleryError))]
pub struct ApiJson<T>(pub T);

/// `GET /api/graphs` - the whole collection, in stored order
pub async fn list_graphs(State(state): State<Arc<AppState>>) -> GalleryResult<Json<Vec<GraphRecord>>> {
    let graphs = state.store.load_all().await?;
    Ok(Json(graphs))
}

/// `POST /api/graphs` - validate a draft and append it
///
/// # Returns
/// * `201` with the stored record, including the assigned `id` and `createdAt`
/// * `400` when `title`, `formula` or `type` is missing or `type` is not 2D/3D
pub async fn create_graph(
    State(state): State<Arc<AppState>>,
    ApiJson(draft): ApiJson<GraphDraft>,
) -> GalleryResult<(StatusCode, Json<GraphRecord>)> {
    let record = draft.into_record(Utc::now())?;
    let created = state.store.insert(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/graphs/:id` - fetch one graph
///
/// # Arguments
/// * `id` - Path parameter naming the graph
///
/// # Returns
/// * `200` with the graph
/// * `404` with `{error, message}` when no graph has that id
pub async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> GalleryResult<Json<GraphRecord>> {
    match state.store.find(&id).await? {
        Some(graph) => Ok(Json(graph)),
        None => Err(GalleryError::NotFound(id)),
    }
}

/// `PUT /api/graphs/:id` - overlay the supplied fields on the stored graph
pub async fn update_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<GraphPatch>,
) -> GalleryResult<Json<GraphRecord>> {
    match state.store.update(&id, patch).await? {
        Some(graph) => Ok(Json(graph)),
        None => Err(GalleryError::NotFound(id)),
    }
}

/// `DELETE /api/graphs/:id` - responds with the removed graph, 404 if it was never there
pub async fn delete_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> GalleryResult<Json<GraphRecord>> {
    match state.store.remove(&id).await? {
        Some(graph) => Ok(Json(graph)),
        None => Err(GalleryError::NotFound(id)),
    }
}

/// `GET /api/tags` - every distinct tag, sorted
pub async fn list_tags(State(state): State<Arc<AppState>>) -> GalleryResult<Json<Vec<String>>> {
    let graphs = state.store.load_all().await?;
    Ok(Json(unique_sorted_tags(&graphs)))
}
