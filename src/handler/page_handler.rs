use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::dto::page_dto::{EditPageRequest, PageSummary, SavePageRequest};
use crate::service::page_service::{PageService, PageServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_pages_handler(
    State(service): State<Arc<PageServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_pages().await?))
}

pub async fn editor_handler(
    State(service): State<Arc<PageServiceImpl>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.editor_view(&slug).await?))
}

// Full replace. Title and description may be empty, as on the edits path.
pub async fn save_page_handler(
    State(service): State<Arc<PageServiceImpl>>,
    Path(slug): Path<String>,
    Json(payload): Json<SavePageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let payload = payload.into_payload().map_err(HandlerError::bad_request)?;
    let page = service.save_page(&slug, payload).await?;
    Ok(Json(PageSummary::from(page)))
}

pub async fn edit_page_handler(
    State(service): State<Arc<PageServiceImpl>>,
    Path(slug): Path<String>,
    Json(payload): Json<EditPageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let view = service.apply_edits(&slug, payload.operations, payload.save).await?;
    Ok(Json(view))
}

pub async fn public_page_handler(
    State(service): State<Arc<PageServiceImpl>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.public_page(&slug).await?))
}
