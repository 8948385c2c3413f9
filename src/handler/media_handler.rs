use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::service::media_service::{MediaService, MediaServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_media_handler(
    State(service): State<Arc<MediaServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_media().await?))
}
