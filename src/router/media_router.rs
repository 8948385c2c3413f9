use axum::{Router, routing::get, middleware};
use crate::handler::media_handler::list_media_handler;
use std::sync::Arc;
use crate::service::media_service::MediaServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn media_router(service: Arc<MediaServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    Router::new()
        .route("/admin/media", get(list_media_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service)
}
