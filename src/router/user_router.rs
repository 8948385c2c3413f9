use axum::{Router, routing::post};
use crate::handler::user_handler::{login_handler, refresh_token_handler};
use std::sync::Arc;
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>) -> Router {
    Router::new()
        .route("/users/login", post(login_handler))
        .route("/users/refresh-token", post(refresh_token_handler))
        .with_state(service)
}
