use axum::{Router, routing::{get, post}, middleware};
use crate::handler::settings_handler::{robots_handler, settings_handler, refresh_settings_handler, SettingsState};
use std::sync::Arc;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn settings_router(state: Arc<SettingsState>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    let public = Router::new()
        .route("/robots.txt", get(robots_handler))
        .route("/settings", get(settings_handler));

    let admin = Router::new()
        .route("/admin/settings/refresh", post(refresh_settings_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public
        .merge(admin)
        .with_state(state)
}
