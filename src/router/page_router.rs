use axum::{Router, routing::{get, post, put}, middleware};
use crate::handler::page_handler::{
    list_pages_handler,
    editor_handler,
    save_page_handler,
    edit_page_handler,
    public_page_handler,
};
use std::sync::Arc;
use crate::service::page_service::PageServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn page_router(service: Arc<PageServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    let public = Router::new()
        .route("/pages/{slug}", get(public_page_handler));

    let admin = Router::new()
        .route("/admin/pages", get(list_pages_handler))
        .route("/admin/pages/{slug}", put(save_page_handler))
        .route("/admin/pages/{slug}/editor", get(editor_handler))
        .route("/admin/pages/{slug}/edits", post(edit_page_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public
        .merge(admin)
        .with_state(service)
}
