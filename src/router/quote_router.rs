use axum::{Router, routing::{get, post}, middleware};
use crate::handler::quote_handler::{
    catalog_handler,
    service_fields_handler,
    validate_step_handler,
    submit_quote_handler,
    list_quotes_handler,
    get_quote_handler,
};
use std::sync::Arc;
use crate::service::quote_service::QuoteServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn quote_router(service: Arc<QuoteServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    // Public wizard routes
    let public = Router::new()
        .route("/quotes/services", get(catalog_handler))
        .route("/quotes/services/{code}/fields", get(service_fields_handler))
        .route("/quotes/steps/{step}/validate", post(validate_step_handler))
        .route("/quotes", post(submit_quote_handler));

    // Admin-protected routes
    let admin = Router::new()
        .route("/admin/quotes", get(list_quotes_handler))
        .route("/admin/quotes/{id}", get(get_quote_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public
        .merge(admin)
        .with_state(service)
}
