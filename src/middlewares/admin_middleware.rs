use axum::{body::Body, extract::State, http::{header, Request}, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::warn;

use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub const ADMIN_ROLE: &str = "admin";

pub struct AdminAuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

/// Requires a Bearer access token whose role is `admin`. The validated
/// claims are attached to the request extensions.
pub async fn admin_auth(
    State(state): State<Arc<AdminAuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let unauthorized = |message: &str| HandlerError::new(HandlerErrorKind::Unauthorized, message);

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| unauthorized("Invalid authorization header"))?;
    let claims = state.jwt_utils.validate_access_token(&token).map_err(|e| {
        warn!("Rejected admin token: {e}");
        unauthorized("Invalid or expired token")
    })?;

    if claims.role != ADMIN_ROLE {
        warn!(user = %claims.sub, "Non-admin user tried an admin route");
        return Err(HandlerError::new(HandlerErrorKind::Forbidden, "Admin role required"));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
