use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use bson::oid::ObjectId;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::dto::quote_dto::{
    field_values_from_json, CatalogResponse, ListQuotesQuery, ServiceSummary, StepValidationRequest,
    StepValidationResponse,
};
use crate::model::quote::QuoteSubmission;
use crate::quote::catalog::ServiceCode;
use crate::quote::submission::QuoteSubmitter;
use crate::quote::wizard::{validate_step, WizardStep};
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

/// Accepts a step either by position (`0`..`3`) or by name (`service-details`).
fn parse_step(raw: &str) -> Option<WizardStep> {
    match raw.parse::<usize>() {
        Ok(index) => WizardStep::from_index(index),
        Err(_) => serde_json::from_value(Value::String(raw.to_string())).ok(),
    }
}

pub async fn catalog_handler() -> impl IntoResponse {
    Json(CatalogResponse::build())
}

pub async fn service_fields_handler(Path(code): Path<String>) -> Result<impl IntoResponse, HandlerError> {
    let code = code.parse::<ServiceCode>().map_err(HandlerError::not_found)?;
    Ok(Json(ServiceSummary::from(code)))
}

pub async fn validate_step_handler(
    Path(step): Path<String>,
    Json(payload): Json<StepValidationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let step = parse_step(&step).ok_or_else(|| HandlerError::not_found(format!("Unknown wizard step: {}", step)))?;
    let issues = validate_step(step, &field_values_from_json(&payload.values));
    debug!(?step, count = issues.len(), "Validated wizard step");
    Ok(Json(StepValidationResponse { valid: issues.is_empty(), issues }))
}

pub async fn submit_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    info!("[submit_quote_handler] Handler called");
    let submission = QuoteSubmission::from_values(&field_values_from_json(&body));
    let outcome = service.submit(submission).await;

    let status = if outcome.success {
        StatusCode::OK
    } else if outcome.issues.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        warn!("[submit_quote_handler] Submission failed without field issues");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(outcome))
}

pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(query): Query<ListQuotesQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = query.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let res = service.list_quotes(query.page, query.limit).await?;
    Ok(Json(res))
}

pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let oid = ObjectId::parse_str(&id).map_err(|_| HandlerError::bad_request("Invalid id"))?;
    let res = service.get_quote(oid).await?;
    Ok(Json(res))
}
