use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{CategoricalField, RawApplication};
use super::features::{FEATURE_COUNT, FEATURE_NAMES};
use super::service::{EligibilityError, EligibilityService};

const NUMERIC_FIELDS: [&str; 4] = [
    "applicant_income",
    "coapplicant_income",
    "loan_amount",
    "loan_amount_term",
];

/// Choices a form must offer so submissions validate.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub categorical: Vec<CategoricalOptions>,
    pub numeric: [&'static str; 4],
    pub feature_order: [&'static str; FEATURE_COUNT],
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalOptions {
    pub field: &'static str,
    pub options: &'static [&'static str],
}

impl FormSchema {
    pub fn current() -> Self {
        Self {
            categorical: CategoricalField::ALL
                .iter()
                .map(|field| CategoricalOptions {
                    field: field.label(),
                    options: field.options(),
                })
                .collect(),
            numeric: NUMERIC_FIELDS,
            feature_order: FEATURE_NAMES,
        }
    }
}

/// Router builder exposing the eligibility check and its supporting metadata.
pub fn eligibility_router(service: Arc<EligibilityService>) -> Router {
    Router::new()
        .route("/api/v1/loan/eligibility", post(assess_handler))
        .route("/api/v1/loan/schema", get(schema_handler))
        .route("/api/v1/loan/model", get(model_handler))
        .with_state(service)
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<EligibilityService>>,
    axum::Json(application): axum::Json<RawApplication>,
) -> Response {
    match service.assess(&application) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(EligibilityError::Features(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(EligibilityError::Prediction(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn schema_handler() -> axum::Json<FormSchema> {
    axum::Json(FormSchema::current())
}

pub(crate) async fn model_handler(State(service): State<Arc<EligibilityService>>) -> Response {
    (StatusCode::OK, axum::Json(service.model_info().clone())).into_response()
}
