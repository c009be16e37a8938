//! Endpoint handlers.
//!
//! Handlers only extract raw fields and choose the response shape; all
//! coercion happens in `qr::options::validate`.

use std::collections::HashMap;
use std::time::Instant;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::http::error::{ApiError, ErrorBody};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::qr::{validate, Delivery, OutputFormat, RawOptions};

/// `POST /generate-qr`.
///
/// PNG is answered with the JSON envelope carrying a data URI; SVG is
/// answered with the markup itself.
pub async fn generate_qr(
    State(state): State<AppState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let response = generate_qr_inner(&state, body).await.into_response();
    metrics::record_request("generate-qr", response.status().as_u16(), start);
    response
}

async fn generate_qr_inner(
    state: &AppState,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let request = validate(&RawOptions::from_json(body))?;

    let delivery = match request.format() {
        OutputFormat::Png => Delivery::Embedded,
        OutputFormat::Svg => Delivery::Raw,
    };
    let result = state.dispatcher.render(&request, delivery).await?;
    Ok(result.into_response())
}

/// `GET /qr`: the image itself, whatever the format.
pub async fn qr_image(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let response = qr_image_inner(&state, query).await.into_response();
    metrics::record_request("qr", response.status().as_u16(), start);
    response
}

async fn qr_image_inner(
    state: &AppState,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    let request = validate(&RawOptions::from_query(params))?;
    let result = state.dispatcher.render(&request, Delivery::Raw).await?;
    Ok(result.into_response())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: String,
}

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: state.service_name.to_string(),
    })
}

/// Anything no route or static file answered.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(
            "Not found",
            "The requested endpoint does not exist",
        )),
    )
}
