pub mod epoch;
pub mod swagger;

use crate::clock::Clock;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

const FALLBACK_BODY: &str = r#"{"error":"failed to write response"}"#;

#[derive(Clone)]
pub struct ApiState {
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serialize `body` as a JSON response with the given status.
///
/// Falls back to a plain-text 500 if serialization fails.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to write response");
            (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY).into_response()
        }
    }
}
