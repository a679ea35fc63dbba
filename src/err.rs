use crate::api::{json_response, ErrorResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures of a single epoch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EpochError {
    #[error("invalid days: must be an integer")]
    InvalidInput,

    #[error("request context canceled")]
    Canceled,

    #[error("days value out of supported range")]
    OutOfRange,

    #[error("integer overflow when adding days")]
    Overflow,
}

impl EpochError {
    pub fn status(&self) -> StatusCode {
        match self {
            EpochError::InvalidInput => StatusCode::BAD_REQUEST,
            EpochError::Canceled => StatusCode::REQUEST_TIMEOUT,
            EpochError::OutOfRange | EpochError::Overflow => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EpochError {
    fn into_response(self) -> Response {
        json_response(
            self.status(),
            &ErrorResponse {
                error: self.to_string(),
            },
        )
    }
}

/// Combined error type for startup and serving errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),

    #[error("both tls_cert and tls_key must be set to enable TLS")]
    IncompleteTls,

    #[error("logging setup failed: {0}")]
    Logging(String),
}
