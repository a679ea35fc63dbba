use crate::{api::json_response, api::ApiState, calc, err::EpochError};
use axum::{
    extract::{rejection::PathRejection, Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochResponse {
    pub now_epoch: i64,
    pub future_epoch: i64,
    pub days_added: i64,
}

/// `GET /epoch/{days}`
pub async fn get_epoch(
    State(state): State<ApiState>,
    days: Result<Path<String>, PathRejection>,
    cancel: Option<Extension<CancellationToken>>,
) -> Response {
    let days = match days {
        Ok(Path(raw)) => raw,
        Err(e) => {
            tracing::debug!(error = %e, "rejected days path segment");
            return EpochError::InvalidInput.into_response();
        }
    };

    let cancel = cancel.map(|Extension(token)| token);
    match epoch(state.clock.now(), &days, cancel.as_ref()) {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(e) => {
            tracing::debug!(days = %days, error = %e, "epoch request failed");
            e.into_response()
        }
    }
}

/// Parse the raw path value and run the calculation against `now_epoch`.
pub fn epoch(
    now_epoch: i64,
    days_raw: &str,
    cancel: Option<&CancellationToken>,
) -> Result<EpochResponse, EpochError> {
    let days: i64 = days_raw.parse().map_err(|_| EpochError::InvalidInput)?;
    let (now_epoch, future_epoch) = calc::calculate(now_epoch, days, cancel)?;

    Ok(EpochResponse {
        now_epoch,
        future_epoch,
        days_added: days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_integers() {
        assert_eq!(epoch(0, "3", None).unwrap().future_epoch, 259_200);
        assert_eq!(epoch(0, "+3", None).unwrap().days_added, 3);
        assert_eq!(epoch(0, "-3", None).unwrap().future_epoch, -259_200);
        assert_eq!(epoch(0, "007", None).unwrap().days_added, 7);
    }

    #[test]
    fn rejects_non_integers() {
        for raw in ["", "abc", "1.5", " 1", "1 ", "0x10", "1e3", "--1", "99999999999999999999"] {
            assert_eq!(epoch(0, raw, None), Err(EpochError::InvalidInput), "{raw:?}");
        }
    }

    #[test]
    fn invalid_input_wins_over_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(epoch(0, "x", Some(&token)), Err(EpochError::InvalidInput));
        assert_eq!(epoch(0, "1", Some(&token)), Err(EpochError::Canceled));
    }

    #[test]
    fn serializes_field_names() {
        let body = EpochResponse {
            now_epoch: 1_800_000_000,
            future_epoch: 1_800_086_400,
            days_added: 1,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"now_epoch":1800000000,"future_epoch":1800086400,"days_added":1}"#
        );
    }
}
