use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

pub const SWAGGER_JSON: &str = include_str!("../../assets/swagger.json");

/// `GET /epoch/swagger`
pub async fn swagger() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        SWAGGER_JSON,
    )
}
