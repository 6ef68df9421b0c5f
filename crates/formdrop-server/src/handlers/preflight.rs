//! OPTIONS handler for the intake route. Needs no auth and no state.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};

pub const ALLOW_METHODS: &str = "OPTIONS,POST";
pub const ALLOW_HEADERS: &str =
  "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

pub async fn handler() -> Response {
  (
    StatusCode::NO_CONTENT,
    [
      (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
      (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
      (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
      (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
    ],
  )
    .into_response()
}
