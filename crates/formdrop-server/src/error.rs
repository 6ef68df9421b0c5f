//! Error types and axum `IntoResponse` implementation.
//!
//! Pipeline failures map onto a fixed status and message per category. The
//! underlying cause is logged by the pipeline and never reaches the client.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use formdrop_core::IntakeError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error(transparent)]
  Intake(#[from] IntakeError),
}

impl Error {
  /// Status and client-facing message for this error.
  pub fn status_and_message(&self) -> (StatusCode, &'static str) {
    match self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
      Error::Intake(IntakeError::Decode(_)) => {
        (StatusCode::BAD_REQUEST, "Invalid JSON in request body")
      }
      Error::Intake(IntakeError::Validation(_)) => {
        (StatusCode::BAD_REQUEST, "Form ID is missing")
      }
      Error::Intake(IntakeError::Persist(_)) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Error persisting submission")
      }
      Error::Intake(IntakeError::Notify(_)) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Error sending email")
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = self.status_and_message();
    let mut res = (status, Json(json!({ "message": message }))).into_response();
    let headers = res.headers_mut();
    match self {
      Error::Unauthorized => {
        headers.insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"formdrop\""),
        );
      }
      Error::Intake(_) => {
        headers.insert(
          header::ACCESS_CONTROL_ALLOW_ORIGIN,
          HeaderValue::from_static("*"),
        );
      }
    }
    res
  }
}
