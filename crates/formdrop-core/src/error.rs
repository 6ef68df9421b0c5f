//! Error types for `formdrop-core`.
//!
//! Each pipeline stage has its own failure type; [`IntakeError`] is the union
//! the HTTP layer maps onto a fixed client-facing response.

use thiserror::Error;

/// The request body could not be turned into a submission record.
#[derive(Debug, Error)]
pub enum DecodeError {
  #[error("malformed JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("expected a JSON object, found {0}")]
  NotAnObject(&'static str),
}

/// A decoded record is missing a field the current gate state requires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("formId missing")]
  FormIdMissing,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal outcome of a failed intake request.
#[derive(Debug, Error)]
pub enum IntakeError {
  #[error("invalid request body: {0}")]
  Decode(#[from] DecodeError),

  #[error("invalid submission: {0}")]
  Validation(#[from] ValidationError),

  #[error("failed to persist submission: {0}")]
  Persist(#[source] BoxError),

  #[error("failed to send notification: {0}")]
  Notify(#[source] BoxError),
}
