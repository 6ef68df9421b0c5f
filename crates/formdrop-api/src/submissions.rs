//! Read-only handlers for `/submissions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/submissions` | `?form_id` required; optional `source_ip`, `limit` (at most 1000) |
//! | `GET`  | `/submissions/:id` | Single submission |
//!
//! Submissions have no write path here: they are created only by the intake
//! route.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use formdrop_core::{Submission, store::SubmissionStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the form whose submissions to return.
  pub form_id:   Option<String>,
  /// Restrict to a single source address. `limit` does not apply.
  pub source_ip: Option<String>,
  pub limit:     Option<usize>,
}

/// `GET /submissions?form_id=<id>[&source_ip=...][&limit=...]`, newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Submission>>, ApiError>
where
  S: SubmissionStore,
{
  let Some(form_id) = params.form_id.filter(|id| !id.is_empty()) else {
    return Err(ApiError::BadRequest("form_id is required".to_owned()));
  };

  let submissions = match &params.source_ip {
    Some(ip) => store.submissions_from_source(&form_id, ip).await,
    None => {
      let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
      store.submissions_for_form(&form_id, limit).await
    }
  }
  .map_err(ApiError::store)?;

  Ok(Json(submissions))
}

/// `GET /submissions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Submission>, ApiError>
where
  S: SubmissionStore,
{
  let submission = store
    .get_submission(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Item not found".to_owned()))?;
  Ok(Json(submission))
}
