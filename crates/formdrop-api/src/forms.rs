//! Handlers for `/forms` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/forms` | Optional `?form_id=` |
//! | `POST`   | `/forms` | Body: [`CreateBody`]; returns 201 + stored form |
//! | `GET`    | `/forms/:form_id/:form_name` | 404 if not found |
//! | `PUT`    | `/forms/:form_id/:form_name` | Body: `{"settings":{...}}`; 404 if not found |
//! | `DELETE` | `/forms/:form_id/:form_name` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use formdrop_core::{
  Fields,
  form::FormConfig,
  store::FormStore,
  submission::decode,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Decode a JSON object body the same way the intake route does: an empty
/// body is `{}`.
fn object_body(body: &[u8]) -> Result<Fields, ApiError> {
  decode(body).map_err(|e| {
    tracing::warn!(error = %e, "invalid admin request body");
    ApiError::BadRequest("Invalid JSON in request body".to_owned())
  })
}

/// Pull a non-empty string field out of a body.
fn required_str(body: &Fields, key: &str) -> Result<String, ApiError> {
  match body.get(key) {
    Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
    _ => Err(ApiError::BadRequest(format!("{key} is required"))),
  }
}

/// The optional `settings` object of a body.
fn settings(body: &mut Fields) -> Result<Fields, ApiError> {
  match body.remove("settings") {
    None | Some(Value::Null) => Ok(Fields::new()),
    Some(Value::Object(m)) => Ok(m),
    Some(_) => Err(ApiError::BadRequest("settings must be an object".to_owned())),
  }
}

fn not_found() -> ApiError { ApiError::NotFound("Item not found".to_owned()) }

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub form_id: Option<String>,
}

/// `GET /forms[?form_id=<id>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<FormConfig>>, ApiError>
where
  S: FormStore,
{
  let forms = store
    .list_forms(params.form_id.as_deref())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(forms))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /forms/:form_id/:form_name`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((form_id, form_name)): Path<(String, String)>,
) -> Result<Json<FormConfig>, ApiError>
where
  S: FormStore,
{
  let form = store
    .get_form(&form_id, &form_name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  Ok(Json(form))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /forms`.
///
/// Parsed by hand rather than through `Json<CreateBody>` so that missing
/// fields produce the admin API's own 400 messages.
#[derive(Debug)]
pub struct CreateBody {
  pub form_id:   String,
  pub form_name: String,
  pub settings:  Fields,
}

impl CreateBody {
  fn parse(body: &[u8]) -> Result<Self, ApiError> {
    let mut body = object_body(body)?;
    Ok(Self {
      form_id:   required_str(&body, "formId")?,
      form_name: required_str(&body, "formName")?,
      settings:  settings(&mut body)?,
    })
  }
}

/// `POST /forms`: returns 201 + the stored [`FormConfig`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: FormStore,
{
  let body = CreateBody::parse(&body)?;
  let form = FormConfig::new(body.form_id, body.form_name, body.settings);
  store.put_form(&form).await.map_err(ApiError::store)?;
  tracing::info!(form_id = %form.form_id, form_name = %form.form_name, "form created");
  Ok((StatusCode::CREATED, Json(form)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /forms/:form_id/:form_name`, body: `{"settings":{...}}`.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((form_id, form_name)): Path<(String, String)>,
  body: Bytes,
) -> Result<Json<FormConfig>, ApiError>
where
  S: FormStore,
{
  let mut body = object_body(&body)?;
  let settings = settings(&mut body)?;
  let form = store
    .update_form(&form_id, &form_name, settings)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  tracing::info!(%form_id, %form_name, "form updated");
  Ok(Json(form))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /forms/:form_id/:form_name`: 204 whether or not the form existed.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((form_id, form_name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: FormStore,
{
  let existed = store
    .delete_form(&form_id, &form_name)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(%form_id, %form_name, existed, "form deleted");
  Ok(StatusCode::NO_CONTENT)
}
