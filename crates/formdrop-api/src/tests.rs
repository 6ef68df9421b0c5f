//! Router-level tests for the admin API against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
};
use formdrop_core::{
  RequestOrigin,
  store::SubmissionStore,
  submission::enrich,
};
use formdrop_store_sqlite::{SqliteStore, TableNames};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn setup() -> (Router, Arc<SqliteStore>) {
  let store = SqliteStore::open_in_memory(TableNames {
    submissions: "form_submissions".into(),
    forms:       "forms".into(),
  })
  .await
  .unwrap();
  let store = Arc::new(store);
  (api_router(store.clone()), store)
}

async fn call(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
  let req = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(body.to_owned()))
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, value)
}

// ── Forms ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_form() {
  let (app, _) = setup().await;
  let (status, body) = call(
    &app,
    "POST",
    "/forms",
    r#"{"formId":"contact","formName":"Contact","settings":{"email":"ops@example.com"}}"#,
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["formId"], "contact");

  let (status, body) = call(&app, "GET", "/forms/contact/Contact", "").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["settings"]["email"], "ops@example.com");
}

#[tokio::test]
async fn create_requires_keys() {
  let (app, _) = setup().await;
  let (status, body) = call(&app, "POST", "/forms", r#"{"formName":"Contact"}"#).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "formId is required");

  let (status, body) = call(&app, "POST", "/forms", r#"{"formId":"contact"}"#).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "formName is required");

  let (status, body) = call(&app, "POST", "/forms", "{oops").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "Invalid JSON in request body");
}

#[tokio::test]
async fn missing_form_is_404() {
  let (app, _) = setup().await;
  let (status, body) = call(&app, "GET", "/forms/nope/Nope", "").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["message"], "Item not found");

  let (status, _) = call(&app, "PUT", "/forms/nope/Nope", r#"{"settings":{}}"#).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_list_and_delete() {
  let (app, _) = setup().await;
  call(&app, "POST", "/forms", r#"{"formId":"contact","formName":"Contact"}"#).await;
  call(&app, "POST", "/forms", r#"{"formId":"signup","formName":"Sign up"}"#).await;

  let (status, body) = call(
    &app,
    "PUT",
    "/forms/contact/Contact",
    r#"{"settings":{"name":"Ops"}}"#,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["settings"]["name"], "Ops");

  let (_, body) = call(&app, "GET", "/forms", "").await;
  assert_eq!(body.as_array().unwrap().len(), 2);
  let (_, body) = call(&app, "GET", "/forms?form_id=signup", "").await;
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, _) = call(&app, "DELETE", "/forms/contact/Contact", "").await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = call(&app, "GET", "/forms/contact/Contact", "").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_is_405() {
  let (app, _) = setup().await;
  let (status, _) = call(&app, "PATCH", "/forms", "{}").await;
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ── Submissions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn submissions_by_form() {
  let (app, store) = setup().await;
  for ip in ["10.0.0.1", "10.0.0.2"] {
    let Value::Object(fields) = json!({"formId": "contact"}) else { unreachable!() };
    let s = enrich(fields, RequestOrigin { forwarded_for: None, source_ip: ip.into() });
    store.put_submission(&s).await.unwrap();
  }

  let (status, body) = call(&app, "GET", "/submissions?form_id=contact", "").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);

  let (_, body) = call(
    &app,
    "GET",
    "/submissions?form_id=contact&source_ip=10.0.0.2",
    "",
  )
  .await;
  let rows = body.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["sourceIP"], "10.0.0.2");

  let id = rows[0]["id"].as_str().unwrap().to_owned();
  let (status, body) = call(&app, "GET", &format!("/submissions/{id}"), "").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["formId"], "contact");
}

#[tokio::test]
async fn submissions_require_form_id() {
  let (app, _) = setup().await;
  let (status, body) = call(&app, "GET", "/submissions", "").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({"message": "form_id is required"}));

  let (status, body) = call(&app, "GET", "/submissions?form_id=", "").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "form_id is required");
}

#[tokio::test]
async fn oversized_limit_is_clamped() {
  let (app, store) = setup().await;
  let Value::Object(fields) = json!({"formId": "contact"}) else { unreachable!() };
  let s = enrich(fields, RequestOrigin { forwarded_for: None, source_ip: "10.0.0.1".into() });
  store.put_submission(&s).await.unwrap();

  let (status, body) = call(
    &app,
    "GET",
    "/submissions?form_id=contact&limit=18446744073709551615",
    "",
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
}
