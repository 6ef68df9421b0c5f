//! POST handler for the submission-intake route.

use std::net::SocketAddr;

use axum::{
  Json,
  extract::{ConnectInfo, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use formdrop_core::{
  RequestOrigin,
  notify::Mailer,
  store::{ConfigStore, SubmissionStore},
};

use crate::{AppState, error::Error};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

pub async fn handler<S, M>(
  State(state): State<AppState<S, M>>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  headers: HeaderMap,
  body: Bytes,
) -> Response
where
  S: ConfigStore + SubmissionStore + 'static,
  M: Mailer + 'static,
{
  let origin = RequestOrigin {
    forwarded_for: headers
      .get(X_FORWARDED_FOR)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned),
    source_ip:     peer.ip().to_string(),
  };

  match state.intake.submit(&body, origin).await {
    Ok(record) => (
      StatusCode::OK,
      [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true")),
      ],
      Json(record),
    )
      .into_response(),
    Err(e) => Error::from(e).into_response(),
  }
}
