//! HTTP relay transport.
//!
//! Each message is POSTed as `{"from","to","subject","html"}` to a single
//! configured endpoint. Any non-2xx response counts as a failed delivery.

use std::time::Duration;

use formdrop_core::notify::{Mailer, OutboundEmail};
use reqwest::Client;

use crate::{Error, Result};

/// Delivers mail through an HTTP relay.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpMailer {
  client: Client,
  url:    String,
  token:  Option<String>,
}

impl HttpMailer {
  pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, url: url.into(), token })
  }
}

impl Mailer for HttpMailer {
  type Error = Error;

  async fn send(&self, email: &OutboundEmail) -> Result<()> {
    let mut req = self.client.post(&self.url).json(email);
    if let Some(token) = &self.token {
      req = req.bearer_auth(token);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(());
    }

    let body = resp.text().await.unwrap_or_default();
    Err(Error::Rejected { status: status.as_u16(), body })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
  };
  use serde_json::Value;
  use tokio::net::TcpListener;

  use super::*;

  type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

  /// Start a relay on an ephemeral port that answers with `status`.
  async fn relay(status: StatusCode) -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
      .route(
        "/send",
        post(
          move |State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
              .get("authorization")
              .and_then(|v| v.to_str().ok())
              .map(str::to_owned);
            seen.lock().unwrap().push((auth, body));
            status
          },
        ),
      )
      .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}/send"), seen)
  }

  fn email() -> OutboundEmail {
    OutboundEmail {
      from:    "forms@example.com".into(),
      to:      "ops@example.com".into(),
      subject: "New Form Submission".into(),
      html:    "<h1>New Form Submission</h1>".into(),
    }
  }

  #[tokio::test]
  async fn posts_message_as_json() {
    let (url, seen) = relay(StatusCode::ACCEPTED).await;
    let mailer = HttpMailer::new(url, Some("s3cret".into())).unwrap();
    mailer.send(&email()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer s3cret"));
    assert_eq!(body["to"], "ops@example.com");
    assert_eq!(body["subject"], "New Form Submission");
  }

  #[tokio::test]
  async fn non_success_status_is_an_error() {
    let (url, _) = relay(StatusCode::SERVICE_UNAVAILABLE).await;
    let mailer = HttpMailer::new(url, None).unwrap();
    let err = mailer.send(&email()).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { status: 503, .. }), "{err}");
  }

  #[tokio::test]
  async fn unreachable_relay_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mailer = HttpMailer::new(format!("http://{addr}/send"), None).unwrap();
    assert!(matches!(mailer.send(&email()).await, Err(Error::Request(_))));
  }
}
