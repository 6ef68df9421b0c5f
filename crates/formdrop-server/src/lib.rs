//! HTTP layer for formdrop.
//!
//! Exposes an axum [`Router`] serving the submission-intake route, its CORS
//! preflight responder and, when admin credentials are configured, the admin
//! API behind HTTP Basic auth.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{Router, middleware, routing::post};
use formdrop_core::{
  Intake,
  notify::Mailer,
  store::{ConfigStore, FormStore, SubmissionStore},
};
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{preflight, submit};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M> {
  pub intake: Arc<Intake<S, S, M>>,
  pub store:  Arc<S>,
  /// `None` disables the admin API.
  pub auth:   Option<Arc<AuthConfig>>,
}

impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    Self {
      intake: self.intake.clone(),
      store:  self.store.clone(),
      auth:   self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the whole service.
///
/// The intake handler reads the peer address through [`ConnectInfo`], so the
/// router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// [`ConnectInfo`]: axum::extract::ConnectInfo
pub fn router<S, M>(state: AppState<S, M>) -> Router
where
  S: ConfigStore + SubmissionStore + FormStore + 'static,
  M: Mailer + 'static,
{
  let mut app = Router::new()
    .route(
      "/",
      post(submit::handler::<S, M>).options(preflight::handler),
    )
    .with_state(state.clone());

  if let Some(credentials) = state.auth {
    let admin = formdrop_api::api_router(state.store)
      .layer(middleware::from_fn_with_state(credentials, auth::require_admin));
    app = app.nest("/admin", admin);
  }

  app.layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
