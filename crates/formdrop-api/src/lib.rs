//! Administrative JSON API for formdrop.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`FormStore`] and [`SubmissionStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/admin", formdrop_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod forms;
pub mod submissions;

use std::sync::Arc;

use axum::{Router, routing::get};
use formdrop_core::store::{FormStore, SubmissionStore};

pub use error::ApiError;

/// Build a fully-materialised admin router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FormStore + SubmissionStore + 'static,
{
  Router::new()
    // Forms
    .route("/forms", get(forms::list::<S>).post(forms::create::<S>))
    .route(
      "/forms/{form_id}/{form_name}",
      get(forms::get_one::<S>)
        .put(forms::update::<S>)
        .delete(forms::delete::<S>),
    )
    // Submissions
    .route("/submissions", get(submissions::list::<S>))
    .route("/submissions/{id}", get(submissions::get_one::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
