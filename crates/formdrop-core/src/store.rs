//! Storage traits consumed by the pipeline and the admin API.
//!
//! The traits are implemented by storage backends (e.g.
//! `formdrop-store-sqlite`). Higher layers (`formdrop-api`,
//! `formdrop-server`) depend on these abstractions, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  form::FormConfig,
  submission::{Fields, Submission},
};

// ─── Configuration store ─────────────────────────────────────────────────────

/// Answers the two questions the config-activation gate asks.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ConfigStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether a table named `name` exists.
  fn table_exists<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Whether the table named `name` holds no rows.
  fn table_is_empty<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Submissions store ───────────────────────────────────────────────────────

/// Durable home of enriched submissions, keyed by `(id, timestamp)`.
pub trait SubmissionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Unconditional insert. An existing row with the same key is overwritten.
  fn put_submission<'a>(
    &'a self,
    submission: &'a Submission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve a submission by id. Returns `None` if not found.
  fn get_submission(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + '_;

  /// Submissions filed under `form_id`, newest first.
  fn submissions_for_form<'a>(
    &'a self,
    form_id: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + 'a;

  /// Submissions filed under `form_id` from a single source address, newest
  /// first.
  fn submissions_from_source<'a>(
    &'a self,
    form_id: &'a str,
    source_ip: &'a str,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + 'a;
}

// ─── Form store ──────────────────────────────────────────────────────────────

/// CRUD over form configuration records, keyed by `(form_id, form_name)`.
pub trait FormStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List all forms, optionally restricted to one `form_id`.
  fn list_forms<'a>(
    &'a self,
    form_id: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<FormConfig>, Self::Error>> + Send + 'a;

  fn get_form<'a>(
    &'a self,
    form_id: &'a str,
    form_name: &'a str,
  ) -> impl Future<Output = Result<Option<FormConfig>, Self::Error>> + Send + 'a;

  /// Insert or replace a form.
  fn put_form<'a>(
    &'a self,
    form: &'a FormConfig,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the settings of an existing form. Returns `None` if the form
  /// does not exist.
  fn update_form<'a>(
    &'a self,
    form_id: &'a str,
    form_name: &'a str,
    settings: Fields,
  ) -> impl Future<Output = Result<Option<FormConfig>, Self::Error>> + Send + 'a;

  /// Delete a form. Returns `false` if there was nothing to delete.
  fn delete_form<'a>(
    &'a self,
    form_id: &'a str,
    form_name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
