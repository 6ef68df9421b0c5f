//! The submission-intake pipeline.
//!
//! decode → validate → enrich → persist → notify. Each stage either advances
//! or ends the request with an [`IntakeError`]. Notification runs only after
//! the record is durably stored, so a stored record may lack an email but an
//! email never lacks a stored record.

use std::sync::Arc;

use crate::{
  error::IntakeError,
  gate::ConfigGate,
  notify::{Mailer, Notifier},
  store::{ConfigStore, SubmissionStore},
  submission::{self, RequestOrigin, Submission},
};

/// Everything a request needs to run the pipeline. Shared across requests.
pub struct Intake<C, S, M> {
  gate:              ConfigGate<C>,
  submissions:       Arc<S>,
  submissions_table: String,
  mailer:            Arc<M>,
  notifier:          Notifier,
}

impl<C, S, M> Intake<C, S, M>
where
  C: ConfigStore,
  S: SubmissionStore,
  M: Mailer,
{
  pub fn new(
    gate: ConfigGate<C>,
    submissions: Arc<S>,
    submissions_table: impl Into<String>,
    mailer: Arc<M>,
    notifier: Notifier,
  ) -> Self {
    Self {
      gate,
      submissions,
      submissions_table: submissions_table.into(),
      mailer,
      notifier,
    }
  }

  pub fn gate(&self) -> &ConfigGate<C> { &self.gate }

  /// Run one request body through the whole pipeline.
  pub async fn submit(
    &self,
    body: &[u8],
    origin: RequestOrigin,
  ) -> Result<Submission, IntakeError> {
    let fields = submission::decode(body).inspect_err(|e| {
      tracing::warn!(
        error = %e,
        body = %String::from_utf8_lossy(body),
        "error parsing JSON body"
      );
    })?;

    let gate = self.gate.resolve().await;
    submission::validate(&fields, gate).inspect_err(|_| {
      tracing::warn!("form ID is missing");
    })?;

    let record = submission::enrich(fields, origin);
    self.persist(&record).await?;
    self.notify(&record).await?;
    Ok(record)
  }

  async fn persist(&self, record: &Submission) -> Result<(), IntakeError> {
    match self.submissions.put_submission(record).await {
      Ok(()) => {
        tracing::info!(
          id = %record.id(),
          table = %self.submissions_table,
          "submission written"
        );
        Ok(())
      }
      Err(e) => {
        tracing::error!(
          id = %record.id(),
          table = %self.submissions_table,
          operation = "put",
          error = %e,
          "error writing submission"
        );
        Err(IntakeError::Persist(Box::new(e)))
      }
    }
  }

  async fn notify(&self, record: &Submission) -> Result<(), IntakeError> {
    let email = self.notifier.compose(record);
    match self.mailer.send(&email).await {
      Ok(()) => {
        tracing::info!(id = %record.id(), to = %email.to, "email sent");
        Ok(())
      }
      Err(e) => {
        tracing::error!(
          id = %record.id(),
          to = %email.to,
          error = %e,
          "error sending email"
        );
        Err(IntakeError::Notify(Box::new(e)))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use serde_json::json;
  use uuid::Uuid;

  use super::*;
  use crate::{error::ValidationError, notify::OutboundEmail};

  #[derive(Debug, thiserror::Error)]
  #[error("dependency down")]
  struct Down;

  /// In-memory stand-in for both stores.
  #[derive(Default)]
  struct MemStore {
    forms_populated: bool,
    fail_writes:     bool,
    rows:            Mutex<Vec<Submission>>,
  }

  impl ConfigStore for MemStore {
    type Error = Down;

    async fn table_exists(&self, _: &str) -> Result<bool, Down> { Ok(true) }

    async fn table_is_empty(&self, _: &str) -> Result<bool, Down> {
      Ok(!self.forms_populated)
    }
  }

  impl SubmissionStore for MemStore {
    type Error = Down;

    async fn put_submission(&self, s: &Submission) -> Result<(), Down> {
      if self.fail_writes {
        return Err(Down);
      }
      self.rows.lock().unwrap().push(s.clone());
      Ok(())
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, Down> {
      Ok(self.rows.lock().unwrap().iter().find(|s| s.id() == id).cloned())
    }

    async fn submissions_for_form(&self, _: &str, _: usize) -> Result<Vec<Submission>, Down> {
      Ok(vec![])
    }

    async fn submissions_from_source(&self, _: &str, _: &str) -> Result<Vec<Submission>, Down> {
      Ok(vec![])
    }
  }

  #[derive(Default)]
  struct RecordingMailer {
    fail: AtomicBool,
    sent: Mutex<Vec<OutboundEmail>>,
  }

  impl Mailer for RecordingMailer {
    type Error = Down;

    async fn send(&self, email: &OutboundEmail) -> Result<(), Down> {
      if self.fail.load(Ordering::SeqCst) {
        return Err(Down);
      }
      self.sent.lock().unwrap().push(email.clone());
      Ok(())
    }
  }

  fn intake(
    store: MemStore,
    mailer: RecordingMailer,
  ) -> (Intake<MemStore, MemStore, RecordingMailer>, Arc<MemStore>, Arc<RecordingMailer>) {
    let store = Arc::new(store);
    let mailer = Arc::new(mailer);
    let intake = Intake::new(
      ConfigGate::new(store.clone(), "forms"),
      store.clone(),
      "submissions",
      mailer.clone(),
      Notifier::new("forms@example.com", "ops@example.com"),
    );
    (intake, store, mailer)
  }

  fn origin() -> RequestOrigin {
    RequestOrigin { forwarded_for: None, source_ip: "10.0.0.1".into() }
  }

  #[tokio::test]
  async fn happy_path_stores_and_emails() {
    let (intake, store, mailer) = intake(MemStore::default(), RecordingMailer::default());
    let record = intake
      .submit(br#"{"name":"Ada","email":"ada@example.com"}"#, origin())
      .await
      .unwrap();

    assert_eq!(record.fields().get("name"), Some(&json!("Ada")));
    assert_eq!(store.rows.lock().unwrap().len(), 1);
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html.contains("ada@example.com"));
  }

  #[tokio::test]
  async fn bad_json_never_touches_the_store() {
    let (intake, store, mailer) = intake(MemStore::default(), RecordingMailer::default());
    let err = intake.submit(b"not json", origin()).await.unwrap_err();
    assert!(matches!(err, IntakeError::Decode(_)));
    assert!(store.rows.lock().unwrap().is_empty());
    assert!(mailer.sent.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn missing_form_id_rejected_before_write() {
    let store = MemStore { forms_populated: true, ..Default::default() };
    let (intake, store, _) = intake(store, RecordingMailer::default());
    let err = intake.submit(br#"{"name":"Ada"}"#, origin()).await.unwrap_err();
    assert!(matches!(err, IntakeError::Validation(ValidationError::FormIdMissing)));
    assert!(store.rows.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn persist_failure_skips_email() {
    let store = MemStore { fail_writes: true, ..Default::default() };
    let (intake, _, mailer) = intake(store, RecordingMailer::default());
    let err = intake.submit(b"{}", origin()).await.unwrap_err();
    assert!(matches!(err, IntakeError::Persist(_)));
    assert!(mailer.sent.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn email_failure_keeps_the_record() {
    let store = MemStore { forms_populated: true, ..Default::default() };
    let mailer = RecordingMailer::default();
    mailer.fail.store(true, Ordering::SeqCst);
    let (intake, store, _) = intake(store, mailer);

    let err = intake.submit(br#"{"formId":"contact"}"#, origin()).await.unwrap_err();
    assert!(matches!(err, IntakeError::Notify(_)));

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].form_id(), Some(&json!("contact")));
  }
}
