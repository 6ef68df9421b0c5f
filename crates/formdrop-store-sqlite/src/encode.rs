//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Submissions and form settings
//! are stored as compact JSON.

use chrono::{DateTime, Utc};
use formdrop_core::{Fields, Submission, form::FormConfig};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Submission ──────────────────────────────────────────────────────────────

pub fn encode_submission(s: &Submission) -> Result<String> { Ok(serde_json::to_string(s)?) }

pub fn decode_submission(s: &str) -> Result<Submission> { Ok(serde_json::from_str(s)?) }

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn encode_settings(settings: &Fields) -> Result<String> {
  Ok(serde_json::to_string(settings)?)
}

pub fn decode_settings(s: &str) -> Result<Fields> { Ok(serde_json::from_str(s)?) }

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A row of the forms table, as read from SQLite.
pub struct RawForm {
  pub form_id:       String,
  pub form_name:     String,
  pub settings_json: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawForm {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      form_id:       row.get(0)?,
      form_name:     row.get(1)?,
      settings_json: row.get(2)?,
      created_at:    row.get(3)?,
      updated_at:    row.get(4)?,
    })
  }

  pub fn into_form(self) -> Result<FormConfig> {
    Ok(FormConfig {
      form_id:    self.form_id,
      form_name:  self.form_name,
      settings:   decode_settings(&self.settings_json)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
