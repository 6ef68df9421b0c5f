//! Form configuration records, managed through the admin API.
//!
//! The intake pipeline never reads individual records; only the existence
//! and population of the table that holds them matters (see [`crate::gate`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::submission::Fields;

/// A logical form a submission can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
  pub form_id:    String,
  pub form_name:  String,
  /// Free-form settings owned by the operator (contact name, email, ...).
  #[serde(default)]
  pub settings:   Fields,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl FormConfig {
  pub fn new(form_id: impl Into<String>, form_name: impl Into<String>, settings: Fields) -> Self {
    let now = Utc::now();
    Self {
      form_id: form_id.into(),
      form_name: form_name.into(),
      settings,
      created_at: now,
      updated_at: now,
    }
  }
}
