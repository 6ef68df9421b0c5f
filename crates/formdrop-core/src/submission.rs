//! Submission records and the first three pipeline stages: decode, validate,
//! enrich.
//!
//! A raw submission is whatever JSON object the client posted. Enrichment
//! turns it into a [`Submission`], which always carries an id, the client's
//! network origin and a creation timestamp. Those fields are private so a
//! record cannot be altered once built.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  error::{DecodeError, ValidationError},
  gate::GateState,
};

/// Client-supplied fields, keyed by name.
pub type Fields = serde_json::Map<String, Value>;

// ─── Field names ─────────────────────────────────────────────────────────────

pub const FORM_ID: &str = "formId";
pub const ID: &str = "id";
pub const FORWARDED_FOR: &str = "forwardedFor";
pub const SOURCE_IP: &str = "sourceIP";
pub const TIMESTAMP: &str = "timestamp";

/// Keys assigned by enrichment. Client values for these are discarded.
pub const SYSTEM_FIELDS: [&str; 4] = [ID, FORWARDED_FOR, SOURCE_IP, TIMESTAMP];

// ─── Request context ─────────────────────────────────────────────────────────

/// Where a request came from, as seen by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
  /// Value of the `X-Forwarded-For` header, if the request carried one.
  pub forwarded_for: Option<String>,
  /// Peer address of the connection.
  pub source_ip:     String,
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// An enriched submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  id:            Uuid,
  #[serde(rename = "forwardedFor")]
  forwarded_for: Option<String>,
  #[serde(rename = "sourceIP")]
  source_ip:     String,
  /// ISO 8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
  timestamp:     String,
  #[serde(flatten)]
  fields:        Fields,
}

impl Submission {
  pub fn id(&self) -> Uuid { self.id }

  pub fn forwarded_for(&self) -> Option<&str> { self.forwarded_for.as_deref() }

  pub fn source_ip(&self) -> &str { &self.source_ip }

  pub fn timestamp(&self) -> &str { &self.timestamp }

  /// The client-supplied fields, without the system-assigned ones.
  pub fn fields(&self) -> &Fields { &self.fields }

  /// The raw `formId` value, if the client sent one.
  pub fn form_id(&self) -> Option<&Value> { self.fields.get(FORM_ID) }

  /// `formId` as stored in the secondary index column.
  ///
  /// Strings are used as-is; other non-blank scalars use their JSON text.
  pub fn form_id_key(&self) -> Option<String> {
    match self.form_id()? {
      v if is_blank(v) => None,
      Value::String(s) => Some(s.clone()),
      other => Some(other.to_string()),
    }
  }

  /// The complete record as a single JSON object, client and system fields
  /// together.
  pub fn to_fields(&self) -> Fields {
    let mut all = self.fields.clone();
    all.insert(ID.to_owned(), Value::String(self.id.to_string()));
    all.insert(
      FORWARDED_FOR.to_owned(),
      self
        .forwarded_for
        .clone()
        .map_or(Value::Null, Value::String),
    );
    all.insert(SOURCE_IP.to_owned(), Value::String(self.source_ip.clone()));
    all.insert(TIMESTAMP.to_owned(), Value::String(self.timestamp.clone()));
    all
  }
}

// ─── Stages ──────────────────────────────────────────────────────────────────

/// Parse a raw request body into client fields.
///
/// An empty body is an empty submission, not an error. Anything that is not a
/// JSON object is rejected.
pub fn decode(body: &[u8]) -> Result<Fields, DecodeError> {
  if body.is_empty() {
    return Ok(Fields::new());
  }
  match serde_json::from_slice::<Value>(body)? {
    Value::Object(map) => Ok(map),
    other => Err(DecodeError::NotAnObject(json_kind(&other))),
  }
}

/// Enforce the `formId` requirement when the gate is active.
pub fn validate(fields: &Fields, gate: GateState) -> Result<(), ValidationError> {
  if !gate.is_active() {
    return Ok(());
  }
  match fields.get(FORM_ID) {
    Some(v) if !is_blank(v) => Ok(()),
    _ => Err(ValidationError::FormIdMissing),
  }
}

/// Attach a fresh id, the request origin and the current time.
pub fn enrich(fields: Fields, origin: RequestOrigin) -> Submission {
  enrich_with(fields, origin, Uuid::new_v4(), Utc::now())
}

/// [`enrich`] with the id and clock supplied by the caller.
pub fn enrich_with(
  mut fields: Fields,
  origin: RequestOrigin,
  id: Uuid,
  at: DateTime<Utc>,
) -> Submission {
  for key in SYSTEM_FIELDS {
    fields.remove(key);
  }
  Submission {
    id,
    forwarded_for: origin.forwarded_for,
    source_ip: origin.source_ip,
    timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    fields,
  }
}

/// `null`, `false`, `0` and `""` count as absent.
fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::String(s) => s.is_empty(),
    Value::Number(n) => n.as_f64() == Some(0.0),
    Value::Array(_) | Value::Object(_) => false,
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
