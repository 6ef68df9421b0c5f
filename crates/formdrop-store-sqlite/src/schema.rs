//! SQL schema for the formdrop SQLite store.
//!
//! Table names come from configuration, so the DDL is rendered per store
//! rather than kept as a single constant.

use crate::{Error, Result};

/// Connection-level settings, executed once at startup.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA user_version = 1;
";

/// Submissions are written once and never updated by the service.
/// `item_json` holds the complete record; the other columns exist for keys
/// and the two secondary indexes.
pub fn submissions_ddl(table: &str) -> String {
  let t = quote_ident(table);
  let ts_idx = quote_ident(&format!("{table}_form_id_timestamp_idx"));
  let ip_idx = quote_ident(&format!("{table}_form_id_source_ip_idx"));
  format!(
    "
CREATE TABLE IF NOT EXISTS {t} (
    id          TEXT NOT NULL,
    timestamp   TEXT NOT NULL,   -- ISO 8601 UTC, millisecond precision
    form_id     TEXT,            -- NULL when the client sent none
    source_ip   TEXT NOT NULL,
    item_json   TEXT NOT NULL,
    PRIMARY KEY (id, timestamp)
);

CREATE INDEX IF NOT EXISTS {ts_idx} ON {t}(form_id, timestamp);
CREATE INDEX IF NOT EXISTS {ip_idx} ON {t}(form_id, source_ip);
"
  )
}

/// Created on the first admin write, never at startup: an absent table is a
/// meaningful state for the config-activation gate.
pub fn forms_ddl(table: &str) -> String {
  let t = quote_ident(table);
  format!(
    "
CREATE TABLE IF NOT EXISTS {t} (
    form_id       TEXT NOT NULL,
    form_name     TEXT NOT NULL,
    settings_json TEXT NOT NULL DEFAULT '{{}}',
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    PRIMARY KEY (form_id, form_name)
);
"
  )
}

/// Accept `[A-Za-z_][A-Za-z0-9_-]*`.
pub fn validate_ident(name: &str) -> Result<()> {
  let mut chars = name.chars();
  let valid = match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {
      chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
    _ => false,
  };
  if valid {
    Ok(())
  } else {
    Err(Error::InvalidTableName(name.to_owned()))
  }
}

pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }
