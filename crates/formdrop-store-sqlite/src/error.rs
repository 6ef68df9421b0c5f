//! Error type for `formdrop-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Table names are spliced into SQL, so only plain identifiers are allowed.
  #[error("invalid table name: {0:?}")]
  InvalidTableName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
