//! Error type for `formdrop-mail`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("relay request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("relay rejected message with status {status}: {body}")]
  Rejected { status: u16, body: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
