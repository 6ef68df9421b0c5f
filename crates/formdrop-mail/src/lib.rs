//! Email transports for formdrop.
//!
//! - [`HttpMailer`] hands each message to an HTTP mail relay as JSON.
//! - [`LogMailer`] only logs the message; the development default.
//!
//! [`Transport`] picks one at startup from configuration.

mod http;
mod log_only;

pub mod error;

pub use error::{Error, Result};
pub use http::HttpMailer;
pub use log_only::LogMailer;

use formdrop_core::notify::{Mailer, OutboundEmail};

/// The transport selected by configuration.
#[derive(Clone)]
pub enum Transport {
  Http(HttpMailer),
  Log(LogMailer),
}

impl Mailer for Transport {
  type Error = Error;

  async fn send(&self, email: &OutboundEmail) -> Result<()> {
    match self {
      Transport::Http(m) => m.send(email).await,
      Transport::Log(m) => m.send(email).await,
    }
  }
}
