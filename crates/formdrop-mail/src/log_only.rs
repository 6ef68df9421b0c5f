use formdrop_core::notify::{Mailer, OutboundEmail};

use crate::Result;

/// Writes each message to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
  type Error = crate::Error;

  async fn send(&self, email: &OutboundEmail) -> Result<()> {
    tracing::info!(
      from = %email.from,
      to = %email.to,
      subject = %email.subject,
      html = %email.html,
      "email not delivered (log transport)"
    );
    Ok(())
  }
}
