//! Notification rendering and the email transport trait.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::submission::Submission;

pub const SUBJECT: &str = "New Form Submission";
const HEADING: &str = "<h1>New Form Submission</h1>";

/// A fully rendered email, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
  pub from:    String,
  pub to:      String,
  pub subject: String,
  pub html:    String,
}

/// Delivers rendered emails.
pub trait Mailer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send<'a>(
    &'a self,
    email: &'a OutboundEmail,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// Composes the operator notification for a submission. Sender and recipient
/// are fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct Notifier {
  from: String,
  to:   String,
}

impl Notifier {
  pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
    Self { from: from.into(), to: to.into() }
  }

  pub fn compose(&self, submission: &Submission) -> OutboundEmail {
    OutboundEmail {
      from:    self.from.clone(),
      to:      self.to.clone(),
      subject: SUBJECT.to_owned(),
      html:    render_html(submission),
    }
  }
}

/// Render every field of `submission` as an HTML paragraph.
pub fn render_html(submission: &Submission) -> String {
  let mut html = String::from(HEADING);
  for (key, value) in submission.to_fields() {
    let text = match value {
      Value::String(s) => s,
      Value::Null => String::new(),
      other => other.to_string(),
    };
    html.push_str("<p><strong>");
    html.push_str(&escape_html(&key));
    html.push_str(":</strong> ");
    html.push_str(&escape_html(&text));
    html.push_str("</p>");
  }
  html
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}
