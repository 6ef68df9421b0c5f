//! Runtime server configuration.
//!
//! Read from an optional TOML file layered under `FORMDROP_*` environment
//! variables. The four store and mail identifiers are required; a missing or
//! empty one stops the server at startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration: {0}")]
  Source(#[from] config::ConfigError),

  #[error("{0} must be set and non-empty")]
  Missing(&'static str),

  #[error("admin_username and admin_password_hash must be set together")]
  PartialAdmin,
}

/// Which email transport delivers notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
  /// Log the message and report success.
  #[default]
  Log,
  /// POST the message to `mail_relay_url`.
  Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  pub submissions_table:   String,
  pub forms_table:         String,
  pub email_from:          String,
  pub email_to:            String,
  #[serde(default)]
  pub mail_transport:      MailTransport,
  pub mail_relay_url:      Option<String>,
  pub mail_relay_token:    Option<String>,
  pub admin_username:      Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("formdrop.sqlite3") }

impl ServerConfig {
  /// Load from `path` (if it exists) and the `FORMDROP_*` environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FORMDROP"))
      .build()?;
    Self::from_settings(settings)
  }

  pub fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
    let cfg: ServerConfig = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    let required = [
      ("submissions_table", &self.submissions_table),
      ("forms_table", &self.forms_table),
      ("email_from", &self.email_from),
      ("email_to", &self.email_to),
    ];
    for (name, value) in required {
      if value.trim().is_empty() {
        return Err(ConfigError::Missing(name));
      }
    }

    if self.mail_transport == MailTransport::Http
      && self.mail_relay_url.as_deref().is_none_or(str::is_empty)
    {
      return Err(ConfigError::Missing("mail_relay_url"));
    }

    if self.admin_username.is_some() != self.admin_password_hash.is_some() {
      return Err(ConfigError::PartialAdmin);
    }
    Ok(())
  }

  /// Admin credentials, when the admin API is enabled.
  pub fn admin_credentials(&self) -> Option<(&str, &str)> {
    Some((
      self.admin_username.as_deref()?,
      self.admin_password_hash.as_deref()?,
    ))
  }
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> Result<ServerConfig, ConfigError> {
    let settings = Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap();
    ServerConfig::from_settings(settings)
  }

  const MINIMAL: &str = r#"
submissions_table = "form_submissions"
forms_table = "forms"
email_from = "forms@example.com"
email_to = "ops@example.com"
"#;

  #[test]
  fn minimal_config_uses_defaults() {
    let cfg = parse(MINIMAL).unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.mail_transport, MailTransport::Log);
    assert!(cfg.admin_credentials().is_none());
  }

  #[test]
  fn missing_required_value_is_fatal() {
    let toml = MINIMAL.replace("email_to = \"ops@example.com\"", "");
    assert!(matches!(parse(&toml), Err(ConfigError::Source(_))));

    let toml = MINIMAL.replace("\"forms\"", "\"\"");
    assert!(matches!(parse(&toml), Err(ConfigError::Missing("forms_table"))));
  }

  #[test]
  fn http_transport_needs_a_relay() {
    let toml = format!("{MINIMAL}\nmail_transport = \"http\"\n");
    assert!(matches!(parse(&toml), Err(ConfigError::Missing("mail_relay_url"))));

    let toml = format!("{MINIMAL}\nmail_transport = \"http\"\nmail_relay_url = \"http://relay\"\n");
    assert_eq!(parse(&toml).unwrap().mail_transport, MailTransport::Http);
  }

  #[test]
  fn admin_credentials_come_in_pairs() {
    let toml = format!("{MINIMAL}\nadmin_username = \"admin\"\n");
    assert!(matches!(parse(&toml), Err(ConfigError::PartialAdmin)));

    let toml = format!("{MINIMAL}\nadmin_username = \"admin\"\nadmin_password_hash = \"$argon2id$x\"\n");
    assert_eq!(parse(&toml).unwrap().admin_credentials(), Some(("admin", "$argon2id$x")));
  }
}
