//! formdrop server binary.
//!
//! Reads `formdrop.toml` (or the path specified with `--config`) layered under
//! `FORMDROP_*` environment variables, opens an in-process SQLite store, and
//! serves the submission-intake route over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```
//! cargo run -p formdrop-server --bin formdrop -- --hash-password
//! ```

use std::{
  net::SocketAddr,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use formdrop_core::{ConfigGate, Intake, notify::Notifier};
use formdrop_mail::{HttpMailer, LogMailer, Transport};
use formdrop_server::{
  AppState, ServerConfig,
  auth::AuthConfig,
  config::MailTransport,
};
use formdrop_store_sqlite::{SqliteStore, TableNames};
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "formdrop submission server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "formdrop.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path, TableNames {
    submissions: server_cfg.submissions_table.clone(),
    forms:       server_cfg.forms_table.clone(),
  })
  .await
  .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  let transport = match server_cfg.mail_transport {
    MailTransport::Http => {
      let url = server_cfg
        .mail_relay_url
        .clone()
        .context("mail_relay_url is required for the http transport")?;
      tracing::info!(%url, "delivering notifications through HTTP relay");
      Transport::Http(
        HttpMailer::new(url, server_cfg.mail_relay_token.clone())
          .context("failed to build mail relay client")?,
      )
    }
    MailTransport::Log => {
      tracing::warn!("mail_transport = \"log\"; notifications are only logged");
      Transport::Log(LogMailer)
    }
  };

  let intake = Intake::new(
    ConfigGate::new(store.clone(), server_cfg.forms_table.clone()),
    store.clone(),
    server_cfg.submissions_table.clone(),
    Arc::new(transport),
    Notifier::new(server_cfg.email_from.clone(), server_cfg.email_to.clone()),
  );

  let auth = server_cfg
    .admin_credentials()
    .map(|(username, password_hash)| {
      Arc::new(AuthConfig {
        username:      username.to_owned(),
        password_hash: password_hash.to_owned(),
      })
    });
  if auth.is_none() {
    tracing::info!("admin credentials not configured; admin API disabled");
  }

  let state = AppState { intake: Arc::new(intake), store, auth };

  let app = formdrop_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
