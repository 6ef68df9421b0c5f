//! [`SqliteStore`]: the SQLite implementation of the formdrop store traits.

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use formdrop_core::{
  Fields, Submission,
  form::FormConfig,
  store::{ConfigStore, FormStore, SubmissionStore},
};

use crate::{
  Result,
  encode::{
    RawForm, decode_submission, encode_dt, encode_settings, encode_submission,
  },
  schema::{PRAGMAS, forms_ddl, quote_ident, submissions_ddl, validate_ident},
};

// ─── Table names ─────────────────────────────────────────────────────────────

/// Names of the two tables the store manages.
#[derive(Debug, Clone)]
pub struct TableNames {
  pub submissions: String,
  pub forms:       String,
}

impl TableNames {
  fn validate(&self) -> Result<()> {
    validate_ident(&self.submissions)?;
    validate_ident(&self.forms)
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A formdrop store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  tables: Arc<TableNames>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and create the submissions table.
  pub async fn open(path: impl AsRef<Path>, tables: TableNames) -> Result<Self> {
    tables.validate()?;
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, tables: Arc::new(tables) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory(tables: TableNames) -> Result<Self> {
    tables.validate()?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, tables: Arc::new(tables) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let ddl = submissions_ddl(&self.tables.submissions);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    tracing::debug!(table = %self.tables.submissions, "schema initialised");
    Ok(())
  }

  async fn ensure_forms_table(&self) -> Result<()> {
    let ddl = forms_ddl(&self.tables.forms);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    tracing::debug!(table = %self.tables.forms, "forms table ensured");
    Ok(())
  }

  /// Run a query returning submission JSON and decode every row.
  async fn query_submissions(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Submission>> {
    let rows: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    rows.iter().map(String::as_str).map(decode_submission).collect()
  }
}

// ─── ConfigStore impl ────────────────────────────────────────────────────────

impl ConfigStore for SqliteStore {
  type Error = crate::Error;

  async fn table_exists(&self, name: &str) -> Result<bool> {
    let name = name.to_owned();
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
              rusqlite::params![name],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn table_is_empty(&self, name: &str) -> Result<bool> {
    validate_ident(name)?;
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {})", quote_ident(name));
    let populated: bool = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;
    Ok(!populated)
  }
}

// ─── SubmissionStore impl ────────────────────────────────────────────────────

impl SubmissionStore for SqliteStore {
  type Error = crate::Error;

  async fn put_submission(&self, submission: &Submission) -> Result<()> {
    let id_str        = submission.id().to_string();
    let timestamp     = submission.timestamp().to_owned();
    let form_id       = submission.form_id_key();
    let source_ip     = submission.source_ip().to_owned();
    let item_json     = encode_submission(submission)?;
    let sql = format!(
      "INSERT OR REPLACE INTO {} (id, timestamp, form_id, source_ip, item_json)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      quote_ident(&self.tables.submissions)
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql,
          rusqlite::params![id_str, timestamp, form_id, source_ip, item_json],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>> {
    let sql = format!(
      "SELECT item_json FROM {} WHERE id = ?1 ORDER BY timestamp DESC LIMIT 1",
      quote_ident(&self.tables.submissions)
    );
    let mut found = self.query_submissions(sql, vec![id.to_string()]).await?;
    Ok(found.pop())
  }

  async fn submissions_for_form(&self, form_id: &str, limit: usize) -> Result<Vec<Submission>> {
    let sql = format!(
      "SELECT item_json FROM {} WHERE form_id = ?1 ORDER BY timestamp DESC LIMIT {limit}",
      quote_ident(&self.tables.submissions)
    );
    self.query_submissions(sql, vec![form_id.to_owned()]).await
  }

  async fn submissions_from_source(
    &self,
    form_id: &str,
    source_ip: &str,
  ) -> Result<Vec<Submission>> {
    let sql = format!(
      "SELECT item_json FROM {} WHERE form_id = ?1 AND source_ip = ?2 ORDER BY timestamp DESC",
      quote_ident(&self.tables.submissions)
    );
    self
      .query_submissions(sql, vec![form_id.to_owned(), source_ip.to_owned()])
      .await
  }
}

// ─── FormStore impl ──────────────────────────────────────────────────────────

impl FormStore for SqliteStore {
  type Error = crate::Error;

  async fn list_forms(&self, form_id: Option<&str>) -> Result<Vec<FormConfig>> {
    if !self.table_exists(&self.tables.forms).await? {
      return Ok(vec![]);
    }
    let table   = quote_ident(&self.tables.forms);
    let form_id = form_id.map(str::to_owned);

    let raws: Vec<RawForm> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(id) = form_id {
          let mut stmt = conn.prepare(&format!(
            "SELECT form_id, form_name, settings_json, created_at, updated_at
             FROM {table} WHERE form_id = ?1 ORDER BY form_id, form_name"
          ))?;
          stmt
            .query_map(rusqlite::params![id], RawForm::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT form_id, form_name, settings_json, created_at, updated_at
             FROM {table} ORDER BY form_id, form_name"
          ))?;
          stmt
            .query_map([], RawForm::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawForm::into_form).collect()
  }

  async fn get_form(&self, form_id: &str, form_name: &str) -> Result<Option<FormConfig>> {
    if !self.table_exists(&self.tables.forms).await? {
      return Ok(None);
    }
    let table     = quote_ident(&self.tables.forms);
    let form_id   = form_id.to_owned();
    let form_name = form_name.to_owned();

    let raw: Option<RawForm> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT form_id, form_name, settings_json, created_at, updated_at
                 FROM {table} WHERE form_id = ?1 AND form_name = ?2"
              ),
              rusqlite::params![form_id, form_name],
              RawForm::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawForm::into_form).transpose()
  }

  async fn put_form(&self, form: &FormConfig) -> Result<()> {
    self.ensure_forms_table().await?;
    let table         = quote_ident(&self.tables.forms);
    let form_id       = form.form_id.clone();
    let form_name     = form.form_name.clone();
    let settings_json = encode_settings(&form.settings)?;
    let created_at    = encode_dt(form.created_at);
    let updated_at    = encode_dt(form.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT OR REPLACE INTO {table}
               (form_id, form_name, settings_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)"
          ),
          rusqlite::params![form_id, form_name, settings_json, created_at, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_form(
    &self,
    form_id: &str,
    form_name: &str,
    settings: Fields,
  ) -> Result<Option<FormConfig>> {
    let Some(mut form) = self.get_form(form_id, form_name).await? else {
      return Ok(None);
    };
    form.settings   = settings;
    form.updated_at = Utc::now();
    self.put_form(&form).await?;
    Ok(Some(form))
  }

  async fn delete_form(&self, form_id: &str, form_name: &str) -> Result<bool> {
    if !self.table_exists(&self.tables.forms).await? {
      return Ok(false);
    }
    let table     = quote_ident(&self.tables.forms);
    let form_id   = form_id.to_owned();
    let form_name = form_name.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE form_id = ?1 AND form_name = ?2"),
          rusqlite::params![form_id, form_name],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
