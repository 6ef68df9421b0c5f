//! The config-activation gate.
//!
//! `formId` becomes mandatory once the operator has configured at least one
//! form. The gate looks at the configuration table on first use and caches
//! the answer for its own lifetime; there is no invalidation path, so a table
//! populated after startup is only noticed by a fresh gate.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::store::ConfigStore;

/// Whether `formId` validation is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
  Active,
  Inactive,
}

impl GateState {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

/// Lazily resolved, process-lifetime [`GateState`].
pub struct ConfigGate<C> {
  store: Arc<C>,
  table: String,
  state: OnceCell<GateState>,
}

impl<C: ConfigStore> ConfigGate<C> {
  /// A gate that will inspect `table` in `store` on first use.
  pub fn new(store: Arc<C>, table: impl Into<String>) -> Self {
    Self {
      store,
      table: table.into(),
      state: OnceCell::new(),
    }
  }

  /// The cached state, or `None` while still unknown.
  pub fn peek(&self) -> Option<GateState> { self.state.get().copied() }

  /// Resolve the gate, querying the store only the first time.
  ///
  /// Concurrent first callers share a single query.
  pub async fn resolve(&self) -> GateState {
    *self.state.get_or_init(|| self.query()).await
  }

  async fn query(&self) -> GateState {
    let table = self.table.as_str();
    match self.store.table_exists(table).await {
      Ok(true) => {}
      Ok(false) => {
        tracing::info!(table, "form table does not exist; formId not required");
        return GateState::Inactive;
      }
      Err(e) => {
        tracing::warn!(table, error = %e, "error checking form table; formId not required");
        return GateState::Inactive;
      }
    }

    match self.store.table_is_empty(table).await {
      Ok(false) => {
        tracing::info!(table, "form table is populated; formId required");
        GateState::Active
      }
      Ok(true) => {
        tracing::info!(table, "form table is not populated; formId not required");
        GateState::Inactive
      }
      Err(e) => {
        tracing::warn!(table, error = %e, "error scanning form table; formId not required");
        GateState::Inactive
      }
    }
  }
}
