use std::path::Path;

use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;
use trellis_trigger::StoredTrigger;

use crate::{StoreError, TriggerStore};

/// A stored trigger as read from the `triggers` table.
#[derive(Debug, FromRow)]
struct TriggerRow {
  id: String,
  workflow_definition_id: String,
  name: String,
  activity_id: String,
  hash: Option<String>,
  data: Option<String>,
}

impl From<TriggerRow> for StoredTrigger {
  fn from(row: TriggerRow) -> Self {
    Self {
      id: row.id,
      workflow_definition_id: row.workflow_definition_id,
      name: row.name,
      activity_id: row.activity_id,
      hash: row.hash,
      data: row.data,
    }
  }
}

/// SQLite-based trigger store.
pub struct SqliteTriggerStore {
  pool: SqlitePool,
}

impl SqliteTriggerStore {
  /// Create a new SQLite store with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Open (creating if missing) a database file and run migrations.
  pub async fn open(path: &Path) -> Result<Self, StoreError> {
    let options = SqliteConnectOptions::new()
      .filename(path)
      .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    let store = Self::new(pool);
    store.migrate().await?;
    Ok(store)
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), StoreError> {
    sqlx::migrate!("../../migrations").run(&self.pool).await?;
    Ok(())
  }
}

#[async_trait]
impl TriggerStore for SqliteTriggerStore {
  async fn find_by_definition_id(
    &self,
    workflow_definition_id: &str,
  ) -> Result<Vec<StoredTrigger>, StoreError> {
    let rows: Vec<TriggerRow> = sqlx::query_as(
      r#"
            SELECT id, workflow_definition_id, name, activity_id, hash, data
            FROM triggers
            WHERE workflow_definition_id = ?
            ORDER BY rowid ASC
            "#,
    )
    .bind(workflow_definition_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(StoredTrigger::from).collect())
  }

  async fn find_by_name(&self, name: &str) -> Result<Vec<StoredTrigger>, StoreError> {
    let rows: Vec<TriggerRow> = sqlx::query_as(
      r#"
            SELECT id, workflow_definition_id, name, activity_id, hash, data
            FROM triggers
            WHERE name = ?
            ORDER BY rowid ASC
            "#,
    )
    .bind(name)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(StoredTrigger::from).collect())
  }

  async fn delete_by_definition_id(&self, workflow_definition_id: &str) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM triggers WHERE workflow_definition_id = ?")
      .bind(workflow_definition_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected())
  }

  async fn replace(
    &self,
    removed: &[StoredTrigger],
    added: &[StoredTrigger],
  ) -> Result<(), StoreError> {
    if removed.is_empty() && added.is_empty() {
      return Ok(());
    }

    let mut tx = self.pool.begin().await?;

    for trigger in removed {
      sqlx::query("DELETE FROM triggers WHERE id = ?")
        .bind(&trigger.id)
        .execute(&mut *tx)
        .await?;
    }

    for trigger in added {
      sqlx::query(
        r#"
            INSERT INTO triggers (id, workflow_definition_id, name, activity_id, hash, data)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
      )
      .bind(&trigger.id)
      .bind(&trigger.workflow_definition_id)
      .bind(&trigger.name)
      .bind(&trigger.activity_id)
      .bind(&trigger.hash)
      .bind(&trigger.data)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;

    debug!(
      removed = removed.len(),
      added = added.len(),
      "triggers_replaced"
    );
    Ok(())
  }
}
