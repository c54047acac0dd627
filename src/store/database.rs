use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Row, SqlitePool};
use tracing::{debug, info};

use super::{PersistenceStore, StoreError, StoreResult};
use crate::record::{Record, Selector};

/// Durable record store backed by SQLite. Each update runs in its own
/// transaction: commit on success, rollback on any failure.
pub struct DatabaseStore {
    pool: SqlitePool,
}

impl DatabaseStore {
    /// Connect, creating the database file and running migrations when
    /// configured to.
    pub async fn connect(url: &str, max_connections: u32, auto_migrate: bool) -> Result<Self> {
        if !sqlx::Sqlite::database_exists(url).await? {
            info!("Creating database at {}", url);
            sqlx::Sqlite::create_database(url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        if auto_migrate {
            info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database migrations completed");
        }

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Seed a row for a selector, the shape an add action would leave behind.
    pub async fn insert(&self, selector: &Selector, record: &Record) -> Result<()> {
        let payload = serde_json::to_string(record)?;
        sqlx::query(
            r#"
            INSERT INTO records (selector, data, updated_at)
            VALUES (?1, ?2, datetime('now'))
            "#,
        )
        .bind(selector.as_str())
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn fetch(&self, selector: &Selector) -> Result<Option<Record>> {
        let row = sqlx::query(
            r#"
            SELECT data FROM records WHERE selector = ?1
            "#,
        )
        .bind(selector.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let data: String = row.get("data");
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PersistenceStore for DatabaseStore {
    async fn update(&self, selector: &Selector, record: &Record) -> StoreResult<()> {
        let payload =
            serde_json::to_string(record).map_err(|e| StoreError::Fatal(e.to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Fatal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE records SET data = ?1, updated_at = datetime('now')
            WHERE selector = ?2
            "#,
        )
        .bind(&payload)
        .bind(selector.as_str())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                tx.commit()
                    .await
                    .map_err(|e| StoreError::Fatal(e.to_string()))?;
                debug!(selector = %selector, "record row committed");
                Ok(())
            }
            Ok(_) => {
                let _ = tx.rollback().await;
                Err(StoreError::Fatal(format!(
                    "no stored row matches selector '{selector}'"
                )))
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(classify(err))
            }
        }
    }

    fn backend(&self) -> &'static str {
        "database"
    }
}

/// Constraint violations are the user's to fix; everything else is fatal.
fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_check_violation()
                || db.is_foreign_key_violation() =>
        {
            StoreError::User(db.message().to_string())
        }
        _ => StoreError::Fatal(err.to_string()),
    }
}
