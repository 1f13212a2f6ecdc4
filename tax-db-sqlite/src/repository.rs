use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, sqlite::SqlitePool};
use tax_core::db::{KeyValueRepository, RepositoryError};
use tracing::debug;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[async_trait]
impl KeyValueRepository for SqliteRepository {
    async fn get(
        &self,
        namespace: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT payload FROM kv_store WHERE namespace = ?")
            .bind(namespace)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(|r| r.try_get::<String, _>("payload"))
            .transpose()
            .map_err(db_error)
    }

    async fn put(
        &self,
        namespace: &str,
        payload: &str,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO kv_store (namespace, payload, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(namespace) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at",
        )
        .bind(namespace)
        .bind(payload)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        debug!(namespace, bytes = payload.len(), "payload stored");
        Ok(())
    }

    async fn delete(
        &self,
        namespace: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE namespace = ?")
            .bind(namespace)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT namespace FROM kv_store ORDER BY namespace")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter()
            .map(|r| r.try_get::<String, _>("namespace"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)
    }
}
