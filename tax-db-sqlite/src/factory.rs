use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use tax_core::db::{DbConfig, KeyValueRepository, RepositoryError, RepositoryFactory};
use tracing::info;

use crate::repository::SqliteRepository;

const IN_MEMORY: &str = ":memory:";

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`tax_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use tax_core::db::RepositoryRegistry;
/// use tax_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

impl SqliteRepositoryFactory {
    async fn connect(connection_string: &str) -> Result<SqliteRepository, RepositoryError> {
        if connection_string == IN_MEMORY {
            // Every connection to `sqlite::memory:` is a separate database.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| RepositoryError::Connection(e.to_string()))?;
            return Ok(SqliteRepository::new_with_pool(pool).await);
        }

        SqliteRepository::new(&format!("sqlite:{connection_string}?mode=rwc"))
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))
    }
}

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"taxai.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn KeyValueRepository>, RepositoryError> {
        let repo = Self::connect(&config.connection_string).await?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(database = %config.connection_string, "sqlite repository ready");
        Ok(Box::new(repo))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tax_core::db::{DbConfig, RepositoryFactory};

    use super::SqliteRepositoryFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteRepositoryFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn creates_in_memory_repository() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let repo = SqliteRepositoryFactory
            .create(&config)
            .await
            .expect("failed to create in-memory repository");

        repo.put("ns", "payload").await.unwrap();
        assert_eq!(repo.get("ns").await.unwrap(), Some("payload".to_string()));
    }

    #[tokio::test]
    async fn creates_database_file_when_missing() {
        let path = std::env::temp_dir().join(format!("taxai-factory-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: path.display().to_string(),
        };

        let repo = SqliteRepositoryFactory.create(&config).await.unwrap();
        repo.put("ns", "payload").await.unwrap();
        drop(repo);

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
