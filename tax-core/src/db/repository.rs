use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// A namespaced blob store. Each namespace holds one opaque payload that is
/// replaced wholesale on every write.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Payload stored under `namespace`, or `None` if nothing was written yet.
    async fn get(
        &self,
        namespace: &str,
    ) -> Result<Option<String>, RepositoryError>;

    /// Stores `payload` under `namespace`, replacing any previous value.
    async fn put(
        &self,
        namespace: &str,
        payload: &str,
    ) -> Result<(), RepositoryError>;

    /// Removes `namespace`. Fails with [`RepositoryError::NotFound`] if it
    /// does not exist.
    async fn delete(
        &self,
        namespace: &str,
    ) -> Result<(), RepositoryError>;

    /// Every namespace holding a payload, sorted alphabetically.
    async fn list_namespaces(&self) -> Result<Vec<String>, RepositoryError>;
}
