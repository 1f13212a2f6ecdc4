use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{KeyValueRepository, RepositoryError};

/// Process-local backend. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, RepositoryError> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::Database(format!("store lock poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get(
        &self,
        namespace: &str,
    ) -> Result<Option<String>, RepositoryError> {
        Ok(self.entries()?.get(namespace).cloned())
    }

    async fn put(
        &self,
        namespace: &str,
        payload: &str,
    ) -> Result<(), RepositoryError> {
        self.entries()?
            .insert(namespace.to_string(), payload.to_string());
        Ok(())
    }

    async fn delete(
        &self,
        namespace: &str,
    ) -> Result<(), RepositoryError> {
        self.entries()?
            .remove(namespace)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.entries()?.keys().cloned().collect())
    }
}

/// [`RepositoryFactory`] for the `"memory"` backend. The connection string
/// is ignored.
pub struct InMemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for InMemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn KeyValueRepository>, RepositoryError> {
        Ok(Box::new(InMemoryRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn get_missing_namespace_is_none() {
        let repo = InMemoryRepository::new();

        assert_eq!(repo.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_previous_payload() {
        let repo = InMemoryRepository::new();

        repo.put("ns", "first").await.unwrap();
        repo.put("ns", "second").await.unwrap();

        assert_eq!(repo.get("ns").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn delete_removes_namespace() {
        let repo = InMemoryRepository::new();
        repo.put("ns", "payload").await.unwrap();

        repo.delete("ns").await.unwrap();

        assert_eq!(repo.get("ns").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_missing_namespace_is_not_found() {
        let repo = InMemoryRepository::new();

        let result = repo.delete("ns").await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn list_namespaces_is_sorted() {
        let repo = InMemoryRepository::new();
        repo.put("b", "2").await.unwrap();
        repo.put("a", "1").await.unwrap();

        assert_eq!(repo.list_namespaces().await.unwrap(), vec!["a", "b"]);
    }
}
