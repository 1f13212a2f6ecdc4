//! Calculation history, newest first, persisted as one JSON blob.
//!
//! The whole collection lives under [`HISTORY_NAMESPACE`] in a
//! [`KeyValueRepository`]. It is read once by [`HistoryStore::open`] and
//! rewritten in full after every change.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, info};

use crate::db::{KeyValueRepository, RepositoryError};
use crate::models::{CompanyType, Sector, TaxCalculation};

/// Key under which the serialized history is stored.
pub const HISTORY_NAMESPACE: &str = "taxai-calculations";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("history payload is not valid: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Criteria for narrowing the history list. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the client name.
    pub name_contains: Option<String>,
    pub company_type: Option<CompanyType>,
    pub sector: Option<Sector>,
}

impl HistoryFilter {
    pub fn matches(
        &self,
        calculation: &TaxCalculation,
    ) -> bool {
        let client = &calculation.client;

        let name_matches = self.name_contains.as_deref().is_none_or(|needle| {
            client
                .name
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });
        let type_matches = self.company_type.is_none_or(|t| t == client.company_type);
        let sector_matches = self.sector.is_none_or(|s| s == client.sector);

        name_matches && type_matches && sector_matches
    }
}

/// Ordered collection of past calculations backed by a key-value store.
///
/// Mutating methods take `&mut self`, so there is exactly one writer at a
/// time and insertion order is preserved. A change whose save fails is
/// undone, so the records always mirror what was last stored.
pub struct HistoryStore {
    repo: Box<dyn KeyValueRepository>,
    records: VecDeque<TaxCalculation>,
}

impl HistoryStore {
    /// Loads the persisted history. A missing blob yields an empty history.
    pub async fn open(repo: Box<dyn KeyValueRepository>) -> Result<Self, HistoryError> {
        let records = match repo.get(HISTORY_NAMESPACE).await? {
            Some(payload) => serde_json::from_str::<VecDeque<TaxCalculation>>(&payload)?,
            None => VecDeque::new(),
        };

        info!(records = records.len(), "history loaded");
        Ok(Self { repo, records })
    }

    /// Adds `calculation` as the most recent record and persists.
    pub async fn append(
        &mut self,
        calculation: TaxCalculation,
    ) -> Result<(), HistoryError> {
        debug!(id = %calculation.id, "appending calculation to history");
        self.records.push_front(calculation);
        if let Err(e) = self.save().await {
            self.records.pop_front();
            return Err(e);
        }
        Ok(())
    }

    /// Removes the record with `id`. Returns `false` when there was none.
    pub async fn remove(
        &mut self,
        id: &str,
    ) -> Result<bool, HistoryError> {
        let Some(index) = self.records.iter().position(|c| c.id == id) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.save().await {
            if let Some(record) = removed {
                self.records.insert(index, record);
            }
            return Err(e);
        }
        Ok(true)
    }

    /// Drops every record and persists the empty history.
    pub async fn clear(&mut self) -> Result<(), HistoryError> {
        let previous = std::mem::take(&mut self.records);
        if let Err(e) = self.save().await {
            self.records = previous;
            return Err(e);
        }
        Ok(())
    }

    /// All records, newest first.
    pub fn list(&self) -> impl Iterator<Item = &TaxCalculation> {
        self.records.iter()
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&TaxCalculation> {
        self.records.iter().find(|c| c.id == id)
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Option<&TaxCalculation> {
        self.records.front()
    }

    /// Records matching `filter`, newest first.
    pub fn search<'a>(
        &'a self,
        filter: &'a HistoryFilter,
    ) -> impl Iterator<Item = &'a TaxCalculation> + 'a {
        self.records.iter().filter(move |c| filter.matches(c))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    async fn save(&self) -> Result<(), HistoryError> {
        let payload = serde_json::to_string(&self.records)?;
        self.repo.put(HISTORY_NAMESPACE, &payload).await?;
        info!(records = self.records.len(), "history saved");
        Ok(())
    }
}
