//! In-memory implementation of TransactionRepository.
//!
//! Backed by a `DashMap`, whose per-shard write lock makes the status check and the
//! status write in `compare_and_swap_status` one indivisible step. Guards are only
//! held inside synchronous blocks, never across an `.await`.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{TransactionRecord, TransactionStatus};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    records: DashMap<String, TransactionRecord>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
        match self.records.entry(record.identifier.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::DuplicateIdentifier(
                record.identifier.clone(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record.clone())
            }
        }
    }

    async fn get_by_identifier(&self, identifier: &str) -> RepositoryResult<TransactionRecord> {
        self.records
            .get(identifier)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RepositoryError::NotFound(identifier.to_string()))
    }

    async fn compare_and_swap_status(
        &self,
        identifier: &str,
        expected: TransactionStatus,
        new: TransactionStatus,
    ) -> RepositoryResult<TransactionRecord> {
        let mut entry = self
            .records
            .get_mut(identifier)
            .ok_or_else(|| RepositoryError::NotFound(identifier.to_string()))?;

        let record = entry.value_mut();
        if record.status != expected {
            return Err(RepositoryError::Conflict {
                identifier: identifier.to_string(),
                expected,
                actual: record.status,
            });
        }

        record.status = new;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        let mut owned: Vec<TransactionRecord> = self
            .records
            .iter()
            .filter(|entry| entry.value().owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(owned)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
