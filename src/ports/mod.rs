//! Storage port for payment transactions.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{TransactionRecord, TransactionStatus};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("transaction {0} already exists")]
    DuplicateIdentifier(String),

    #[error("transaction {0} not found")]
    NotFound(String),

    #[error("transaction {identifier} is {actual}, expected {expected}")]
    Conflict {
        identifier: String,
        expected: TransactionStatus,
        actual: TransactionStatus,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::Storage(e.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Keyed storage with atomic conditional status updates.
///
/// The only mutation paths are `insert` and `compare_and_swap_status`.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persists a new record. Fails with `DuplicateIdentifier` if the identifier is taken.
    async fn insert(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord>;

    async fn get_by_identifier(&self, identifier: &str) -> RepositoryResult<TransactionRecord>;

    /// Sets `status = new` only if the stored status is still `expected`, as a single
    /// atomic step. A mismatch reports `Conflict` and writes nothing.
    async fn compare_and_swap_status(
        &self,
        identifier: &str,
        expected: TransactionStatus,
        new: TransactionStatus,
    ) -> RepositoryResult<TransactionRecord>;

    /// Most recent records first.
    async fn list_by_owner(&self, owner_id: i64, limit: i64)
        -> RepositoryResult<Vec<TransactionRecord>>;

    async fn health_check(&self) -> RepositoryResult<()>;
}
