//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{TransactionRecord, TransactionStatus};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const RETURNING_COLUMNS: &str = "identifier, owner_id, amount, status, created_at, updated_at";

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO payment_transactions (
                identifier, owner_id, amount, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RETURNING_COLUMNS}
            "#
        ))
        .bind(&record.identifier)
        .bind(record.owner_id)
        .bind(&record.amount)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::DuplicateIdentifier(record.identifier.clone())
            }
            other => RepositoryError::from(other),
        })?;

        row.into_domain()
    }

    async fn get_by_identifier(&self, identifier: &str) -> RepositoryResult<TransactionRecord> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {RETURNING_COLUMNS} FROM payment_transactions WHERE identifier = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(identifier.to_string()))?
            .into_domain()
    }

    async fn compare_and_swap_status(
        &self,
        identifier: &str,
        expected: TransactionStatus,
        new: TransactionStatus,
    ) -> RepositoryResult<TransactionRecord> {
        // The status guard in the WHERE clause makes this a single conditional write;
        // concurrent callers serialize on the row lock and only one sees a match.
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE payment_transactions
            SET status = $3, updated_at = NOW()
            WHERE identifier = $1 AND status = $2
            RETURNING {RETURNING_COLUMNS}
            "#
        ))
        .bind(identifier)
        .bind(expected.as_str())
        .bind(new.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => row.into_domain(),
            None => {
                let current = self.get_by_identifier(identifier).await?;
                Err(RepositoryError::Conflict {
                    identifier: identifier.to_string(),
                    expected,
                    actual: current.status,
                })
            }
        }
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        limit: i64,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {RETURNING_COLUMNS} FROM payment_transactions
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    identifier: String,
    owner_id: i64,
    amount: bigdecimal::BigDecimal,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<TransactionRecord> {
        let status = self
            .status
            .parse::<TransactionStatus>()
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        Ok(TransactionRecord {
            identifier: self.identifier,
            owner_id: self.owner_id,
            amount: self.amount,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
