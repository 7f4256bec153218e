//! Transaction lifecycle: creation, verification and failure reporting.

use bigdecimal::BigDecimal;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{
    AuthorityGenerator, CurrentUser, TransactionHandle, TransactionRecord, TransactionStatus,
    VerificationOutcome,
};
use crate::ports::{RepositoryError, TransactionRepository};
use crate::validation::{self, ValidationError};

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transaction {0} not found")]
    NotFound(String),

    #[error("could not allocate a unique transaction authority")]
    AuthorityExhausted,

    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(identifier) => ServiceError::NotFound(identifier),
            other => ServiceError::Storage(other),
        }
    }
}

pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
    authorities: Arc<dyn AuthorityGenerator>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepository>,
        authorities: Arc<dyn AuthorityGenerator>,
    ) -> Self {
        Self {
            repository,
            authorities,
        }
    }

    /// Creates a `Pending` transaction owned by `user` and returns its authority.
    pub async fn create_transaction(
        &self,
        user: &CurrentUser,
        amount: BigDecimal,
    ) -> Result<TransactionHandle, ServiceError> {
        validation::validate_identity(user)?;
        validation::validate_amount(&amount)?;
        let amount = amount.with_scale(0);

        // One regeneration on collision; a second collision means the generator is broken.
        for attempt in 0..2 {
            let record =
                TransactionRecord::pending(self.authorities.generate(), user.id, amount.clone());

            match self.repository.insert(&record).await {
                Ok(inserted) => {
                    tracing::info!(
                        authority = %inserted.identifier,
                        owner_id = inserted.owner_id,
                        amount = %inserted.amount,
                        "Transaction created"
                    );
                    return Ok(TransactionHandle {
                        authority: inserted.identifier,
                        status: inserted.status,
                    });
                }
                Err(RepositoryError::DuplicateIdentifier(identifier)) => {
                    tracing::warn!(
                        authority = %identifier,
                        attempt,
                        "Generated authority already exists, regenerating"
                    );
                }
                Err(e) => return Err(ServiceError::Storage(e)),
            }
        }

        tracing::error!(owner_id = user.id, "Authority generation collided twice");
        Err(ServiceError::AuthorityExhausted)
    }

    /// Moves a `Pending` transaction to `Verified`. Repeated or concurrent calls for the
    /// same authority observe `AlreadyFinalized` instead of transitioning again.
    pub async fn verify_transaction(
        &self,
        authority: &str,
    ) -> Result<VerificationOutcome, ServiceError> {
        self.finalize(authority, TransactionStatus::Verified).await
    }

    /// Moves a `Pending` transaction to `Failed`, with the same race-safety as verify.
    pub async fn fail_transaction(
        &self,
        authority: &str,
    ) -> Result<VerificationOutcome, ServiceError> {
        self.finalize(authority, TransactionStatus::Failed).await
    }

    async fn finalize(
        &self,
        authority: &str,
        target: TransactionStatus,
    ) -> Result<VerificationOutcome, ServiceError> {
        validation::validate_authority(authority)?;
        if !TransactionStatus::Pending.can_transition_to(target) {
            return Err(ServiceError::Validation(ValidationError::new(
                "status",
                format!("cannot finalize a transaction as {}", target),
            )));
        }

        let current = self.repository.get_by_identifier(authority).await?;
        if current.status.is_terminal() {
            tracing::info!(
                authority,
                status = %current.status,
                requested = %target,
                "Transaction already finalized"
            );
            return Ok(VerificationOutcome::AlreadyFinalized(current.status));
        }

        match self
            .repository
            .compare_and_swap_status(authority, TransactionStatus::Pending, target)
            .await
        {
            Ok(record) => {
                tracing::info!(authority, status = %record.status, "Transaction finalized");
                Ok(match target {
                    TransactionStatus::Failed => VerificationOutcome::Failed(record),
                    _ => VerificationOutcome::Verified(record),
                })
            }
            Err(RepositoryError::Conflict { .. }) => {
                // Lost the race to a concurrent caller; report whatever state won.
                let settled = self.repository.get_by_identifier(authority).await?;
                tracing::info!(
                    authority,
                    status = %settled.status,
                    requested = %target,
                    "Concurrent finalization observed"
                );
                Ok(VerificationOutcome::AlreadyFinalized(settled.status))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the transaction if it belongs to `user`. Other owners' transactions are
    /// reported as not found.
    pub async fn get_transaction(
        &self,
        user: &CurrentUser,
        authority: &str,
    ) -> Result<TransactionRecord, ServiceError> {
        validation::validate_identity(user)?;
        validation::validate_authority(authority)?;

        let record = self.repository.get_by_identifier(authority).await?;
        if record.owner_id != user.id {
            return Err(ServiceError::NotFound(authority.to_string()));
        }

        Ok(record)
    }

    /// Unscoped lookup for operator tooling.
    pub async fn lookup_transaction(
        &self,
        authority: &str,
    ) -> Result<TransactionRecord, ServiceError> {
        validation::validate_authority(authority)?;
        Ok(self.repository.get_by_identifier(authority).await?)
    }

    pub async fn list_transactions(
        &self,
        user: &CurrentUser,
        limit: Option<i64>,
    ) -> Result<Vec<TransactionRecord>, ServiceError> {
        validation::validate_identity(user)?;

        let limit = limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        Ok(self.repository.list_by_owner(user.id, limit).await?)
    }
}
