//! Payment transaction domain entity.
//! Framework-agnostic representation of a payment transaction and its lifecycle.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle state of a payment transaction.
///
/// `Pending` is the only non-terminal state. A transaction leaves it exactly once,
/// either to `Verified` or to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Verified,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Verified => "verified",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Verified)
                | (TransactionStatus::Pending, TransactionStatus::Failed)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "verified" => Ok(TransactionStatus::Verified),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Domain entity representing a payment transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub identifier: String,
    pub owner_id: i64,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Builds a fresh `Pending` record. Callers are expected to have validated `amount`.
    pub fn pending(identifier: String, owner_id: i64, amount: BigDecimal) -> Self {
        let now = Utc::now();
        Self {
            identifier,
            owner_id,
            amount,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What the caller gets back after creating a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle {
    pub authority: String,
    pub status: TransactionStatus,
}

/// Result of a verification or failure report.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    /// This call moved the transaction from `Pending` to `Verified`.
    Verified(TransactionRecord),
    /// This call moved the transaction from `Pending` to `Failed`.
    Failed(TransactionRecord),
    /// The transaction was already terminal; nothing was written.
    AlreadyFinalized(TransactionStatus),
}

impl VerificationOutcome {
    pub fn status(&self) -> TransactionStatus {
        match self {
            VerificationOutcome::Verified(record) | VerificationOutcome::Failed(record) => {
                record.status
            }
            VerificationOutcome::AlreadyFinalized(status) => *status,
        }
    }

    pub fn transitioned(&self) -> bool {
        !matches!(self, VerificationOutcome::AlreadyFinalized(_))
    }
}
