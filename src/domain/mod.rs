pub mod authority;
pub mod transaction;

pub use authority::{AuthorityGenerator, RandomAuthority};
pub use transaction::{
    TransactionHandle, TransactionRecord, TransactionStatus, UnknownStatus, VerificationOutcome,
};

/// Identity of the authenticated caller, as resolved by the upstream auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}
