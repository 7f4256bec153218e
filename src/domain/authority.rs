//! Authority (external transaction identifier) generation.

use uuid::Uuid;

/// Produces opaque, unpredictable transaction authorities.
pub trait AuthorityGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: 122 bits of OS randomness from a v4 UUID, rendered as
/// 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAuthority;

impl AuthorityGenerator for RandomAuthority {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
