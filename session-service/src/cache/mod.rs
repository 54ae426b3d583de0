/// Fast-path revocation cache
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

pub mod redis;

pub use self::redis::RedisRevocationCache;

/// Short-circuit for "is this identifier revoked?".
///
/// A marker, once present, is authoritative: it is written through
/// synchronously on every revoke path. Absence means "unknown", not "not
/// revoked", since the marker may simply not have been populated yet, and
/// callers fall through to the durable store. The cache is an accelerator,
/// never a correctness authority for the miss case.
#[async_trait]
pub trait RevocationCache: Send + Sync {
    async fn is_marked_revoked(&self, refresh_id: Uuid) -> Result<bool>;

    /// Write a revocation marker. The TTL must be at least the maximum
    /// refresh-token lifetime so the marker cannot expire while the token is
    /// still cryptographically valid.
    async fn mark_revoked(&self, refresh_id: Uuid, ttl_secs: u64) -> Result<()>;

    /// Batched marker write, used after a bulk revoke to avoid N sequential
    /// round trips.
    async fn mark_revoked_bulk(&self, entries: &[(Uuid, u64)]) -> Result<()>;
}
