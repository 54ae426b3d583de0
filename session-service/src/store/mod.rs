/// Durable revocation store: source of truth for refresh-token lifecycle state
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewRefreshToken, RefreshTokenRecord, RevokedReason};

pub mod postgres;

pub use postgres::PgRevocationStore;

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Insert a new active record. Fails with `DuplicateTokenId` if the id
    /// already exists; that indicates a broken generator, not a retryable
    /// condition.
    async fn record(&self, token: NewRefreshToken) -> Result<()>;

    /// Fetch a record for audit/diagnostics.
    async fn find(&self, refresh_id: Uuid) -> Result<Option<RefreshTokenRecord>>;

    /// `true` if the record exists with `revoked_at` set. A record that does
    /// not exist returns `false`: signature and expiry checks already guard
    /// validity, so "unknown" is treated as "not revoked" for compatibility
    /// with tokens predating this store.
    async fn is_revoked(&self, refresh_id: Uuid) -> Result<bool>;

    /// Set `revoked_at`/`revoked_reason` if the record exists and is still
    /// active. Returns `true` only when this call performed the transition;
    /// a missing or already-revoked record is a no-op returning `false`.
    async fn revoke(&self, refresh_id: Uuid, reason: RevokedReason) -> Result<bool>;

    /// Revoke every currently-active record for a user in one atomic
    /// statement; returns the number of records affected.
    async fn bulk_revoke(&self, user_id: Uuid, reason: RevokedReason) -> Result<u64>;

    /// Identifiers of all active (unrevoked, unexpired) records for a user.
    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Delete records whose `expires_at` is in the past, regardless of
    /// revocation state. Storage reclamation only; revocation, not deletion,
    /// is what makes a token unusable.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}
