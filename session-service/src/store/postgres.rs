/// Refresh token database operations
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, SessionError};
use crate::models::{NewRefreshToken, RefreshTokenRecord, RevokedReason};
use crate::store::RevocationStore;

pub struct PgRevocationStore {
    pool: PgPool,
}

impl PgRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    revoked_reason: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl TryFrom<RefreshTokenRow> for RefreshTokenRecord {
    type Error = SessionError;

    fn try_from(row: RefreshTokenRow) -> Result<Self> {
        let revoked_reason = row
            .revoked_reason
            .as_deref()
            .map(|reason| {
                RevokedReason::from_str(reason).map_err(|_| {
                    SessionError::Storage(format!("unknown revocation reason: {reason}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            issued_at: row.issued_at,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
            revoked_reason,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
        })
    }
}

#[async_trait]
impl RevocationStore for PgRevocationStore {
    async fn record(&self, token: NewRefreshToken) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, issued_at, expires_at, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .bind(token.ip_address)
        .bind(token.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                SessionError::DuplicateTokenId(token.id)
            }
            _ => SessionError::Storage(e.to_string()),
        })?;

        Ok(())
    }

    async fn find(&self, refresh_id: Uuid) -> Result<Option<RefreshTokenRecord>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT id, user_id, issued_at, expires_at, revoked_at, revoked_reason,
                   ip_address, user_agent
            FROM refresh_tokens
            WHERE id = $1
            "#,
        )
        .bind(refresh_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        row.map(RefreshTokenRecord::try_from).transpose()
    }

    async fn is_revoked(&self, refresh_id: Uuid) -> Result<bool> {
        let revoked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT revoked_at IS NOT NULL
            FROM refresh_tokens
            WHERE id = $1
            "#,
        )
        .bind(refresh_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(revoked.unwrap_or(false))
    }

    async fn revoke(&self, refresh_id: Uuid, reason: RevokedReason) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1, revoked_reason = $2
            WHERE id = $3 AND revoked_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(reason.as_str())
        .bind(refresh_id)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn bulk_revoke(&self, user_id: Uuid, reason: RevokedReason) -> Result<u64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1, revoked_reason = $2
            WHERE user_id = $3 AND revoked_at IS NULL AND expires_at > $1
            "#,
        )
        .bind(now)
        .bind(reason.as_str())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM refresh_tokens
            WHERE user_id = $1 AND revoked_at IS NULL AND expires_at > $2
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(ids)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE expires_at < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
