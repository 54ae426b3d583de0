/// Redis-backed revocation markers
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::cache::RevocationCache;
use crate::error::{Result, SessionError};

/// Key namespace for revocation markers, kept distinct from unrelated cache
/// usage sharing the same Redis.
const REVOKED_KEY_PREFIX: &str = "auth:revoked:token:";

pub struct RedisRevocationCache {
    redis: ConnectionManager,
}

impl RedisRevocationCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn key(refresh_id: Uuid) -> String {
        format!("{REVOKED_KEY_PREFIX}{refresh_id}")
    }
}

#[async_trait]
impl RevocationCache for RedisRevocationCache {
    async fn is_marked_revoked(&self, refresh_id: Uuid) -> Result<bool> {
        let mut redis = self.redis.clone();
        let exists: bool = redis::cmd("EXISTS")
            .arg(Self::key(refresh_id))
            .query_async(&mut redis)
            .await
            .map_err(|e| SessionError::Cache(e.to_string()))?;

        Ok(exists)
    }

    async fn mark_revoked(&self, refresh_id: Uuid, ttl_secs: u64) -> Result<()> {
        let mut redis = self.redis.clone();
        redis::cmd("SET")
            .arg(Self::key(refresh_id))
            .arg("1")
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut redis)
            .await
            .map_err(|e| SessionError::Cache(e.to_string()))?;

        tracing::debug!(jti = %refresh_id, ttl = ttl_secs, "revocation marker written");
        Ok(())
    }

    async fn mark_revoked_bulk(&self, entries: &[(Uuid, u64)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for (refresh_id, ttl_secs) in entries {
            pipe.cmd("SET")
                .arg(Self::key(*refresh_id))
                .arg("1")
                .arg("EX")
                .arg(*ttl_secs)
                .ignore();
        }

        let mut redis = self.redis.clone();
        pipe.query_async::<_, ()>(&mut redis)
            .await
            .map_err(|e| SessionError::Cache(e.to_string()))?;

        tracing::debug!(count = entries.len(), "bulk revocation markers written");
        Ok(())
    }
}
