/// Test fixtures: in-memory doubles for the store, cache, and directory,
/// plus helpers to assemble a service around them.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jwt_tokens::{TokenConfig, TokenIssuer, UserRole};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::cache::RevocationCache;
use crate::directory::UserDirectory;
use crate::error::{Result, SessionError};
use crate::models::{NewRefreshToken, RefreshTokenRecord, RevokedReason, UserAccount, UserStatus};
use crate::security::{hash_password, Argon2PasswordVerifier};
use crate::services::SessionService;
use crate::store::RevocationStore;

pub const TEST_EMAIL: &str = "user@x.com";
pub const TEST_PASSWORD: &str = "Password123";

pub const TEST_SECRET: &str = "unit-test-secret-with-enough-entropy";
pub const TEST_ISSUER: &str = "session-service";
pub const TEST_AUDIENCE: &str = "api";

#[derive(Default)]
pub struct MemoryRevocationStore {
    records: Mutex<HashMap<Uuid, RefreshTokenRecord>>,
}

impl MemoryRevocationStore {
    /// Insert a record directly, bypassing issuance. For expiry tests.
    pub fn insert_raw(&self, record: RefreshTokenRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn get(&self, refresh_id: Uuid) -> Option<RefreshTokenRecord> {
        self.records.lock().unwrap().get(&refresh_id).cloned()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn record(&self, token: NewRefreshToken) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&token.id) {
            return Err(SessionError::DuplicateTokenId(token.id));
        }
        records.insert(
            token.id,
            RefreshTokenRecord {
                id: token.id,
                user_id: token.user_id,
                issued_at: token.issued_at,
                expires_at: token.expires_at,
                revoked_at: None,
                revoked_reason: None,
                ip_address: token.ip_address,
                user_agent: token.user_agent,
            },
        );
        Ok(())
    }

    async fn find(&self, refresh_id: Uuid) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.get(refresh_id))
    }

    async fn is_revoked(&self, refresh_id: Uuid) -> Result<bool> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&refresh_id)
            .is_some_and(|r| r.revoked_at.is_some()))
    }

    async fn revoke(&self, refresh_id: Uuid, reason: RevokedReason) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&refresh_id) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(Utc::now());
                record.revoked_reason = Some(reason);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn bulk_revoke(&self, user_id: Uuid, reason: RevokedReason) -> Result<u64> {
        let now = Utc::now();
        let mut records = self.records.lock().unwrap();
        let mut count = 0;
        for record in records.values_mut() {
            if record.user_id == user_id && record.is_active(now) {
                record.revoked_at = Some(now);
                record.revoked_reason = Some(reason);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let now = Utc::now();
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id && r.is_active(now))
            .map(|r| r.id)
            .collect())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|_, r| r.expires_at >= now);
        Ok((before - records.len()) as u64)
    }
}

/// Marker map keyed by refresh id, remembering the TTL each write carried so
/// tests can assert marker lifetimes.
#[derive(Default)]
pub struct MemoryRevocationCache {
    markers: Mutex<HashMap<Uuid, u64>>,
}

impl MemoryRevocationCache {
    pub fn contains(&self, refresh_id: Uuid) -> bool {
        self.markers.lock().unwrap().contains_key(&refresh_id)
    }

    /// TTL the most recent marker write for this id carried.
    pub fn ttl_of(&self, refresh_id: Uuid) -> Option<u64> {
        self.markers.lock().unwrap().get(&refresh_id).copied()
    }

    /// Simulate marker eviction.
    pub fn clear(&self) {
        self.markers.lock().unwrap().clear();
    }
}

#[async_trait]
impl RevocationCache for MemoryRevocationCache {
    async fn is_marked_revoked(&self, refresh_id: Uuid) -> Result<bool> {
        Ok(self.contains(refresh_id))
    }

    async fn mark_revoked(&self, refresh_id: Uuid, ttl_secs: u64) -> Result<()> {
        self.markers.lock().unwrap().insert(refresh_id, ttl_secs);
        Ok(())
    }

    async fn mark_revoked_bulk(&self, entries: &[(Uuid, u64)]) -> Result<()> {
        let mut markers = self.markers.lock().unwrap();
        for (refresh_id, ttl_secs) in entries {
            markers.insert(*refresh_id, *ttl_secs);
        }
        Ok(())
    }
}

/// Cache double whose every operation fails, for outage-degradation tests.
#[derive(Default)]
pub struct FailingRevocationCache;

#[async_trait]
impl RevocationCache for FailingRevocationCache {
    async fn is_marked_revoked(&self, _refresh_id: Uuid) -> Result<bool> {
        Err(SessionError::Cache("cache unreachable".to_string()))
    }

    async fn mark_revoked(&self, _refresh_id: Uuid, _ttl_secs: u64) -> Result<()> {
        Err(SessionError::Cache("cache unreachable".to_string()))
    }

    async fn mark_revoked_bulk(&self, _entries: &[(Uuid, u64)]) -> Result<()> {
        Err(SessionError::Cache("cache unreachable".to_string()))
    }
}

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<HashMap<Uuid, UserAccount>>,
}

impl MemoryUserDirectory {
    pub fn add_user(&self, email: &str, password: &str, role: UserRole, status: UserStatus) -> Uuid {
        let user = UserAccount {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
            status,
            password_hash: hash_password(password).expect("test password hashes"),
            last_login_at: None,
        };
        let id = user.id;
        self.users.lock().unwrap().insert(id, user);
        id
    }

    pub fn set_status(&self, user_id: Uuid, status: UserStatus) {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.status = status;
        }
    }

    pub fn last_login_of(&self, user_id: Uuid) -> Option<DateTime<Utc>> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .and_then(|u| u.last_login_at)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }
}

pub fn test_token_issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(TokenConfig::new(
        TEST_SECRET,
        TEST_ISSUER,
        TEST_AUDIENCE,
    )))
}

pub struct TestHarness {
    pub service: SessionService,
    pub store: Arc<MemoryRevocationStore>,
    pub cache: Arc<MemoryRevocationCache>,
    pub directory: Arc<MemoryUserDirectory>,
    pub issuer: Arc<TokenIssuer>,
}

pub fn test_harness() -> TestHarness {
    let store = Arc::new(MemoryRevocationStore::default());
    let cache = Arc::new(MemoryRevocationCache::default());
    let directory = Arc::new(MemoryUserDirectory::default());
    let issuer = test_token_issuer();

    let service = SessionService::new(
        directory.clone(),
        Arc::new(Argon2PasswordVerifier),
        store.clone(),
        cache.clone(),
        issuer.clone(),
    );

    TestHarness {
        service,
        store,
        cache,
        directory,
        issuer,
    }
}

/// Harness wired with the failing cache double.
pub fn test_harness_with_failing_cache() -> (SessionService, Arc<MemoryRevocationStore>, Arc<MemoryUserDirectory>) {
    let store = Arc::new(MemoryRevocationStore::default());
    let directory = Arc::new(MemoryUserDirectory::default());

    let service = SessionService::new(
        directory.clone(),
        Arc::new(Argon2PasswordVerifier),
        store.clone(),
        Arc::new(FailingRevocationCache),
        test_token_issuer(),
    );

    (service, store, directory)
}
