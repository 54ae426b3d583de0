use chrono::Utc;
use jwt_tokens::{IssuedTokens, TokenIssuer};
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::RevocationCache;
use crate::directory::{normalize_email, UserDirectory};
use crate::error::{Result, SessionError};
use crate::models::{
    AuthTokens, LoginOutcome, NewRefreshToken, RevokedReason, SessionMetadata, UserProfile,
};
use crate::security::PasswordVerifier;
use crate::store::RevocationStore;

/// Orchestrates login, refresh-with-rotation, logout, and logout-all over
/// the injected collaborators.
///
/// Domain-level failures (bad credentials, invalid or revoked tokens) come
/// back as `Ok(None)` / `Ok(false)` so the HTTP layer can map them uniformly
/// to a generic unauthorized response; only policy rejections and
/// infrastructure faults are errors.
pub struct SessionService {
    directory: Arc<dyn UserDirectory>,
    verifier: Arc<dyn PasswordVerifier>,
    store: Arc<dyn RevocationStore>,
    cache: Arc<dyn RevocationCache>,
    issuer: Arc<TokenIssuer>,
}

impl SessionService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        verifier: Arc<dyn PasswordVerifier>,
        store: Arc<dyn RevocationStore>,
        cache: Arc<dyn RevocationCache>,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            directory,
            verifier,
            store,
            cache,
            issuer,
        }
    }

    /// Authenticate by email and password and issue a token pair.
    ///
    /// "No such user" and "wrong password" are both `Ok(None)`, deliberately
    /// indistinguishable to prevent user enumeration. An inactive account is
    /// the one policy rejection that surfaces as an error.
    ///
    /// The refresh record is durably persisted before the tokens are
    /// returned, so a client can never hold a refresh token the store does
    /// not know about.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        metadata: SessionMetadata,
    ) -> Result<Option<LoginOutcome>> {
        let email = normalize_email(email);
        let Some(user) = self.directory.find_by_email(&email).await? else {
            return Ok(None);
        };

        if !self.verifier.verify(password, &user.password_hash) {
            return Ok(None);
        }

        if !user.is_active() {
            return Err(SessionError::AccountInactive);
        }

        let issued = self.issuer.issue(user.id, &user.email, user.role)?;
        self.persist_refresh(&issued, user.id, &metadata).await?;
        self.directory.record_login(user.id, Utc::now()).await?;

        tracing::info!(user_id = %user.id, jti = %issued.refresh_id, "user logged in");

        Ok(Some(LoginOutcome {
            user: UserProfile::from(&user),
            tokens: AuthTokens::from(&issued),
        }))
    }

    /// Rotate a refresh token: verify, check revocation (cache first, store
    /// on miss), confirm the user is still active, issue and persist a new
    /// pair, then revoke the presented token.
    ///
    /// Every failure mode is `Ok(None)`; they are all the same "this refresh
    /// attempt is not honored" outcome to the caller.
    ///
    /// The new record is durably persisted before the old token is revoked:
    /// a crash between the two writes leaves an extra still-active old token,
    /// which is the safer direction, never a client with zero valid tokens.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        metadata: SessionMetadata,
    ) -> Result<Option<AuthTokens>> {
        let Ok(presented) = self.issuer.verify_refresh(refresh_token) else {
            return Ok(None);
        };

        if self.is_refresh_revoked(presented.refresh_id).await? {
            return Ok(None);
        }

        // A user deactivated since the last login must not be able to refresh.
        let Some(user) = self.directory.find_by_id(presented.user_id).await? else {
            return Ok(None);
        };
        if !user.is_active() {
            return Ok(None);
        }

        let issued = self.issuer.issue(user.id, &user.email, user.role)?;
        self.persist_refresh(&issued, user.id, &metadata).await?;

        if !self
            .store
            .revoke(presented.refresh_id, RevokedReason::Logout)
            .await?
        {
            // The atomic revoke found no active row. If the row exists
            // revoked, a concurrent rotation of the same token won the race:
            // withdraw the successor and fail closed. A row that does not
            // exist at all is a legacy token with nothing to rotate out.
            if self.store.is_revoked(presented.refresh_id).await? {
                let _ = self
                    .store
                    .revoke(issued.refresh_id, RevokedReason::Security)
                    .await?;
                self.write_marker(issued.refresh_id).await;
                tracing::warn!(
                    user_id = %user.id,
                    jti = %presented.refresh_id,
                    "concurrent rotation detected, refresh not honored"
                );
                return Ok(None);
            }
        }
        self.write_marker(presented.refresh_id).await;

        tracing::info!(
            user_id = %user.id,
            old_jti = %presented.refresh_id,
            new_jti = %issued.refresh_id,
            "refresh token rotated"
        );

        Ok(Some(AuthTokens::from(&issued)))
    }

    /// End a single session. Best-effort: a token that fails verification is
    /// already unusable, so the caller's intent is satisfied and the call
    /// still reports success.
    pub async fn logout(&self, refresh_token: &str) -> Result<bool> {
        let Ok(presented) = self.issuer.verify_refresh(refresh_token) else {
            return Ok(true);
        };

        self.store
            .revoke(presented.refresh_id, RevokedReason::Logout)
            .await?;
        self.write_marker(presented.refresh_id).await;

        tracing::info!(user_id = %presented.user_id, jti = %presented.refresh_id, "session ended");
        Ok(true)
    }

    /// End every session for a user; returns how many were revoked.
    pub async fn logout_all(&self, user_id: Uuid) -> Result<u64> {
        self.revoke_all(user_id, RevokedReason::LogoutAll).await
    }

    /// Bulk-revoke all active sessions for a user with an explicit reason
    /// (password change, admin action, security response).
    pub async fn revoke_all(&self, user_id: Uuid, reason: RevokedReason) -> Result<u64> {
        let active = self.store.list_active_for_user(user_id).await?;
        let count = self.store.bulk_revoke(user_id, reason).await?;

        if count > 0 {
            let ttl = self.marker_ttl_secs();
            let entries: Vec<(Uuid, u64)> = active.iter().map(|id| (*id, ttl)).collect();
            if let Err(e) = self.cache.mark_revoked_bulk(&entries).await {
                tracing::warn!(user_id = %user_id, error = %e, "bulk marker write failed, store remains authoritative");
            }
        }

        tracing::info!(user_id = %user_id, count, reason = %reason, "sessions revoked");
        Ok(count)
    }

    /// Remove expired records from the durable store. Periodic hygiene, not
    /// a security operation.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let count = self.store.sweep_expired(Utc::now()).await?;
        if count > 0 {
            tracing::info!(count, "expired refresh records swept");
        }
        Ok(count)
    }

    /// Profile lookup; pure read delegation to the directory.
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let user = self.directory.find_by_id(user_id).await?;
        Ok(user.as_ref().map(UserProfile::from))
    }

    /// Two-tier revocation check: cache hit is authoritative; a miss (or a
    /// cache fault, which degrades to a miss) falls through to the durable
    /// store, lazily repopulating the marker on a store hit.
    async fn is_refresh_revoked(&self, refresh_id: Uuid) -> Result<bool> {
        match self.cache.is_marked_revoked(refresh_id).await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(jti = %refresh_id, error = %e, "revocation cache unavailable, falling through to store");
            }
        }

        if self.store.is_revoked(refresh_id).await? {
            self.write_marker(refresh_id).await;
            return Ok(true);
        }
        Ok(false)
    }

    async fn persist_refresh(
        &self,
        issued: &IssuedTokens,
        user_id: Uuid,
        metadata: &SessionMetadata,
    ) -> Result<()> {
        self.store
            .record(NewRefreshToken {
                id: issued.refresh_id,
                user_id,
                issued_at: issued.issued_at,
                expires_at: issued.refresh_expires_at,
                ip_address: metadata.ip_address.clone(),
                user_agent: metadata.user_agent.clone(),
            })
            .await
    }

    /// Best-effort marker write; a cache outage must not fail a revoke path
    /// the store has already made durable.
    async fn write_marker(&self, refresh_id: Uuid) {
        if let Err(e) = self.cache.mark_revoked(refresh_id, self.marker_ttl_secs()).await {
            tracing::warn!(jti = %refresh_id, error = %e, "marker write failed, store remains authoritative");
        }
    }

    /// Markers outlive any token they could describe: at least the full
    /// refresh lifetime.
    fn marker_ttl_secs(&self) -> u64 {
        self.issuer.refresh_ttl().num_seconds().max(0) as u64
    }
}
