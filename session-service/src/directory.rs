/// User directory seam
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::UserAccount;

/// Lookup of user identity, status, and role. The relational storage of user
/// records is outside this crate; the session core only consumes this seam.
///
/// `find_by_email` receives an already-normalized (trimmed, lower-cased)
/// address; implementations match it exactly.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>>;

    /// Stamp the user's last-login timestamp after a successful login.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;
}

/// Normalize an email for directory lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
