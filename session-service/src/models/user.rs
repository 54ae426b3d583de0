use chrono::{DateTime, Utc};
/// User identity as seen by the session core
use jwt_tokens::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// A user as returned by the directory. The core only reads identity,
/// status, role, and the stored password hash; everything else about user
/// records lives behind the `UserDirectory` seam.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub password_hash: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Public projection returned to callers; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<&UserAccount> for UserProfile {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
