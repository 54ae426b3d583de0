use chrono::{DateTime, Utc};
/// Refresh token record: the only stateful, revocable entity
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of reasons a refresh token can be revoked.
///
/// Required whenever `revoked_at` is set; keeps audit logs and store rows
/// consistent across the single, bulk, and rotation revoke paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokedReason {
    Logout,
    LogoutAll,
    PasswordChange,
    AdminAction,
    Security,
}

impl RevokedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logout => "logout",
            Self::LogoutAll => "logout_all",
            Self::PasswordChange => "password_change",
            Self::AdminAction => "admin_action",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for RevokedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevokedReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logout" => Ok(Self::Logout),
            "logout_all" => Ok(Self::LogoutAll),
            "password_change" => Ok(Self::PasswordChange),
            "admin_action" => Ok(Self::AdminAction),
            "security" => Ok(Self::Security),
            _ => Err(()),
        }
    }
}

/// Durable record of one issued refresh token.
///
/// `revoked_at` transitions null to non-null exactly once and is never
/// cleared. An expired record is functionally dead even while `revoked_at`
/// is still null; verifiers must check both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_reason: Option<RevokedReason>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && !self.is_expired(now)
    }
}

/// Insert payload for a freshly issued refresh token.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
