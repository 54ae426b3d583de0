use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token type discriminator values embedded in the `token_type` claim.
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Closed set of application roles carried in token claims.
///
/// Validated at the boundary: an unknown role string fails claim
/// deserialization instead of surfacing later as a free-form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Agent,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Agent => "agent",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "agent" => Ok(Self::Agent),
            "viewer" => Ok(Self::Viewer),
            _ => Err(()),
        }
    }
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Email address
    pub email: String,
    /// Application role
    pub role: UserRole,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Refresh token identifier; present only on refresh tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_serde() {
        let json = serde_json::to_string(&UserRole::Manager).unwrap();
        assert_eq!(json, "\"manager\"");
        let role: UserRole = serde_json::from_str(&json).unwrap();
        assert_eq!(role, UserRole::Manager);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<UserRole, _> = serde_json::from_str("\"superuser\"");
        assert!(result.is_err());
        assert!(UserRole::from_str("superuser").is_err());
    }

    #[test]
    fn role_as_str_matches_from_str() {
        for role in [
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Agent,
            UserRole::Viewer,
        ] {
            assert_eq!(UserRole::from_str(role.as_str()), Ok(role));
        }
    }
}
