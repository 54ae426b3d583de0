/// Request metadata and token responses
use serde::Serialize;

use crate::models::user::UserProfile;

/// Provenance captured at issuance. Audit and diagnostics only; never used
/// for authorization decisions.
#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Token pair handed to the HTTP layer. `expires_in` is seconds and matches
/// the access token's signed expiry exactly.
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<&jwt_tokens::IssuedTokens> for AuthTokens {
    fn from(issued: &jwt_tokens::IssuedTokens) -> Self {
        Self {
            access_token: issued.access_token.clone(),
            refresh_token: issued.refresh_token.clone(),
            token_type: issued.token_type,
            expires_in: issued.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub tokens: AuthTokens,
}
