//! Signed token construction and validation for the session service.
//!
//! The issuer builds HS256-signed access/refresh token pairs from a claim set
//! and validates signature, issuer, audience, expiry, and the token type
//! discriminator on presentation. It knows nothing about revocation state;
//! persistence of refresh records is the caller's job.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

mod claims;

pub use claims::{Claims, UserRole, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

const ACCESS_TOKEN_TTL_SECS: i64 = 900; // 15 minutes
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Bearer token type label returned to clients.
pub const BEARER: &str = "Bearer";

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature, structure, expiry, or claim mismatch. Deliberately opaque:
    /// the caller never learns which check failed.
    #[error("invalid token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(_err: jsonwebtoken::errors::Error) -> Self {
        TokenError::Invalid
    }
}

/// Issuer configuration. Access and refresh lifetimes are independent.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            access_ttl: Duration::seconds(ACCESS_TOKEN_TTL_SECS),
            refresh_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }
}

/// A freshly issued access/refresh token pair.
///
/// `expires_in` is the access token lifetime in seconds and matches the
/// signed `exp` claim exactly. The caller must persist the refresh record
/// (`refresh_id`, `refresh_expires_at`) before handing the pair out.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_id: Uuid,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub issued_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Claims extracted from a verified refresh token.
#[derive(Debug, Clone)]
pub struct RefreshClaims {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub refresh_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Builds and validates signed access/refresh tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        // Expiry is exact; no clock-skew allowance.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            audience: config.audience,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Refresh token lifetime; revocation-marker TTLs must be at least this long.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Build a signed access/refresh pair for the given identity.
    ///
    /// Pure construction: nothing is persisted here. The refresh token embeds
    /// a fresh `jti` and the "refresh" discriminator so an access token can
    /// never be replayed as a refresh token.
    pub fn issue(&self, user_id: Uuid, email: &str, role: UserRole) -> Result<IssuedTokens, TokenError> {
        let now = Utc::now();
        let refresh_id = Uuid::new_v4();
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: access_expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            jti: None,
        };

        let refresh_claims = Claims {
            exp: refresh_expires_at.timestamp(),
            token_type: TOKEN_TYPE_REFRESH.to_string(),
            jti: Some(refresh_id.to_string()),
            ..access_claims.clone()
        };

        let header = Header::new(Algorithm::HS256);
        let access_token = encode(&header, &access_claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let refresh_token = encode(&header, &refresh_claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            refresh_id,
            token_type: BEARER,
            expires_in: self.access_ttl.num_seconds(),
            issued_at: now,
            refresh_expires_at,
        })
    }

    /// Validate an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }

    /// Validate a refresh token and extract its identity and identifier.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims = self.decode(token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(TokenError::Invalid);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)?;
        let refresh_id = claims
            .jti
            .as_deref()
            .and_then(|jti| Uuid::parse_str(jti).ok())
            .ok_or(TokenError::Invalid)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;

        Ok(RefreshClaims {
            user_id,
            email: claims.email,
            role: claims.role,
            refresh_id,
            expires_at,
        })
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
