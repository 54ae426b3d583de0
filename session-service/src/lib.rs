//! Session credential lifecycle for a multi-role application.
//!
//! Issues short-lived bearer access tokens plus long-lived, individually
//! revocable refresh tokens, rotates the refresh token on every refresh, and
//! answers the revocation question through a two-tier (Redis cache + Postgres
//! store) lookup so the authenticated hot path rarely needs a durable-store
//! round trip.
//!
//! The HTTP layer, user/role storage, and password hashing policy live
//! outside this crate, behind the `UserDirectory` and `PasswordVerifier`
//! seams.

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod security;
pub mod services;
pub mod store;
pub mod telemetry;

pub use cache::{RedisRevocationCache, RevocationCache};
pub use config::Config;
pub use directory::UserDirectory;
pub use error::{Result, SessionError};
pub use models::{
    AuthTokens, LoginOutcome, NewRefreshToken, RefreshTokenRecord, RevokedReason, SessionMetadata,
    UserAccount, UserProfile, UserStatus,
};
pub use security::{Argon2PasswordVerifier, PasswordVerifier};
pub use services::SessionService;
pub use store::{PgRevocationStore, RevocationStore};

#[cfg(test)]
mod tests;
