/// Data models for the session token lifecycle
pub mod refresh_token;
pub mod session;
pub mod user;

pub use refresh_token::{NewRefreshToken, RefreshTokenRecord, RevokedReason};
pub use session::{AuthTokens, LoginOutcome, SessionMetadata};
pub use user::{UserAccount, UserProfile, UserStatus};
