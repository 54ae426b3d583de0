use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Policy rejection: the account exists and the credentials were correct,
    /// but the account is not active. Distinct from credential failure so the
    /// caller can surface a different message.
    #[error("account is not active")]
    AccountInactive,

    /// A refresh token identifier collided at insert time. Fatal: the
    /// identifier generator is broken. Never retried.
    #[error("duplicate refresh token id: {0}")]
    DuplicateTokenId(Uuid),

    #[error("password does not meet strength requirements")]
    WeakPassword,

    #[error("token signing failed: {0}")]
    TokenSigning(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("cache error: {0}")]
    Cache(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl From<jwt_tokens::TokenError> for SessionError {
    fn from(err: jwt_tokens::TokenError) -> Self {
        // Verification failures never reach this conversion; callers map them
        // to a null result. Only signing faults propagate as errors.
        SessionError::TokenSigning(err.to_string())
    }
}
