//! Auth errors

use taskforge_store::StoreError;
use thiserror::Error;

/// Authentication errors
///
/// Token verification failures are distinguished internally for logging,
/// but all map to 401 so a caller cannot tell which check failed.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password (never distinguished)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account exists but is deactivated
    #[error("account is inactive")]
    AccountInactive,

    /// Registration with an email that already has an account
    #[error("email already registered")]
    EmailTaken,

    /// Password rejected by the strength policy
    #[error("password does not meet security requirements")]
    WeakPassword,

    /// Invalid token (malformed, bad signature, revoked, unknown)
    #[error("invalid token")]
    InvalidToken,

    /// Token is valid but of the wrong type for this context
    #[error("wrong token type")]
    WrongTokenType,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Session not found
    #[error("session not found")]
    SessionNotFound,

    /// Missing or malformed Authorization header
    #[error("missing or malformed authorization header")]
    Unauthorized,

    /// Account store error
    #[error("store error: {0}")]
    Store(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials
            | Self::AccountInactive
            | Self::InvalidToken
            | Self::WrongTokenType
            | Self::TokenExpired
            | Self::Unauthorized => 401,
            Self::EmailTaken | Self::WeakPassword => 400,
            Self::SessionNotFound => 404,
            Self::Store(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::WrongTokenType => "WRONG_TOKEN_TYPE",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Account store error: {}", err);
        Self::Store(err.to_string())
    }
}
