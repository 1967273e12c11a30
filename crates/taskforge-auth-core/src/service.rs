//! Auth service - ties together password checks, tokens, sessions, and
//! revocation
//!
//! All shared mutable state (sessions, blacklist, one-time tokens) lives in
//! structures with per-key locking; account-store calls are awaited outside
//! any of those guards.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use taskforge_store::{AccountRepository, CreateAccount};
use taskforge_types::{PublicUser, SessionId, SessionRecord, TokenPair, UserId};

use crate::{
    blacklist::TokenBlacklist,
    config::AuthConfig,
    onetime::OneTimeTokens,
    password,
    session::SessionRegistry,
    token::{TokenCodec, TokenType},
    AuthError,
};

/// A real bcrypt hash that matches no password. Verified against when login
/// hits an unknown email so the response time does not reveal whether the
/// account exists.
const ENUMERATION_GUARD_HASH: &str =
    "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYKwqHhKbCS";

/// Client metadata captured at login
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Client IP address
    pub ip_address: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
}

/// Registration input
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Successful login result
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Access and refresh tokens
    pub tokens: TokenPair,
    /// The authenticated user
    pub user: PublicUser,
    /// The session recorded for this login
    pub session: SessionRecord,
}

/// Successful registration result
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    /// The created user
    pub user: PublicUser,
    /// Single-use verification token for out-of-band delivery
    pub verification_token: String,
}

/// Successful token refresh result
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Newly minted access token
    pub access_token: String,
    /// Access token expiration in seconds
    pub expires_in: u64,
}

/// Authentication service
///
/// Provides the full credential and token lifecycle the HTTP and WebSocket
/// layers consume: login, registration, refresh, logout, password
/// change/reset, email verification, and session management.
pub struct AuthService<A: AccountRepository> {
    accounts: Arc<A>,
    codec: TokenCodec,
    blacklist: TokenBlacklist,
    sessions: SessionRegistry,
    reset_tokens: OneTimeTokens,
    verification_tokens: OneTimeTokens,
    config: AuthConfig,
}

impl<A: AccountRepository> AuthService<A> {
    /// Create a new auth service
    pub fn new(config: AuthConfig, accounts: Arc<A>) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            blacklist: TokenBlacklist::new(),
            sessions: SessionRegistry::new(),
            reset_tokens: OneTimeTokens::new(),
            verification_tokens: OneTimeTokens::new(),
            accounts,
            config,
        }
    }

    // =========================================================================
    // Login / Logout / Refresh
    // =========================================================================

    /// Authenticate credentials and open a session
    ///
    /// Unknown email and wrong password produce the same error; a dummy
    /// bcrypt verification runs for unknown emails so timing matches too.
    pub async fn login(
        &self,
        email: &str,
        plain_password: &str,
        meta: ClientMeta,
    ) -> Result<LoginOutcome, AuthError> {
        let account = self.accounts.find_by_email(email).await?;

        let password_ok = match &account {
            Some(account) => password::verify_password(plain_password, &account.password_hash),
            None => {
                password::verify_password(plain_password, ENUMERATION_GUARD_HASH);
                false
            }
        };
        let account = match (account, password_ok) {
            (Some(account), true) => account,
            _ => return Err(AuthError::InvalidCredentials),
        };

        if !account.is_active {
            return Err(AuthError::AccountInactive);
        }

        let now = Utc::now();
        self.accounts.update_last_login(account.id, now).await?;

        let user_id = account.user_id();
        let access = self.codec.issue(
            user_id,
            &account.email,
            Some(&account.role),
            TokenType::Access,
        )?;
        let refresh = self
            .codec
            .issue(user_id, &account.email, None, TokenType::Refresh)?;

        let session = self
            .sessions
            .create(user_id, meta.ip_address, meta.user_agent);

        let mut user = account.to_public();
        user.last_login_at = Some(now);

        tracing::debug!("User {} logged in, session {}", user_id, session.id);

        Ok(LoginOutcome {
            tokens: TokenPair::new(access, refresh, self.config.access_token_ttl.as_secs()),
            user,
            session,
        })
    }

    /// Mint a new access token from a refresh token
    ///
    /// The refresh token is deliberately not rotated: it stays valid for
    /// its full TTL even after use. Rotating here would change the client
    /// contract.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, AuthError> {
        let claims = self.codec.verify(refresh_token, TokenType::Refresh)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let account = self
            .accounts
            .find_by_id(user_id.0)
            .await?
            .filter(|a| a.is_active)
            .ok_or(AuthError::InvalidToken)?;

        let access = self.codec.issue(
            account.user_id(),
            &account.email,
            Some(&account.role),
            TokenType::Access,
        )?;

        Ok(RefreshOutcome {
            access_token: access,
            expires_in: self.config.access_token_ttl.as_secs(),
        })
    }

    /// Log out: blacklist the presented access token and drop the current
    /// session
    ///
    /// Succeeds with no token as well, degrading to "drop current session
    /// only". An invalid or already-expired token is ignored rather than
    /// reported; it can no longer be used either way.
    pub async fn logout(&self, user_id: UserId, access_token: Option<&str>) {
        if let Some(token) = access_token {
            match self.codec.verify(token, TokenType::Access) {
                Ok(claims) => {
                    let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
                        .unwrap_or_else(Utc::now);
                    self.blacklist.revoke(token, expires_at);
                }
                Err(err) => {
                    tracing::debug!("Logout presented unusable token: {}", err);
                }
            }
        }
        self.sessions.revoke_current(user_id);
        tracing::debug!("User {} logged out", user_id);
    }

    // =========================================================================
    // Registration / Email Verification
    // =========================================================================

    /// Create a new account and mint its verification token
    ///
    /// The account is active immediately; verification is advisory. The
    /// returned token goes to the notification layer for delivery.
    pub async fn register(&self, new: NewAccount) -> Result<RegisterOutcome, AuthError> {
        if self.accounts.find_by_email(&new.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        if !password::meets_policy(&new.password, self.config.password_min_length) {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = password::hash_password(&new.password)?;
        let account = self
            .accounts
            .create(CreateAccount {
                id: Uuid::new_v4(),
                email: new.email,
                first_name: new.first_name,
                last_name: new.last_name,
                password_hash,
                role: new.role,
            })
            .await?;

        let verification_token = self
            .verification_tokens
            .issue(account.user_id(), self.verification_ttl());

        tracing::debug!("Registered user {}", account.user_id());

        Ok(RegisterOutcome {
            user: account.to_public(),
            verification_token,
        })
    }

    /// Consume a verification token and mark the account active
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let user_id = self.verification_tokens.peek(token)?;

        let account = self.accounts.find_by_id(user_id.0).await?.ok_or_else(|| {
            tracing::warn!("Verification token for vanished user {}", user_id);
            AuthError::InvalidToken
        })?;

        self.accounts.set_active(account.id, true).await?;
        self.verification_tokens.discard(token);
        Ok(())
    }

    /// Re-issue a verification token
    ///
    /// Returns `None` for unknown emails; the caller's response must be
    /// identical either way (anti-enumeration). The token, when present,
    /// goes only to the notification layer.
    pub async fn resend_verification(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            return Ok(None);
        };
        Ok(Some(
            self.verification_tokens
                .issue(account.user_id(), self.verification_ttl()),
        ))
    }

    // =========================================================================
    // Password Change / Reset
    // =========================================================================

    /// Change the password of an authenticated user
    ///
    /// Every other session is dropped; the session performing the change
    /// stays valid.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let account = self
            .accounts
            .find_by_id(user_id.0)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(current_password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !password::meets_policy(new_password, self.config.password_min_length) {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = password::hash_password(new_password)?;
        self.accounts
            .update_password_hash(account.id, &password_hash)
            .await?;

        self.sessions.revoke_all_except_current(user_id);
        Ok(())
    }

    /// Start the forgot-password flow
    ///
    /// Returns `None` for unknown emails; the caller's response must be
    /// identical either way (anti-enumeration).
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            return Ok(None);
        };
        let ttl = ChronoDuration::from_std(self.config.reset_token_ttl)
            .expect("reset token TTL out of range");
        Ok(Some(self.reset_tokens.issue(account.user_id(), ttl)))
    }

    /// Complete a password reset with a single-use token
    ///
    /// The reset actor has not proven device identity, so every session is
    /// dropped, current included. A policy rejection leaves the token
    /// usable for a retry; success and expiry both delete it.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let user_id = self.reset_tokens.peek(token)?;

        if !password::meets_policy(new_password, self.config.password_min_length) {
            return Err(AuthError::WeakPassword);
        }

        let account = self.accounts.find_by_id(user_id.0).await?.ok_or_else(|| {
            tracing::warn!("Reset token for vanished user {}", user_id);
            AuthError::InvalidToken
        })?;

        let password_hash = password::hash_password(new_password)?;
        self.accounts
            .update_password_hash(account.id, &password_hash)
            .await?;

        self.reset_tokens.discard(token);
        self.sessions.revoke_all(user_id);
        Ok(())
    }

    // =========================================================================
    // Request Authentication
    // =========================================================================

    /// Authenticate a bearer access token and return the current user
    ///
    /// Rejects blacklisted tokens and inactive accounts. This is the entry
    /// point the HTTP and WebSocket layers use per request.
    pub async fn authenticate(&self, access_token: &str) -> Result<PublicUser, AuthError> {
        let claims = self.codec.verify(access_token, TokenType::Access)?;

        if self.blacklist.is_revoked(access_token) {
            tracing::debug!("Rejected blacklisted token for subject {}", claims.sub);
            return Err(AuthError::InvalidToken);
        }

        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;
        let account = self
            .accounts
            .find_by_id(user_id.0)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !account.is_active {
            return Err(AuthError::AccountInactive);
        }

        Ok(account.to_public())
    }

    // =========================================================================
    // Session Management
    // =========================================================================

    /// List the user's sessions in login order
    pub fn list_sessions(&self, user_id: UserId) -> Vec<SessionRecord> {
        self.sessions.list(user_id)
    }

    /// Revoke one session by id
    pub fn revoke_session(&self, user_id: UserId, session_id: &SessionId) -> Result<(), AuthError> {
        if self.sessions.revoke(user_id, session_id) {
            Ok(())
        } else {
            Err(AuthError::SessionNotFound)
        }
    }

    /// Update a session's last-activity timestamp
    pub fn touch_session(&self, user_id: UserId, session_id: &SessionId) -> bool {
        self.sessions.touch(user_id, session_id)
    }

    fn verification_ttl(&self) -> ChronoDuration {
        ChronoDuration::from_std(self.config.verification_token_ttl)
            .expect("verification token TTL out of range")
    }
}

impl<A: AccountRepository> std::fmt::Debug for AuthService<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract the token from an Authorization header value
///
/// # Errors
/// Returns `Unauthorized` for a missing scheme, a non-bearer scheme, or a
/// malformed value.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::Unauthorized),
    }
}
