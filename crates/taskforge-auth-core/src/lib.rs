//! Taskforge Auth Core - Authentication business logic
//!
//! Token lifecycle and session-state engine: credential verification,
//! signed typed tokens with independent TTLs, pre-expiry revocation,
//! per-user session tracking, and the orchestration service the HTTP and
//! WebSocket layers consume.

pub mod blacklist;
pub mod config;
pub mod crypto;
pub mod error;
pub mod onetime;
pub mod password;
pub mod service;
pub mod session;
pub mod token;

pub use blacklist::TokenBlacklist;
pub use config::{AuthConfig, ConfigError};
pub use crypto::{generate_opaque_token, token_digest};
pub use error::AuthError;
pub use onetime::OneTimeTokens;
pub use service::*;
pub use session::SessionRegistry;
pub use token::{Claims, TokenCodec, TokenType};
