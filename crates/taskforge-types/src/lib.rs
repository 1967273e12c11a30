//! Taskforge Types - Shared domain types
//!
//! This crate contains domain types used across Taskforge services:
//! - User identity
//! - Session records
//! - Token pairs returned after authentication

pub mod auth;
pub mod session;
pub mod user;

pub use auth::*;
pub use session::*;
pub use user::*;
