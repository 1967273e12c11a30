//! Taskforge Store - Account store abstraction
//!
//! The auth core treats the user-account store as an injected collaborator.
//! This crate defines the [`AccountRepository`] trait plus an in-memory
//! implementation suitable for tests and single-process deployments.
//!
//! # Example
//!
//! ```rust,ignore
//! use taskforge_store::{AccountRepository, MemoryAccountRepository};
//!
//! let accounts = MemoryAccountRepository::new();
//! let found = accounts.find_by_email("user@example.com").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repo;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryAccountRepository;
pub use models::*;
pub use repo::*;
