//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **crypto**: bcrypt-backed `PasswordHasher`
//! - **memory**: in-process `UserRepository` for development and tests
//! - **persistence**: PostgreSQL-backed `UserRepository` using Diesel ORM
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod crypto;
pub mod memory;
pub mod persistence;
