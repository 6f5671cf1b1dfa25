//! Port for the user record store.
//!
//! The store owns user records; the domain only reads and creates them through
//! [`UserRepository`]. Implementations must enforce uniqueness of `name` and
//! `email` atomically so a race between an availability check and `create`
//! surfaces as [`UserPersistenceError::Duplicate`] rather than a second row.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, NewUser, User, UserId, UserName};

use super::define_port_error;

/// Column protected by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// `users.name`
    Name,
    /// `users.email`
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Email => f.write_str("email"),
        }
    }
}

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { field: UniqueField } => "user {field} already exists",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::Connection { message } => Self::service_unavailable(message),
            UserPersistenceError::Query { message } => Self::internal(message),
            UserPersistenceError::Duplicate { field } => {
                Self::conflict(format!("user {field} already exists"))
            }
        }
    }
}

/// Port for user storage and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by email; `None` when absent.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by name; `None` when absent.
    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by id; `None` when absent.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new user and return the stored record.
    ///
    /// Fails with [`UserPersistenceError::Duplicate`] when the name or email
    /// is already taken.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;
}
